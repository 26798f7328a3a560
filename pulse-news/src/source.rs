//! Common capability implemented by every source adapter

use async_trait::async_trait;

use pulse_core::SourceKind;

use crate::error::NewsError;
use crate::types::RawArticle;

/// A source that can be asked for its current raw articles
///
/// The fetcher treats all adapters polymorphically through this trait.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Configured source name; every returned article carries it
    fn name(&self) -> &str;

    /// Adapter flavour, for logging and stats
    fn kind(&self) -> SourceKind;

    /// Fetch the source's current articles
    async fn fetch(&self) -> Result<Vec<RawArticle>, NewsError>;
}
