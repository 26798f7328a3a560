//! Core types for the market news sentiment pipeline
//!
//! This crate defines the shared data structures used across the workspace,
//! including the canonical article record, source configuration and the
//! derived sentiment summary.

pub mod article;
pub mod error;
pub mod source;
pub mod summary;

pub use article::{Article, ArticleSort, ImpactLevel, NewArticle, Sector};
pub use error::PulseError;
pub use source::{SourceConfig, SourceKind, SourceStats};
pub use summary::{RankedCount, SentimentSummary};
