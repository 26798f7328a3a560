//! News Refresher
//!
//! Background service that refreshes the store on a fixed cadence and prunes
//! articles past the retention window.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tracing::{debug, info};

use crate::news_service::NewsService;

/// How often the retention cleanup runs
const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);

/// Background refresh and cleanup loops for a `NewsService`
pub struct NewsRefresher {
    news_service: Arc<NewsService>,
    refresh_interval: Duration,
    retention_days: u32,
}

impl NewsRefresher {
    pub fn new(news_service: Arc<NewsService>) -> Self {
        let config = news_service.config();
        Self {
            refresh_interval: config.refresh_interval(),
            retention_days: config.retention_days,
            news_service,
        }
    }

    /// Start the background loops
    pub fn start(self: Arc<Self>) {
        info!(
            "Starting NewsRefresher with refresh interval {:?}, retention {} days",
            self.refresh_interval, self.retention_days
        );

        let self_refresh = Arc::clone(&self);
        let self_cleanup = Arc::clone(&self);

        tokio::spawn(async move {
            self_refresh.refresh_loop().await;
        });

        tokio::spawn(async move {
            let mut ticker = interval(CLEANUP_INTERVAL);
            loop {
                ticker.tick().await;
                self_cleanup.cleanup();
            }
        });
    }

    async fn refresh_loop(&self) {
        let mut ticker = interval(self.refresh_interval);
        loop {
            // first tick completes immediately
            ticker.tick().await;
            self.refresh().await;
        }
    }

    /// One refresh cycle
    pub async fn refresh(&self) -> usize {
        let stored = self.news_service.update_news().await;
        debug!("Background refresh left {} articles stored", stored.len());
        stored.len()
    }

    /// One retention cleanup
    pub fn cleanup(&self) -> usize {
        self.news_service.delete_old_news(self.retention_days)
    }
}
