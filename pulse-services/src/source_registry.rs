//! Source Registry
//!
//! Configured sources with their enabled flags and fetch bookkeeping.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, info};

use pulse_core::{SourceConfig, SourceStats};

struct Entry {
    config: SourceConfig,
    stats: SourceStats,
}

/// Registered sources in configuration order
pub struct SourceRegistry {
    entries: RwLock<Vec<Entry>>,
}

impl SourceRegistry {
    pub fn new(configs: Vec<SourceConfig>) -> Self {
        let entries = configs
            .into_iter()
            .map(|config| Entry {
                stats: SourceStats::new(&config.name, config.enabled),
                config,
            })
            .collect();

        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Apply persisted toggles and counters to sources that are still configured
    pub fn restore(&self, persisted: &[SourceStats]) {
        let mut entries = self.entries.write();
        let mut restored = 0;
        for stats in persisted {
            if let Some(entry) = entries.iter_mut().find(|e| e.config.name == stats.name) {
                entry.config.enabled = stats.enabled;
                entry.stats = stats.clone();
                restored += 1;
            }
        }
        if restored > 0 {
            info!("Restored state for {} sources", restored);
        }
    }

    pub fn sources(&self) -> Vec<SourceConfig> {
        self.entries.read().iter().map(|e| e.config.clone()).collect()
    }

    pub fn enabled_sources(&self) -> Vec<SourceConfig> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.config.enabled)
            .map(|e| e.config.clone())
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<SourceConfig> {
        self.entries
            .read()
            .iter()
            .find(|e| e.config.name == name)
            .map(|e| e.config.clone())
    }

    /// Enable a source; `None` if it is not registered
    pub fn enable(&self, name: &str) -> Option<SourceConfig> {
        self.set_enabled(name, true)
    }

    /// Disable a source; `None` if it is not registered
    pub fn disable(&self, name: &str) -> Option<SourceConfig> {
        self.set_enabled(name, false)
    }

    fn set_enabled(&self, name: &str, enabled: bool) -> Option<SourceConfig> {
        let mut entries = self.entries.write();
        let entry = entries.iter_mut().find(|e| e.config.name == name)?;
        entry.config.enabled = enabled;
        entry.stats.enabled = enabled;
        info!("Source {} {}", name, if enabled { "enabled" } else { "disabled" });
        Some(entry.config.clone())
    }

    pub fn stats(&self) -> Vec<SourceStats> {
        self.entries.read().iter().map(|e| e.stats.clone()).collect()
    }

    pub fn record_success(&self, name: &str, count: usize, at: DateTime<Utc>) {
        let mut entries = self.entries.write();
        let Some(entry) = entries.iter_mut().find(|e| e.config.name == name) else {
            debug!("Ignoring fetch result for unregistered source {}", name);
            return;
        };
        let stats = &mut entry.stats;
        stats.last_fetch = Some(at);
        stats.last_fetch_count = count;
        stats.total_fetched += count as u64;
        stats.last_error = None;
    }

    pub fn record_failure(&self, name: &str, error: &str, at: DateTime<Utc>) {
        let mut entries = self.entries.write();
        let Some(entry) = entries.iter_mut().find(|e| e.config.name == name) else {
            debug!("Ignoring fetch failure for unregistered source {}", name);
            return;
        };
        let stats = &mut entry.stats;
        stats.last_fetch = Some(at);
        stats.last_fetch_count = 0;
        stats.failure_count += 1;
        stats.last_error = Some(error.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::SourceKind;

    fn registry() -> SourceRegistry {
        SourceRegistry::new(vec![
            SourceConfig::new("Wire", SourceKind::Rss, "https://a", "markets", 0.8),
            SourceConfig::new("Desk", SourceKind::Scrape, "https://b", "markets", 0.6),
        ])
    }

    #[test]
    fn test_toggle_sources() {
        let registry = registry();
        assert_eq!(registry.enabled_sources().len(), 2);

        let disabled = registry.disable("Desk").unwrap();
        assert!(!disabled.enabled);
        assert_eq!(registry.enabled_sources().len(), 1);
        assert!(!registry.stats()[1].enabled);

        assert!(registry.enable("Desk").unwrap().enabled);
        assert!(registry.enable("Nope").is_none());
        assert!(registry.disable("Nope").is_none());
    }

    #[test]
    fn test_record_outcomes() {
        let registry = registry();
        let now = Utc::now();

        registry.record_success("Wire", 12, now);
        registry.record_success("Wire", 3, now);
        registry.record_failure("Desk", "timed out", now);
        registry.record_failure("Nope", "ignored", now);

        let stats = registry.stats();
        assert_eq!(stats[0].last_fetch_count, 3);
        assert_eq!(stats[0].total_fetched, 15);
        assert_eq!(stats[0].failure_count, 0);
        assert_eq!(stats[1].failure_count, 1);
        assert_eq!(stats[1].last_error.as_deref(), Some("timed out"));
        assert_eq!(stats[1].last_fetch, Some(now));
    }

    #[test]
    fn test_restore_persisted_state() {
        let registry = registry();
        let mut desk = SourceStats::new("Desk", false);
        desk.failure_count = 4;

        registry.restore(&[desk, SourceStats::new("Gone", true)]);

        assert!(!registry.get("Desk").unwrap().enabled);
        assert_eq!(registry.stats()[1].failure_count, 4);
        assert_eq!(registry.sources().len(), 2);
    }
}
