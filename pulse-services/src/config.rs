//! Pipeline configuration
//!
//! Every tunable has a default; `from_env` overrides individual values from
//! `PULSE_*` environment variables.

use std::time::Duration;

use thiserror::Error;

use pulse_core::SourceConfig;
use pulse_news::curated_sources;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("{key} must be greater than zero")]
    Zero { key: String },

    #[error("Invalid source list: {0}")]
    InvalidSources(String),
}

/// Tunables for fetching, retention and summarizing
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Upper bound on the stored collection
    pub max_retained: usize,
    /// Collection is stale once its newest article is older than this
    pub staleness_window_secs: u64,
    /// Number of most recent articles the aggregator looks at
    pub summary_window: usize,
    /// Per-source fetch timeout
    pub fetch_timeout_secs: u64,
    /// Age cleanup performed by the background loop
    pub retention_days: u32,
    /// Background refresh cadence
    pub refresh_interval_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_retained: 100,
            staleness_window_secs: 15 * 60,
            summary_window: 50,
            fetch_timeout_secs: 10,
            retention_days: 7,
            refresh_interval_secs: 15 * 60,
        }
    }
}

impl PipelineConfig {
    /// Defaults overridden by whatever `PULSE_*` variables are set
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with a custom variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            max_retained: parse_positive(&lookup, "PULSE_MAX_RETAINED", defaults.max_retained)?,
            staleness_window_secs: parse_positive(
                &lookup,
                "PULSE_STALENESS_SECS",
                defaults.staleness_window_secs,
            )?,
            summary_window: parse_positive(
                &lookup,
                "PULSE_SUMMARY_WINDOW",
                defaults.summary_window,
            )?,
            fetch_timeout_secs: parse_positive(
                &lookup,
                "PULSE_FETCH_TIMEOUT_SECS",
                defaults.fetch_timeout_secs,
            )?,
            retention_days: parse_positive(
                &lookup,
                "PULSE_RETENTION_DAYS",
                defaults.retention_days,
            )?,
            refresh_interval_secs: parse_positive(
                &lookup,
                "PULSE_REFRESH_INTERVAL_SECS",
                defaults.refresh_interval_secs,
            )?,
        })
    }

    /// Saturates at the largest representable span
    pub fn staleness_window(&self) -> chrono::Duration {
        i64::try_from(self.staleness_window_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

fn parse_positive<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialEq + Default,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };

    let value: T = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.clone(),
    })?;

    if value == T::default() {
        return Err(ConfigError::Zero {
            key: key.to_string(),
        });
    }

    Ok(value)
}

/// Source list from a `PULSE_SOURCES`-style JSON array, or the curated defaults
pub fn sources_from_json(json: Option<&str>) -> Result<Vec<SourceConfig>, ConfigError> {
    let Some(json) = json.map(str::trim).filter(|j| !j.is_empty()) else {
        return Ok(curated_sources());
    };

    let sources: Vec<SourceConfig> =
        serde_json::from_str(json).map_err(|e| ConfigError::InvalidSources(e.to_string()))?;

    let mut names = std::collections::HashSet::new();
    for source in &sources {
        if source.name.trim().is_empty() {
            return Err(ConfigError::InvalidSources("source name is empty".to_string()));
        }
        if !names.insert(source.name.as_str()) {
            return Err(ConfigError::InvalidSources(format!(
                "duplicate source name: {}",
                source.name
            )));
        }
    }

    Ok(sources
        .into_iter()
        .map(|mut s| {
            s.reliability = s.reliability.clamp(0.0, 1.0);
            s
        })
        .collect())
}
