//! Error types for the pipeline

use thiserror::Error;

/// Error surfaced to callers of the pipeline
#[derive(Error, Debug)]
pub enum PulseError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl PulseError {
    pub fn parse(msg: impl Into<String>) -> Self {
        PulseError::Parse(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        PulseError::NotFound(msg.into())
    }
}
