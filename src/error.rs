// src/error.rs
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, XrayError>;

/// Everything that can go wrong while driving the xray binary.
#[derive(Error, Debug)]
pub enum XrayError {
    /// No candidate could be executed, or the one that ran is not xray community
    #[error("xray program was not found: {0}")]
    NotFound(String),

    /// The child did not exit in time and has been killed
    #[error("xray process timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// xray exited without printing its completion marker
    #[error("xray scan failed: {0}")]
    Scan(String),

    #[error("invalid url argument: {0}")]
    InvalidTargets(String),

    #[error("invalid extra arguments: {0}")]
    InvalidArguments(String),

    #[error("failed to spawn {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode xray result file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl XrayError {
    /// Retryable with a longer deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, XrayError::Timeout(_))
    }
}
