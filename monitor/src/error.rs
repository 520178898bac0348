//! Error types for the monitor.

use std::path::PathBuf;

/// All errors that can occur during monitor operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("returns file error: {0}")]
    Returns(String),

    #[error("failed to read returns file {path}: {source}")]
    ReturnsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot store error: {0}")]
    Store(#[from] vertex::StoreError),

    #[error("invalid value: {0}")]
    Validation(#[from] vertex::ValidationError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("compliance check failed: {0}")]
    ComplianceFailed(String),

    #[error("aborted: {0}")]
    Aborted(String),

    #[error("audit log error: {0}")]
    Audit(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
