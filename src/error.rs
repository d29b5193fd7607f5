//! Error types for cxb-explore

use thiserror::Error;

/// Main error type for cxb-explore operations
#[derive(Error, Debug)]
pub enum Error {
    /// Flux outside the model's domain, bad interval ordering, or a
    /// singular power-law index
    #[error("Domain error: {0}")]
    Domain(String),

    #[error("Invalid argument: {0}")]
    Argument(String),

    /// Rejection sampling gave up on a single source draw
    #[error("Sampling timeout: no source accepted after {attempts} attempts")]
    SamplingTimeout { attempts: u64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for cxb-explore operations
pub type Result<T> = std::result::Result<T, Error>;
