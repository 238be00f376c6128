//! Error types for the rebalancer.

use std::path::PathBuf;

use cryptodex_exchange::ExchangeError;

/// All errors that can occur during rebalancer operation.
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

    #[error("invalid amount {0}: must be a finite, non-negative number")]
    InvalidAmount(f64),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    #[error("engine error: {0}")]
    Engine(#[from] cryptodex::Error),

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("execution aborted: {0}")]
    Aborted(String),
}

pub type Result<T> = std::result::Result<T, Error>;
