//! Exchange error types.

use std::path::PathBuf;

/// Errors loading or saving gateway state.
///
/// Gateway calls themselves return [`cryptodex::GatewayError`].
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("failed to read snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write snapshot {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid snapshot: {0}")]
    Invalid(String),
}
