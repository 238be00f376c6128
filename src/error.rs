//! Engine error types.

use crate::gateway::GatewayError;

/// Errors returned by the allocation engine.
///
/// Per-asset problems are not errors: they are reported as
/// [`Warning`](crate::Warning)s and the operation continues.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Clamp-and-redistribute has overflow left but no value below the cap
    /// to receive it.
    #[error("cannot redistribute {overflow:.6} overflow: no value below the {cap}% cap")]
    RedistributionDivergence { overflow: f64, cap: f64 },

    #[error("invalid weight cap {0}: must be finite and > 0")]
    InvalidCap(f64),

    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divergence_display() {
        let e = Error::RedistributionDivergence {
            overflow: 12.5,
            cap: 20.0,
        };
        assert_eq!(
            e.to_string(),
            "cannot redistribute 12.500000 overflow: no value below the 20% cap"
        );
    }

    #[test]
    fn gateway_error_converts() {
        let e: Error = GatewayError::Connection("timeout".into()).into();
        assert!(e.to_string().contains("timeout"));
    }
}
