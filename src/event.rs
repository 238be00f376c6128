//! Warning events and the reporter they are delivered to.
//!
//! The engine never prints or logs. Anything non-fatal that a caller should
//! know about (missing prices, a partial rebalance, undersized orders) is
//! handed to a [`Reporter`] supplied by the caller, alongside the normal
//! return value.

use std::fmt;

use crate::types::Symbol;

/// A non-fatal condition raised while building the ledger, planning orders,
/// or submitting them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Warning {
    /// An asset marked tradeable came back without price/fee/minimum order.
    AssetMetadataMissing { symbol: Symbol },
    /// Rebalancing stopped at `symbol`: it needed more than was left.
    InsufficientFunds {
        symbol: Symbol,
        needed: f64,
        available: f64,
    },
    /// Order below the exchange minimum. Flagged, not removed.
    InvalidOrderSize {
        symbol: Symbol,
        units: f64,
        minimum_order: f64,
    },
    /// The gateway refused (or failed to deliver) one order.
    OrderSubmissionFailure { symbol: Symbol, detail: String },
    /// The per-asset weight cap could not be enforced.
    RedistributionDivergence { overflow: f64, cap: f64 },
}

impl Warning {
    /// Short machine-friendly name of the condition.
    pub fn kind(&self) -> &'static str {
        match self {
            Warning::AssetMetadataMissing { .. } => "asset_metadata_missing",
            Warning::InsufficientFunds { .. } => "insufficient_funds",
            Warning::InvalidOrderSize { .. } => "invalid_order_size",
            Warning::OrderSubmissionFailure { .. } => "order_submission_failure",
            Warning::RedistributionDivergence { .. } => "redistribution_divergence",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::AssetMetadataMissing { symbol } => write!(
                f,
                "no trading data for {symbol} although it was listed as tradeable"
            ),
            Warning::InsufficientFunds {
                symbol,
                needed,
                available,
            } => write!(
                f,
                "not enough funds to rebalance all assets: {symbol} needs {needed:.2}, {available:.2} left"
            ),
            Warning::InvalidOrderSize {
                symbol,
                units,
                minimum_order,
            } => write!(
                f,
                "{symbol} order of {units:.8} units is below the minimum of {minimum_order}"
            ),
            Warning::OrderSubmissionFailure { symbol, detail } => {
                write!(f, "order for {symbol} failed: {detail}")
            }
            Warning::RedistributionDivergence { overflow, cap } => write!(
                f,
                "weight cap of {cap}% not applied: {overflow:.4}% could not be redistributed"
            ),
        }
    }
}

/// Receives warnings raised by the engine.
pub trait Reporter {
    fn report(&mut self, warning: Warning);
}

/// Collects warnings in order.
impl Reporter for Vec<Warning> {
    fn report(&mut self, warning: Warning) {
        self.push(warning);
    }
}

/// Drops every warning.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&mut self, _warning: Warning) {}
}
