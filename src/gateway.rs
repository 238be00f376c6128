//! Interfaces to the market-data provider and the exchange.
//!
//! The engine consumes these through narrow traits and never performs I/O
//! itself; concrete gateways live in `cryptodex-exchange`.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::holding::AssetMetadata;
use crate::order::Order;
use crate::types::Symbol;

/// Errors a gateway can return for transport or protocol failures.
///
/// An exchange refusing an order is not one of these; see [`SubmitOutcome`].
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("{0}")]
    Other(String),
}

/// One asset as listed by the market-data provider.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketAsset {
    /// Provider's (generic) symbol, e.g. `btc`.
    pub symbol: String,
    pub name: String,
    pub market_cap: f64,
}

impl MarketAsset {
    pub fn new(symbol: &str, name: &str, market_cap: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            market_cap,
        }
    }
}

/// Result of handing one order to the exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Accepted (or, in mock mode, validated). Carries the exchange's receipt.
    Accepted(String),
    /// Refused by the exchange, with its diagnostic.
    Rejected(String),
}

impl SubmitOutcome {
    #[inline]
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted(_))
    }
}

/// Source of assets ranked by market capitalization.
pub trait MarketDataProvider {
    /// Assets quoted in `currency`, ordered by descending market cap.
    fn list_markets(&self, currency: &str) -> Result<Vec<MarketAsset>, GatewayError>;
}

/// Minimal exchange API needed by the engine.
pub trait ExchangeGateway {
    /// Translate a provider symbol into this exchange's naming.
    fn translate_symbol(&self, generic: &str) -> Symbol;

    /// Symbols tradeable against `currency`.
    fn tradeable_assets(&self, currency: &str) -> Result<FxHashSet<Symbol>, GatewayError>;

    /// Units owned per symbol.
    fn owned_assets(&self) -> Result<FxHashMap<Symbol, f64>, GatewayError>;

    /// Trading parameters for `symbols`, fetched in one call. Symbols the
    /// exchange knows nothing about are simply absent from the result.
    fn asset_metadata(
        &self,
        symbols: &[Symbol],
        currency: &str,
    ) -> Result<FxHashMap<Symbol, AssetMetadata>, GatewayError>;

    /// Submit an order. With `mock` set, only validate it.
    fn submit_order(&self, order: &Order, mock: bool) -> Result<SubmitOutcome, GatewayError>;
}
