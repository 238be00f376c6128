//! Holdings: one tracked asset in the portfolio ledger.

use std::fmt;

use crate::types::{ExchangeData, Symbol};

/// Participation state of a holding, decided once when the ledger is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HoldingState {
    /// Ranked inside the active window: has a target and is rebalanced.
    Active,
    /// Ranked inside the frozen buffer: tracked and displayed, never traded.
    Frozen,
    /// Ranked beyond both windows: kept only because it is still owned.
    Stale,
}

impl HoldingState {
    #[inline]
    pub fn is_active(self) -> bool {
        self == HoldingState::Active
    }
}

impl fmt::Display for HoldingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HoldingState::Active => write!(f, "active"),
            HoldingState::Frozen => write!(f, "frozen"),
            HoldingState::Stale => write!(f, "stale"),
        }
    }
}

/// Exchange-supplied trading parameters for one asset.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetMetadata {
    /// Price of one unit in the strategy currency.
    pub price: f64,
    /// Fee as a percentage of trade value.
    pub fee: f64,
    /// Smallest tradeable quantity, in asset units.
    pub minimum_order: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub exchange_data: ExchangeData,
}

/// One tracked asset.
///
/// `target`, `allocation` and `drift` are percentages derived by the
/// [`allocation`](crate::allocation) functions; they are stale until those
/// run again after any change to amounts or prices.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Holding {
    pub symbol: Symbol,
    pub name: String,
    pub market_cap: f64,
    /// Units currently owned.
    pub amount: f64,
    pub state: HoldingState,
    /// `None` until the exchange reports trading parameters for the asset.
    pub metadata: Option<AssetMetadata>,
    pub target: f64,
    pub allocation: f64,
    pub drift: f64,
}

impl Holding {
    pub fn new(symbol: Symbol, name: impl Into<String>, market_cap: f64, state: HoldingState) -> Self {
        Self {
            symbol,
            name: name.into(),
            market_cap,
            amount: 0.0,
            state,
            metadata: None,
            target: 0.0,
            allocation: 0.0,
            drift: 0.0,
        }
    }

    /// Set the owned amount (builder style).
    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = amount;
        self
    }

    /// Attach trading parameters (builder style).
    pub fn with_metadata(mut self, metadata: AssetMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Unit price, if the exchange has priced this asset.
    #[inline]
    pub fn price(&self) -> Option<f64> {
        self.metadata.as_ref().map(|m| m.price)
    }

    /// Whether the holding can take part in value-based calculations.
    #[inline]
    pub fn is_priced(&self) -> bool {
        self.price().is_some_and(|p| p.is_finite() && p > 0.0)
    }

    /// Current value in the strategy currency; 0 when unpriced.
    pub fn value(&self) -> f64 {
        match self.price() {
            Some(price) if self.is_priced() => price * self.amount,
            _ => 0.0,
        }
    }

    pub fn fee(&self) -> f64 {
        self.metadata.as_ref().map_or(0.0, |m| m.fee)
    }

    pub fn minimum_order(&self) -> f64 {
        self.metadata.as_ref().map_or(0.0, |m| m.minimum_order)
    }
}

/// Sum of [`Holding::value`] over Active holdings.
pub fn total_active_value(holdings: &[Holding]) -> f64 {
    holdings
        .iter()
        .filter(|h| h.is_active())
        .map(Holding::value)
        .sum()
}
