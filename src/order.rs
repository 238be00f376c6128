//! Proposed trades produced by the rebalancing engine.

use std::fmt;

use crate::holding::Holding;
use crate::side::Side;
use crate::types::{ExchangeData, Symbol};

/// A single proposed trade.
///
/// `units` is always non-negative; direction lives in `side`. `cost` keeps the
/// signed currency delta the order was derived from (negative for buys), so
/// `orders.iter().map(|o| o.cost).sum()` is the net cash flow of a plan.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Order {
    pub symbol: Symbol,
    pub currency: String,
    pub units: f64,
    pub cost: f64,
    pub side: Side,
    pub minimum_order: f64,
    /// Fee as a percentage of trade value.
    pub fee: f64,
    pub exchange_data: ExchangeData,
}

impl Order {
    /// Build an order from a holding's pending currency delta.
    ///
    /// Returns `None` when the holding is unpriced or the unit delta is zero.
    pub(crate) fn from_currency_delta(holding: &Holding, currency: &str, delta: f64) -> Option<Self> {
        let price = holding.price().filter(|_| holding.is_priced())?;
        let unit_delta = delta / price;
        if unit_delta == 0.0 || !unit_delta.is_finite() {
            return None;
        }
        Some(Order {
            symbol: holding.symbol.clone(),
            currency: currency.to_string(),
            units: unit_delta.abs(),
            cost: delta,
            side: Side::from_delta(unit_delta),
            minimum_order: holding.minimum_order(),
            fee: holding.fee(),
            exchange_data: holding
                .metadata
                .as_ref()
                .map(|m| m.exchange_data.clone())
                .unwrap_or_default(),
        })
    }

    /// Signed change to the held amount: positive for buys.
    #[inline]
    pub fn unit_delta(&self) -> f64 {
        self.side.holding_sign() * self.units
    }

    /// Whether the order meets the exchange minimum order size.
    #[inline]
    pub fn meets_minimum(&self) -> bool {
        self.units.abs() >= self.minimum_order
    }

    /// Absolute trade value in the strategy currency.
    #[inline]
    pub fn notional(&self) -> f64 {
        self.cost.abs()
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.8} {} ({:.2} {})",
            self.side, self.units, self.symbol, self.notional(), self.currency
        )
    }
}

/// Estimated exchange fees for a set of orders.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FeeEstimate {
    /// Per-order fee, in the same order as the input.
    pub per_order: Vec<(Symbol, f64)>,
    pub total: f64,
}

/// Estimate fees as `notional * fee%` per order.
pub fn estimate_fees(orders: &[Order]) -> FeeEstimate {
    let per_order: Vec<(Symbol, f64)> = orders
        .iter()
        .map(|o| (o.symbol.clone(), o.notional() * o.fee / 100.0))
        .collect();
    let total = per_order.iter().map(|(_, fee)| fee).sum();
    FeeEstimate { per_order, total }
}
