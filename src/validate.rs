//! Advisory order checks.
//!
//! Nothing here removes or blocks an order. Whether undersized orders are
//! still submitted is the caller's decision.

use crate::event::{Reporter, Warning};
use crate::order::Order;

/// Orders whose size is below the exchange minimum.
///
/// Returns references into `orders`; the input list is unchanged.
pub fn filter_invalid(orders: &[Order]) -> Vec<&Order> {
    orders.iter().filter(|o| !o.meets_minimum()).collect()
}

/// Report every undersized order as [`Warning::InvalidOrderSize`].
///
/// Returns how many were flagged.
pub fn flag_invalid(orders: &[Order], reporter: &mut dyn Reporter) -> usize {
    let invalid = filter_invalid(orders);
    for order in &invalid {
        reporter.report(Warning::InvalidOrderSize {
            symbol: order.symbol.clone(),
            units: order.units,
            minimum_order: order.minimum_order,
        });
    }
    invalid.len()
}
