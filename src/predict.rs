//! What-if simulation of an order set.

use crate::allocation::compute_allocation;
use crate::holding::Holding;
use crate::order::Order;

/// Apply `orders` to a copy of the Active holdings and recompute allocation.
///
/// Buys add units, sells remove them; orders for symbols not in the Active
/// set are ignored. Targets are kept as they are and `drift` is left at its
/// pre-trade value; call [`compute_drift`](crate::allocation::compute_drift)
/// on the result to refresh it. The input ledger is not touched.
pub fn predict(holdings: &[Holding], orders: &[Order]) -> Vec<Holding> {
    let mut predicted: Vec<Holding> = holdings.iter().filter(|h| h.is_active()).cloned().collect();

    for order in orders {
        if let Some(h) = predicted.iter_mut().find(|h| h.symbol == order.symbol) {
            h.amount += order.unit_delta();
        }
    }

    compute_allocation(&mut predicted);
    predicted
}
