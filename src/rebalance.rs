//! Rebalancing engine: turn a deposit or withdrawal into orders.
//!
//! Works on pending currency deltas, one per holding, using the seller's
//! sign convention: positive means currency comes in (sell), negative means
//! currency goes out (buy). Deltas are local to one [`invest`] call and are
//! never stored on the holdings.

use crate::allocation::EPSILON;
use crate::event::{Reporter, Warning};
use crate::holding::{Holding, total_active_value};
use crate::order::Order;
use crate::strategy::FundingPriority;

/// Options for one [`invest`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvestOptions {
    /// Sell overweight holdings and fund underweight ones before spreading
    /// the remaining funds by target.
    pub rebalance: bool,
    pub funding_priority: FundingPriority,
}

impl Default for InvestOptions {
    fn default() -> Self {
        Self {
            rebalance: true,
            funding_priority: FundingPriority::LedgerOrder,
        }
    }
}

/// Compute the orders that invest `amount` into the portfolio.
///
/// `amount` is signed: positive deposits, negative withdraws. Only Active,
/// priced holdings participate; an Active holding without a price is
/// reported as [`Warning::AssetMetadataMissing`] and skipped.
///
/// With `rebalance` set:
/// 1. every holding above target sells its excess over target value, and the
///    proceeds join the fund pool;
/// 2. holdings below target are bought up to target value while the pool
///    covers them. The first one that cannot be covered stops this phase
///    ([`Warning::InsufficientFunds`]); later ones get nothing from it.
///
/// Finally, whatever is left in the pool is spread over all participants in
/// proportion to their target. Orders with a zero unit delta are omitted.
///
/// When every phase-2 need is met, the returned costs sum to `-amount`.
pub fn invest(
    holdings: &[Holding],
    currency: &str,
    amount: f64,
    opts: InvestOptions,
    reporter: &mut dyn Reporter,
) -> Vec<Order> {
    let mut participants = Vec::with_capacity(holdings.len());
    for (i, h) in holdings.iter().enumerate() {
        if !h.is_active() {
            continue;
        }
        if !h.is_priced() {
            reporter.report(Warning::AssetMetadataMissing {
                symbol: h.symbol.clone(),
            });
            continue;
        }
        participants.push(i);
    }

    // Must be taken before any delta is applied.
    let total_value = total_active_value(holdings);

    let mut pending = vec![0.0_f64; holdings.len()];
    let mut funds = amount;

    if opts.rebalance {
        // Phase 1: sell the excess of overweight holdings.
        for &i in &participants {
            let h = &holdings[i];
            if h.drift <= EPSILON || h.allocation <= 0.0 {
                continue;
            }
            let value = h.value();
            let excess = value - value * h.target / h.allocation;
            pending[i] += excess;
            funds += excess;
        }

        // Phase 2: buy underweight holdings up to target, until funds run out.
        let mut below: Vec<usize> = participants
            .iter()
            .copied()
            .filter(|&i| holdings[i].drift < -EPSILON)
            .collect();
        if opts.funding_priority == FundingPriority::LargestDriftFirst {
            below.sort_by(|&a, &b| holdings[a].drift.total_cmp(&holdings[b].drift));
        }

        for i in below {
            let h = &holdings[i];
            let need = if h.allocation <= 0.0 {
                total_value / 100.0 * h.target
            } else {
                let value = h.value();
                value * h.target / h.allocation - value
            };
            if need <= funds + EPSILON {
                pending[i] -= need;
                funds -= need;
            } else {
                reporter.report(Warning::InsufficientFunds {
                    symbol: h.symbol.clone(),
                    needed: need,
                    available: funds,
                });
                break;
            }
        }
    }

    // Phase 3: spread the remaining funds by target weight.
    let mut orders = Vec::new();
    for &i in &participants {
        let h = &holdings[i];
        pending[i] -= h.target / 100.0 * funds;
        if let Some(order) = Order::from_currency_delta(h, currency, pending[i]) {
            orders.push(order);
        }
    }
    orders
}
