//! Target weights and live allocation.
//!
//! All values are percentages (0–100). Only Active holdings carry a target;
//! Frozen and Stale holdings are pinned to 0.

use crate::error::{Error, Result};
use crate::holding::{Holding, total_active_value};

/// Tolerance used when comparing percentages.
pub const EPSILON: f64 = 1e-9;

/// Set targets proportional to the square root of market cap.
///
/// `target_i = 100 * sqrt(cap_i) / Σ sqrt(cap_j)` over Active holdings.
/// Non-positive or non-finite caps weigh 0. If no Active holding has a
/// positive cap, every target is 0.
pub fn compute_sqrt_weights(holdings: &mut [Holding]) {
    let weight = |h: &Holding| {
        if h.is_active() && h.market_cap.is_finite() && h.market_cap > 0.0 {
            h.market_cap.sqrt()
        } else {
            0.0
        }
    };

    let total: f64 = holdings.iter().map(weight).sum();
    for h in holdings.iter_mut() {
        h.target = if total > 0.0 {
            100.0 * weight(h) / total
        } else {
            0.0
        };
    }
}

/// Cap every value at `cap`, spreading the excess over the values below it.
///
/// Each pass adds the pending overflow to every value strictly below `cap`,
/// in proportion to that value's share of the below-cap sum, then clamps the
/// first value found above `cap` and carries its excess into the next pass.
/// Stops when nothing exceeds `cap`. The total is preserved exactly by every
/// pass.
///
/// A clamped value sits at `cap` and never receives overflow again, so at most
/// `len + 1` passes are needed; the loop is bounded by that.
///
/// # Errors
///
/// - [`Error::InvalidCap`] if `cap` is not finite and positive.
/// - [`Error::RedistributionDivergence`] if overflow remains but no value
///   below `cap` (with a positive sum) can absorb it.
pub fn clamp_and_redistribute<K: Clone>(
    weights: &[(K, f64)],
    cap: f64,
    initial_overflow: f64,
) -> Result<Vec<(K, f64)>> {
    if !cap.is_finite() || cap <= 0.0 {
        return Err(Error::InvalidCap(cap));
    }

    let mut values: Vec<(K, f64)> = weights.to_vec();
    let mut overflow = initial_overflow;

    for _ in 0..=values.len() + 1 {
        if overflow > 0.0 {
            let below_sum: f64 = values.iter().map(|(_, v)| *v).filter(|v| *v < cap).sum();
            if below_sum <= 0.0 {
                return Err(Error::RedistributionDivergence { overflow, cap });
            }
            for (_, v) in values.iter_mut() {
                if *v < cap {
                    *v += overflow * *v / below_sum;
                }
            }
        }

        match values.iter_mut().find(|(_, v)| *v > cap + EPSILON) {
            Some((_, v)) => {
                overflow = *v - cap;
                *v = cap;
            }
            None => return Ok(values),
        }
    }

    Err(Error::RedistributionDivergence { overflow, cap })
}

/// Apply [`clamp_and_redistribute`] to the targets of Active holdings.
///
/// On error the targets are left untouched.
pub fn cap_targets(holdings: &mut [Holding], cap: f64) -> Result<()> {
    let weights: Vec<(usize, f64)> = holdings
        .iter()
        .enumerate()
        .filter(|(_, h)| h.is_active())
        .map(|(i, h)| (i, h.target))
        .collect();

    let capped = clamp_and_redistribute(&weights, cap, 0.0)?;
    for (i, target) in capped {
        holdings[i].target = target;
    }
    Ok(())
}

/// Recompute `allocation` for every holding from current prices and amounts.
///
/// The denominator is the value of Active holdings only; Frozen and Stale
/// holdings get a share relative to that same total, for reporting. A zero
/// total yields 0 everywhere.
pub fn compute_allocation(holdings: &mut [Holding]) {
    let total = total_active_value(holdings);
    for h in holdings.iter_mut() {
        h.allocation = if total > 0.0 {
            100.0 * h.value() / total
        } else {
            0.0
        };
    }
}

/// `drift = allocation - target` for every holding.
pub fn compute_drift(holdings: &mut [Holding]) {
    for h in holdings.iter_mut() {
        h.drift = h.allocation - h.target;
    }
}
