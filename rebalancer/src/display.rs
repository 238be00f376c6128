//! Plain-text tables for the console.

use std::fmt;

use cryptodex::{FeeEstimate, Holding, Order};

/// Format an amount with the currency's sign, e.g. `12.50 €`. Unknown
/// currencies fall back to their uppercase code.
pub fn format_currency(value: f64, currency: &str) -> String {
    match currency.to_lowercase().as_str() {
        "eur" => format!("{value:.2} €"),
        "usd" => format!("{value:.2} $"),
        "gbp" => format!("{value:.2} £"),
        other => format!("{value:.2} {}", other.to_uppercase()),
    }
}

fn percent_or_dash(holding: &Holding, value: f64) -> String {
    if holding.is_active() {
        format!("{value:.2}%")
    } else {
        "-".to_string()
    }
}

/// Holdings with value, allocation, target and drift.
///
/// Only Active holdings carry percentages. The total row sums the value of
/// every row shown, tracked or not.
pub struct HoldingsTable<'a> {
    pub holdings: &'a [Holding],
    pub currency: &'a str,
}

impl fmt::Display for HoldingsTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  {:28} {:>16} {:>13} {:>9} {:>8}",
            "Asset", "Value", "Allocation %", "Target %", "Drift %"
        )?;
        for h in self.holdings {
            let asset = format!("{} ({})", h.symbol.as_str().to_uppercase(), h.name);
            writeln!(
                f,
                "  {:28} {:>16} {:>13} {:>9} {:>8}",
                asset,
                format_currency(h.value(), self.currency),
                percent_or_dash(h, h.allocation),
                percent_or_dash(h, h.target),
                percent_or_dash(h, h.drift),
            )?;
        }
        let total: f64 = self.holdings.iter().map(Holding::value).sum();
        writeln!(
            f,
            "  {:28} {:>16}",
            "Total",
            format_currency(total, self.currency)
        )
    }
}

/// Proposed orders. Orders below the exchange minimum are marked with `!`.
pub struct OrdersTable<'a> {
    pub orders: &'a [Order],
}

impl fmt::Display for OrdersTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  {:8} {:5} {:>16} {:>16} {:>12}",
            "Asset", "Side", "Units", "Balance", "Min. Order"
        )?;
        for order in self.orders {
            let marker = if order.meets_minimum() { "" } else { " !" };
            writeln!(
                f,
                "  {:8} {:5} {:>16.5} {:>16} {:>12}{marker}",
                order.symbol.as_str().to_uppercase(),
                order.side.to_string(),
                order.units,
                format_currency(order.cost, &order.currency),
                order.minimum_order,
            )?;
        }
        Ok(())
    }
}

/// Fee estimate line shown under the order plan.
pub struct FeeSummary<'a> {
    pub estimate: &'a FeeEstimate,
    pub currency: &'a str,
}

impl fmt::Display for FeeSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Est. fees: {} over {} orders",
            format_currency(self.estimate.total, self.currency),
            self.estimate.per_order.len()
        )
    }
}
