//! Execution orchestrator: connect → plan → confirm → submit.
//!
//! This is the main workflow that ties the engine to an exchange.

use cryptodex::{
    ExchangeGateway, Order, PortfolioState, Reporter, Side, SubmitOutcome, Warning, estimate_fees,
    flag_invalid,
};
use cryptodex_exchange::PaperExchange;
use log::{debug, info, warn};

use crate::config::Config;
use crate::display::{FeeSummary, HoldingsTable, OrdersTable};
use crate::error::{Error, Result};

/// Forwards engine warnings to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&mut self, warning: Warning) {
        warn!("{warning}");
    }
}

/// Options for an invest run.
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Currency to add (positive) or withdraw (negative).
    pub amount: f64,
    pub rebalance: bool,
    /// Show the predicted portfolio before confirming.
    pub estimate: bool,
    /// Execute orders instead of only validating them.
    pub live: bool,
    /// Skip the confirmation prompt.
    pub force: bool,
}

/// Counts from one submission pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExecutionSummary {
    pub submitted: usize,
    pub accepted: usize,
    pub failed: usize,
    /// Zero-unit orders that were never sent.
    pub skipped: usize,
}

impl std::fmt::Display for ExecutionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} submitted, {} accepted, {} failed",
            self.submitted, self.accepted, self.failed
        )?;
        if self.skipped > 0 {
            write!(f, ", {} skipped", self.skipped)?;
        }
        Ok(())
    }
}

/// Turn a CLI amount into the signed amount the engine expects.
///
/// Buying adds funds, selling withdraws them.
pub fn signed_amount(amount: f64, side: Side) -> Result<f64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount(amount));
    }
    Ok(match side {
        Side::Buy => amount,
        Side::Sell => -amount,
    })
}

/// Refuse to submit more orders than the configured maximum.
pub fn enforce_max_orders_per_run(order_count: usize, max_orders_per_run: usize) -> Result<()> {
    if order_count > max_orders_per_run {
        return Err(Error::LimitExceeded(format!(
            "{order_count} orders generated, but max_orders_per_run is {max_orders_per_run}"
        )));
    }
    Ok(())
}

/// Submit orders one by one.
///
/// A rejected order or a failed call is reported and the remaining orders
/// are still submitted.
pub fn process_orders(
    exchange: &dyn ExchangeGateway,
    orders: &[Order],
    mock: bool,
    reporter: &mut dyn Reporter,
) -> ExecutionSummary {
    let mut summary = ExecutionSummary::default();
    for order in orders {
        if order.units == 0.0 {
            debug!("skipping zero-unit order for {}", order.symbol);
            summary.skipped += 1;
            continue;
        }
        summary.submitted += 1;
        match exchange.submit_order(order, mock) {
            Ok(SubmitOutcome::Accepted(receipt)) => {
                info!("{order}: {receipt}");
                summary.accepted += 1;
            }
            Ok(SubmitOutcome::Rejected(detail)) => {
                summary.failed += 1;
                reporter.report(Warning::OrderSubmissionFailure {
                    symbol: order.symbol.clone(),
                    detail,
                });
            }
            Err(e) => {
                summary.failed += 1;
                reporter.report(Warning::OrderSubmissionFailure {
                    symbol: order.symbol.clone(),
                    detail: e.to_string(),
                });
            }
        }
    }
    summary
}

/// Plan an investment, show it, ask for confirmation and submit.
///
/// `confirm` receives the prompt and returns whether to go ahead; a `false`
/// answer ends the run with [`Error::Aborted`].
pub fn run_invest<F>(
    state: &PortfolioState,
    exchange: &dyn ExchangeGateway,
    config: &Config,
    opts: &RunOptions,
    reporter: &mut dyn Reporter,
    confirm: F,
) -> Result<ExecutionSummary>
where
    F: FnOnce(&str) -> Result<bool>,
{
    if !opts.amount.is_finite() {
        return Err(Error::InvalidAmount(opts.amount));
    }

    let orders = state.invest(opts.amount, opts.rebalance, reporter);
    if orders.is_empty() {
        println!("\nNothing to do: no orders generated.");
        return Ok(ExecutionSummary::default());
    }

    println!("\nORDERS:");
    print!("{}", OrdersTable { orders: &orders });
    let fees = estimate_fees(&orders);
    println!(
        "{}",
        FeeSummary {
            estimate: &fees,
            currency: state.currency(),
        }
    );

    if opts.estimate {
        let predicted = state.predict(&orders);
        println!("\nPREDICTED PORTFOLIO:");
        print!(
            "{}",
            HoldingsTable {
                holdings: &predicted,
                currency: state.currency(),
            }
        );
    }

    let invalid = flag_invalid(&orders, reporter);
    if invalid > 0 {
        println!("\n{invalid} orders do not meet the minimum order criteria");
    }

    enforce_max_orders_per_run(orders.len(), config.execution.max_orders_per_run)?;

    if opts.live {
        println!("\nLIVE mode: orders will be executed.");
    } else {
        println!("\nMock mode: orders will be validated but not executed.");
    }

    if !opts.force && !confirm("Do you want to continue?")? {
        return Err(Error::Aborted("no orders submitted".into()));
    }

    let summary = process_orders(exchange, &orders, !opts.live, reporter);
    println!("\n{summary}");
    Ok(summary)
}

/// Interactive yes/no prompt, defaulting to no.
pub fn confirm_prompt(prompt: &str) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| Error::Aborted(format!("confirmation prompt failed: {e}")))
}

/// Open the paper exchange and build the ledger from it.
pub fn connect(config: &Config, reporter: &mut dyn Reporter) -> Result<(PaperExchange, PortfolioState)> {
    let path = config.snapshot_path();
    debug!("loading exchange snapshot from {}", path.display());
    let exchange = PaperExchange::load(&path)?;
    let state = PortfolioState::connect(&exchange, &exchange, config.strategy(), reporter)?;
    Ok((exchange, state))
}

fn print_holdings(state: &PortfolioState) {
    println!("PORTFOLIO ({}):", state.currency().to_uppercase());
    print!(
        "{}",
        HoldingsTable {
            holdings: state.holdings(),
            currency: state.currency(),
        }
    );
}

/// Show the current ledger.
pub fn show_balance(config: &Config) -> Result<()> {
    let (_, state) = connect(config, &mut LogReporter)?;
    print_holdings(&state);
    Ok(())
}

/// Re-read balances and prices into the existing ledger, without re-ranking.
pub fn refresh(config: &Config) -> Result<()> {
    let mut reporter = LogReporter;
    let (_, mut state) = connect(config, &mut reporter)?;
    let latest = PaperExchange::load(&config.snapshot_path())?;
    state.refresh(&latest, &mut reporter)?;
    print_holdings(&state);
    Ok(())
}

/// Full `buy`/`sell` command: connect, run the investment and persist live
/// fills back to the snapshot.
pub fn invest(config: &Config, opts: &RunOptions) -> Result<()> {
    let mut reporter = LogReporter;
    let (exchange, state) = connect(config, &mut reporter)?;
    print_holdings(&state);

    let summary = run_invest(&state, &exchange, config, opts, &mut reporter, confirm_prompt)?;
    if opts.live && summary.accepted > 0 {
        exchange.save()?;
        info!("saved balances to {}", config.snapshot_path().display());
    }
    Ok(())
}
