//! # cryptodex
//!
//! A portfolio allocation and rebalancing engine for crypto assets.
//!
//! ## Features
//!
//! - **Square-root weighting**: targets proportional to `sqrt(market_cap)`,
//!   optionally capped per asset with mass-conserving redistribution
//! - **Ranked ledger**: Active / Frozen / Stale holdings built from market
//!   data, exchange tradeability, and existing positions
//! - **Rebalancing**: deposits and withdrawals turned into buy/sell orders,
//!   optionally selling overweight assets to fund underweight ones
//! - **Prediction**: simulate an order set without touching the ledger
//! - **No I/O**: data comes in through [`MarketDataProvider`] and
//!   [`ExchangeGateway`]; non-fatal problems go out through a [`Reporter`]
//!
//! ## Quick Start
//!
//! ```
//! use cryptodex::{AssetMetadata, Holding, HoldingState, PortfolioState, Side, Strategy, Symbol};
//!
//! let priced = |price| AssetMetadata { price, ..AssetMetadata::default() };
//! let mut btc = Holding::new(Symbol::new("xxbt"), "Bitcoin", 900.0, HoldingState::Active)
//!     .with_amount(8.0)
//!     .with_metadata(priced(100.0));
//! let mut eth = Holding::new(Symbol::new("xeth"), "Ethereum", 100.0, HoldingState::Active)
//!     .with_amount(20.0)
//!     .with_metadata(priced(10.0));
//! btc.target = 60.0;
//! eth.target = 40.0;
//!
//! let state = PortfolioState::from_holdings(Strategy::new("eur", 2, 0), vec![btc, eth]);
//! assert_eq!(state.holdings()[0].allocation, 80.0);
//!
//! // Rebalance without adding funds.
//! let mut warnings = Vec::new();
//! let orders = state.invest(0.0, true, &mut warnings);
//! assert_eq!(orders[0].side, Side::Sell);
//! assert_eq!(orders[1].side, Side::Buy);
//! assert!(warnings.is_empty());
//!
//! let predicted = state.predict(&orders);
//! assert!((predicted[0].allocation - 60.0).abs() < 1e-9);
//! ```
//!
//! ## Sign Convention
//!
//! [`Order::cost`] is the currency delta seen from the portfolio: negative
//! when currency is spent (buy), positive when it comes back (sell).
//! [`Order::units`] is always non-negative; the direction lives in
//! [`Order::side`].

pub mod allocation;
mod error;
mod event;
pub mod gateway;
mod holding;
mod order;
pub mod portfolio;
pub mod predict;
pub mod rebalance;
mod side;
mod strategy;
mod types;
pub mod validate;

// Re-export public API
pub use allocation::{
    EPSILON, cap_targets, clamp_and_redistribute, compute_allocation, compute_drift,
    compute_sqrt_weights,
};
pub use error::{Error, Result};
pub use event::{NullReporter, Reporter, Warning};
pub use gateway::{ExchangeGateway, GatewayError, MarketAsset, MarketDataProvider, SubmitOutcome};
pub use holding::{AssetMetadata, Holding, HoldingState, total_active_value};
pub use order::{FeeEstimate, Order, estimate_fees};
pub use portfolio::PortfolioState;
pub use predict::predict;
pub use rebalance::{InvestOptions, invest};
pub use side::Side;
pub use strategy::{FundingPriority, Strategy};
pub use types::{ExchangeData, Symbol};
pub use validate::{filter_invalid, flag_invalid};
