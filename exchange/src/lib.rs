//! Market-data and exchange gateways for cryptodex.
//!
//! Implementations of [`cryptodex::MarketDataProvider`] and
//! [`cryptodex::ExchangeGateway`]:
//!
//! - **Mock** ([`mock`]): in-memory, configurable, records submissions
//! - **Paper** ([`paper`]): JSON snapshot file, fills applied to local balances

pub mod error;
pub mod mock;
pub mod paper;
pub mod symbols;

pub use error::ExchangeError;
pub use mock::{FillMode, MockExchange, MockMarketData, RecordedOrder};
pub use paper::{PaperExchange, PaperSnapshot, PairInfo};
pub use symbols::SymbolMap;
