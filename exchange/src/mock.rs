//! Mock gateways for testing: configurable market data and exchange
//! behavior without network calls.
//!
//! ```
//! use cryptodex_exchange::mock::{FillMode, MockExchange, MockMarketData};
//!
//! let market = MockMarketData::builder()
//!     .with_asset("btc", "Bitcoin", 1.2e12)
//!     .with_asset("eth", "Ethereum", 4.0e11)
//!     .build();
//!
//! let exchange = MockExchange::builder()
//!     .kraken_aliases()
//!     .fill_mode(FillMode::Accept)
//!     .with_market("xxbt", 60_000.0, 0.26, 0.0001)
//!     .with_market("xeth", 3_000.0, 0.26, 0.004)
//!     .with_balance("xxbt", 0.25)
//!     .build();
//! ```

use std::sync::{Mutex, PoisonError};

use cryptodex::{
    AssetMetadata, ExchangeData, ExchangeGateway, GatewayError, MarketAsset, MarketDataProvider,
    Order, Side, SubmitOutcome, Symbol,
};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::symbols::SymbolMap;

// ============================================================================
// Market data
// ============================================================================

/// Builder for `MockMarketData`.
pub struct MockMarketDataBuilder {
    assets: Vec<MarketAsset>,
    offline: bool,
}

impl MockMarketDataBuilder {
    pub fn with_asset(mut self, symbol: &str, name: &str, market_cap: f64) -> Self {
        self.assets.push(MarketAsset::new(symbol, name, market_cap));
        self
    }

    /// Every call fails with a connection error.
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    pub fn build(mut self) -> MockMarketData {
        self.assets
            .sort_by(|a, b| b.market_cap.total_cmp(&a.market_cap));
        MockMarketData {
            assets: self.assets,
            offline: self.offline,
        }
    }
}

/// Fixed market listing, served in descending market-cap order.
pub struct MockMarketData {
    assets: Vec<MarketAsset>,
    offline: bool,
}

impl MockMarketData {
    pub fn builder() -> MockMarketDataBuilder {
        MockMarketDataBuilder {
            assets: Vec::new(),
            offline: false,
        }
    }
}

impl MarketDataProvider for MockMarketData {
    fn list_markets(&self, _currency: &str) -> Result<Vec<MarketAsset>, GatewayError> {
        if self.offline {
            return Err(GatewayError::Connection("mock: market data offline".into()));
        }
        Ok(self.assets.clone())
    }
}

// ============================================================================
// Exchange
// ============================================================================

/// How the mock exchange handles submitted orders.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FillMode {
    /// Orders meeting the minimum size are accepted; smaller ones rejected.
    #[default]
    Accept,
    /// All orders are rejected.
    Reject,
    /// Every submission fails at the transport level.
    Disconnect,
}

/// A recorded order submission for assertion in tests.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedOrder {
    pub symbol: Symbol,
    pub side: Side,
    pub units: f64,
    pub mock: bool,
}

#[derive(Clone, Debug)]
struct Market {
    price: f64,
    fee: f64,
    minimum_order: f64,
}

/// Builder for `MockExchange`.
pub struct MockExchangeBuilder {
    currency: String,
    fill_mode: FillMode,
    symbols: SymbolMap,
    markets: FxHashMap<Symbol, Market>,
    balances: FxHashMap<Symbol, f64>,
    unpriced: FxHashSet<Symbol>,
}

impl MockExchangeBuilder {
    /// Quote currency the markets trade against (default `eur`).
    pub fn currency(mut self, currency: &str) -> Self {
        self.currency = currency.to_lowercase();
        self
    }

    pub fn fill_mode(mut self, mode: FillMode) -> Self {
        self.fill_mode = mode;
        self
    }

    pub fn kraken_aliases(mut self) -> Self {
        self.symbols = SymbolMap::kraken();
        self
    }

    pub fn with_alias(mut self, generic: &str, exchange: &str) -> Self {
        self.symbols.insert(generic, Symbol::new(exchange));
        self
    }

    pub fn with_market(mut self, symbol: &str, price: f64, fee: f64, minimum_order: f64) -> Self {
        self.markets.insert(
            Symbol::new(symbol),
            Market {
                price,
                fee,
                minimum_order,
            },
        );
        self
    }

    pub fn with_balance(mut self, symbol: &str, amount: f64) -> Self {
        self.balances.insert(Symbol::new(symbol), amount);
        self
    }

    /// Tradeable, but the metadata call returns nothing for it.
    pub fn without_metadata(mut self, symbol: &str) -> Self {
        self.unpriced.insert(Symbol::new(symbol));
        self
    }

    pub fn build(self) -> MockExchange {
        MockExchange {
            currency: self.currency,
            fill_mode: self.fill_mode,
            symbols: self.symbols,
            markets: self.markets,
            balances: self.balances,
            unpriced: self.unpriced,
            submitted_orders: Mutex::new(Vec::new()),
        }
    }
}

/// A mock exchange that records submitted orders and returns configurable
/// responses.
pub struct MockExchange {
    currency: String,
    fill_mode: FillMode,
    symbols: SymbolMap,
    markets: FxHashMap<Symbol, Market>,
    balances: FxHashMap<Symbol, f64>,
    unpriced: FxHashSet<Symbol>,
    submitted_orders: Mutex<Vec<RecordedOrder>>,
}

impl MockExchange {
    pub fn builder() -> MockExchangeBuilder {
        MockExchangeBuilder {
            currency: "eur".into(),
            fill_mode: FillMode::default(),
            symbols: SymbolMap::new(),
            markets: FxHashMap::default(),
            balances: FxHashMap::default(),
            unpriced: FxHashSet::default(),
        }
    }

    /// Get all orders that were submitted (for assertion in tests).
    pub fn submitted_orders(&self) -> Vec<RecordedOrder> {
        self.submitted_orders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn check_currency(&self, currency: &str) -> Result<(), GatewayError> {
        if currency.eq_ignore_ascii_case(&self.currency) {
            Ok(())
        } else {
            Err(GatewayError::UnsupportedCurrency(currency.to_string()))
        }
    }

    fn pair_name(&self, symbol: &Symbol) -> String {
        format!("{}{}", symbol.as_str(), self.currency).to_uppercase()
    }
}

impl ExchangeGateway for MockExchange {
    fn translate_symbol(&self, generic: &str) -> Symbol {
        self.symbols.translate(generic)
    }

    fn tradeable_assets(&self, currency: &str) -> Result<FxHashSet<Symbol>, GatewayError> {
        self.check_currency(currency)?;
        Ok(self.markets.keys().cloned().collect())
    }

    fn owned_assets(&self) -> Result<FxHashMap<Symbol, f64>, GatewayError> {
        Ok(self.balances.clone())
    }

    fn asset_metadata(
        &self,
        symbols: &[Symbol],
        currency: &str,
    ) -> Result<FxHashMap<Symbol, AssetMetadata>, GatewayError> {
        self.check_currency(currency)?;
        let metadata = symbols
            .iter()
            .filter(|s| !self.unpriced.contains(*s))
            .filter_map(|s| {
                let market = self.markets.get(s)?;
                let mut exchange_data = ExchangeData::new();
                exchange_data.insert("pair".into(), self.pair_name(s));
                Some((
                    s.clone(),
                    AssetMetadata {
                        price: market.price,
                        fee: market.fee,
                        minimum_order: market.minimum_order,
                        exchange_data,
                    },
                ))
            })
            .collect();
        Ok(metadata)
    }

    fn submit_order(&self, order: &Order, mock: bool) -> Result<SubmitOutcome, GatewayError> {
        // Record the order
        self.submitted_orders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedOrder {
                symbol: order.symbol.clone(),
                side: order.side,
                units: order.units,
                mock,
            });

        match self.fill_mode {
            FillMode::Disconnect => Err(GatewayError::Connection("mock: exchange unreachable".into())),
            FillMode::Reject => Ok(SubmitOutcome::Rejected("mock: order rejected".into())),
            FillMode::Accept => {
                let Some(market) = self.markets.get(&order.symbol) else {
                    return Ok(SubmitOutcome::Rejected(format!("unknown asset {}", order.symbol)));
                };
                if order.units < market.minimum_order {
                    return Ok(SubmitOutcome::Rejected("volume minimum not met".into()));
                }
                Ok(SubmitOutcome::Accepted(format!(
                    "{} {:.8} {}",
                    order.side.as_str(),
                    order.units,
                    self.pair_name(&order.symbol)
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xbt() -> Symbol {
        Symbol::new("xxbt")
    }

    fn order(symbol: Symbol, units: f64) -> Order {
        Order {
            symbol,
            currency: "eur".into(),
            units,
            cost: -units * 60_000.0,
            side: Side::Buy,
            minimum_order: 0.0001,
            fee: 0.26,
            exchange_data: Default::default(),
        }
    }

    fn exchange(mode: FillMode) -> MockExchange {
        MockExchange::builder()
            .kraken_aliases()
            .fill_mode(mode)
            .with_market("xxbt", 60_000.0, 0.26, 0.0001)
            .with_balance("xxbt", 0.5)
            .build()
    }

    #[test]
    fn market_data_sorted_by_cap() {
        let market = MockMarketData::builder()
            .with_asset("eth", "Ethereum", 4.0e11)
            .with_asset("btc", "Bitcoin", 1.2e12)
            .build();
        let assets = market.list_markets("eur").unwrap();
        assert_eq!(assets[0].symbol, "btc");
        assert_eq!(assets[1].symbol, "eth");
    }

    #[test]
    fn offline_market_data_errors() {
        let market = MockMarketData::builder().offline().build();
        assert!(matches!(market.list_markets("eur"), Err(GatewayError::Connection(_))));
    }

    #[test]
    fn builder_basic() {
        let ex = exchange(FillMode::Accept);
        assert_eq!(ex.translate_symbol("btc"), xbt());
        assert!(ex.tradeable_assets("EUR").unwrap().contains(&xbt()));
        assert_eq!(ex.owned_assets().unwrap()[&xbt()], 0.5);

        let meta = ex.asset_metadata(&[xbt(), Symbol::new("ada")], "eur").unwrap();
        assert_eq!(meta.len(), 1);
        assert_eq!(meta[&xbt()].price, 60_000.0);
        assert_eq!(meta[&xbt()].exchange_data["pair"], "XXBTEUR");
    }

    #[test]
    fn unsupported_currency() {
        let ex = exchange(FillMode::Accept);
        assert!(matches!(
            ex.tradeable_assets("usd"),
            Err(GatewayError::UnsupportedCurrency(_))
        ));
    }

    #[test]
    fn without_metadata_is_tradeable_but_unpriced() {
        let ex = MockExchange::builder()
            .with_market("ada", 0.4, 0.26, 10.0)
            .without_metadata("ada")
            .build();
        assert!(ex.tradeable_assets("eur").unwrap().contains(&Symbol::new("ada")));
        assert!(ex.asset_metadata(&[Symbol::new("ada")], "eur").unwrap().is_empty());
    }

    #[test]
    fn submit_records_orders() {
        let ex = exchange(FillMode::Accept);
        let outcome = ex.submit_order(&order(xbt(), 0.01), true).unwrap();
        assert!(outcome.is_accepted());

        let recorded = ex.submitted_orders();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].symbol, xbt());
        assert_eq!(recorded[0].side, Side::Buy);
        assert!(recorded[0].mock);
    }

    #[test]
    fn undersized_order_rejected() {
        let ex = exchange(FillMode::Accept);
        let outcome = ex.submit_order(&order(xbt(), 0.00001), false).unwrap();
        assert_eq!(outcome, SubmitOutcome::Rejected("volume minimum not met".into()));
    }

    #[test]
    fn reject_mode() {
        let ex = exchange(FillMode::Reject);
        assert!(!ex.submit_order(&order(xbt(), 1.0), false).unwrap().is_accepted());
    }

    #[test]
    fn disconnect_mode() {
        let ex = exchange(FillMode::Disconnect);
        assert!(ex.submit_order(&order(xbt(), 1.0), false).is_err());
        assert_eq!(ex.submitted_orders().len(), 1);
    }
}
