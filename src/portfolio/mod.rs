//! Portfolio state: the holdings ledger and the operations that build,
//! refresh, and trade against it.

mod ledger;

use crate::allocation::{cap_targets, compute_allocation, compute_drift, compute_sqrt_weights};
use crate::error::{Error, Result};
use crate::event::{Reporter, Warning};
use crate::gateway::{ExchangeGateway, MarketDataProvider};
use crate::holding::{Holding, total_active_value};
use crate::order::Order;
use crate::predict::predict;
use crate::rebalance::{InvestOptions, invest};
use crate::strategy::Strategy;
use crate::types::Symbol;

/// The holdings ledger for one strategy.
///
/// Built by [`connect`](Self::connect), kept current by
/// [`refresh`](Self::refresh). Holdings keep their connect-time state and
/// order for the lifetime of the value.
#[derive(Clone, Debug)]
pub struct PortfolioState {
    strategy: Strategy,
    holdings: Vec<Holding>,
}

impl PortfolioState {
    /// Build the ledger from scratch.
    ///
    /// Ranks `market`'s assets against what `exchange` can trade and what is
    /// already owned, assigns square-root targets (capped at the strategy's
    /// `max_weight`, if any), then prices every holding in one batched
    /// metadata call.
    ///
    /// Per-asset problems are reported and do not fail the call. A cap that
    /// cannot be honored is reported as [`Warning::RedistributionDivergence`]
    /// and the uncapped targets are kept.
    ///
    /// # Errors
    ///
    /// Gateway failures, and [`Error::InvalidCap`] for a non-positive cap.
    pub fn connect(
        market: &dyn MarketDataProvider,
        exchange: &dyn ExchangeGateway,
        strategy: Strategy,
        reporter: &mut dyn Reporter,
    ) -> Result<Self> {
        let owned = exchange.owned_assets()?;
        let tradeable = exchange.tradeable_assets(&strategy.currency)?;
        let markets = market.list_markets(&strategy.currency)?;

        let holdings = ledger::rank_holdings(
            &markets,
            |generic| exchange.translate_symbol(generic),
            &tradeable,
            owned,
            &strategy,
        );

        let mut state = Self { strategy, holdings };
        state.assign_targets(reporter)?;
        state.load_metadata(exchange, reporter)?;
        state.recompute();
        Ok(state)
    }

    /// Wrap an already-built ledger. Allocation and drift are recomputed;
    /// targets are taken as given.
    pub fn from_holdings(strategy: Strategy, holdings: Vec<Holding>) -> Self {
        let mut state = Self { strategy, holdings };
        state.recompute();
        state
    }

    /// Pull fresh balances and prices for the existing ledger.
    ///
    /// No re-ranking: holdings keep their state and targets. A holding no
    /// longer reported as owned drops to an amount of 0.
    pub fn refresh(&mut self, exchange: &dyn ExchangeGateway, reporter: &mut dyn Reporter) -> Result<()> {
        let owned = exchange.owned_assets()?;
        for h in &mut self.holdings {
            h.amount = owned.get(&h.symbol).copied().unwrap_or(0.0);
        }
        self.load_metadata(exchange, reporter)?;
        self.recompute();
        Ok(())
    }

    fn assign_targets(&mut self, reporter: &mut dyn Reporter) -> Result<()> {
        compute_sqrt_weights(&mut self.holdings);
        let Some(cap) = self.strategy.max_weight else {
            return Ok(());
        };
        match cap_targets(&mut self.holdings, cap) {
            Ok(()) => Ok(()),
            Err(Error::RedistributionDivergence { overflow, cap }) => {
                reporter.report(Warning::RedistributionDivergence { overflow, cap });
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn load_metadata(&mut self, exchange: &dyn ExchangeGateway, reporter: &mut dyn Reporter) -> Result<()> {
        let symbols: Vec<Symbol> = self.holdings.iter().map(|h| h.symbol.clone()).collect();
        let metadata = exchange.asset_metadata(&symbols, &self.strategy.currency)?;
        ledger::apply_metadata(&mut self.holdings, metadata, reporter);
        Ok(())
    }

    fn recompute(&mut self) {
        compute_allocation(&mut self.holdings);
        compute_drift(&mut self.holdings);
    }

    // === Accessors ===

    #[inline]
    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    #[inline]
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    #[inline]
    pub fn currency(&self) -> &str {
        &self.strategy.currency
    }

    pub fn holding(&self, symbol: &Symbol) -> Option<&Holding> {
        self.holdings.iter().find(|h| &h.symbol == symbol)
    }

    /// Value of the Active holdings, the allocation denominator.
    pub fn total_value(&self) -> f64 {
        total_active_value(&self.holdings)
    }

    /// Value of every holding, including Frozen and Stale ones.
    pub fn total_value_all(&self) -> f64 {
        self.holdings.iter().map(Holding::value).sum()
    }

    // === Trading ===

    /// Orders that invest `amount` (negative to withdraw), using the
    /// strategy's funding priority. See [`invest`](crate::rebalance::invest).
    pub fn invest(&self, amount: f64, rebalance: bool, reporter: &mut dyn Reporter) -> Vec<Order> {
        let opts = InvestOptions {
            rebalance,
            funding_priority: self.strategy.funding_priority,
        };
        invest(&self.holdings, &self.strategy.currency, amount, opts, reporter)
    }

    /// Active holdings as they would look after `orders`, with drift
    /// recomputed against the unchanged targets.
    pub fn predict(&self, orders: &[Order]) -> Vec<Holding> {
        let mut predicted = predict(&self.holdings, orders);
        compute_drift(&mut predicted);
        predicted
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use rustc_hash::{FxHashMap, FxHashSet};

    use super::*;
    use crate::gateway::{GatewayError, MarketAsset, SubmitOutcome};
    use crate::holding::{AssetMetadata, HoldingState};

    struct Market(Vec<MarketAsset>);

    impl MarketDataProvider for Market {
        fn list_markets(&self, _currency: &str) -> std::result::Result<Vec<MarketAsset>, GatewayError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct Exchange {
        owned: RefCell<FxHashMap<Symbol, f64>>,
        prices: RefCell<FxHashMap<Symbol, f64>>,
        offline: bool,
    }

    impl Exchange {
        fn with(owned: &[(&str, f64)], prices: &[(&str, f64)]) -> Self {
            let map = |xs: &[(&str, f64)]| xs.iter().map(|(s, v)| (Symbol::new(s), *v)).collect();
            Self {
                owned: RefCell::new(map(owned)),
                prices: RefCell::new(map(prices)),
                offline: false,
            }
        }
    }

    impl ExchangeGateway for Exchange {
        fn translate_symbol(&self, generic: &str) -> Symbol {
            if generic == "btc" { Symbol::new("xxbt") } else { Symbol::new(generic) }
        }

        fn tradeable_assets(&self, _currency: &str) -> std::result::Result<FxHashSet<Symbol>, GatewayError> {
            if self.offline {
                return Err(GatewayError::Connection("offline".into()));
            }
            Ok(self.prices.borrow().keys().cloned().collect())
        }

        fn owned_assets(&self) -> std::result::Result<FxHashMap<Symbol, f64>, GatewayError> {
            Ok(self.owned.borrow().clone())
        }

        fn asset_metadata(
            &self,
            symbols: &[Symbol],
            _currency: &str,
        ) -> std::result::Result<FxHashMap<Symbol, AssetMetadata>, GatewayError> {
            let prices = self.prices.borrow();
            Ok(symbols
                .iter()
                .filter_map(|s| {
                    prices.get(s).map(|&price| {
                        (
                            s.clone(),
                            AssetMetadata {
                                price,
                                ..AssetMetadata::default()
                            },
                        )
                    })
                })
                .collect())
        }

        fn submit_order(&self, _order: &Order, _mock: bool) -> std::result::Result<SubmitOutcome, GatewayError> {
            Ok(SubmitOutcome::Accepted(String::new()))
        }
    }

    fn market() -> Market {
        Market(vec![
            MarketAsset::new("btc", "Bitcoin", 900.0),
            MarketAsset::new("eth", "Ethereum", 100.0),
            MarketAsset::new("ltc", "Litecoin", 25.0),
            MarketAsset::new("doge", "Dogecoin", 4.0),
        ])
    }

    fn priced_all() -> Vec<(&'static str, f64)> {
        vec![("xxbt", 100.0), ("eth", 10.0), ("ltc", 1.0), ("doge", 1.0)]
    }

    #[test]
    fn connect_builds_weighted_ledger() {
        let ex = Exchange::with(&[("xxbt", 3.0), ("eth", 10.0)], &priced_all());
        let mut warnings = Vec::new();
        let state = PortfolioState::connect(&market(), &ex, Strategy::new("eur", 2, 1), &mut warnings).unwrap();

        assert!(warnings.is_empty());
        let hs = state.holdings();
        assert_eq!(hs.len(), 3);
        // sqrt(900) = 30, sqrt(100) = 10 → 75 / 25
        assert!((hs[0].target - 75.0).abs() < 1e-9);
        assert!((hs[1].target - 25.0).abs() < 1e-9);
        assert_eq!(hs[2].state, HoldingState::Frozen);
        assert_eq!(hs[2].target, 0.0);
        // values 300 / 100
        assert!((hs[0].allocation - 75.0).abs() < 1e-9);
        assert!(hs[0].drift.abs() < 1e-9);
        assert_eq!(state.total_value(), 400.0);
    }

    #[test]
    fn connect_applies_weight_cap() {
        let ex = Exchange::with(&[], &priced_all());
        let strategy = Strategy::new("eur", 2, 0).with_max_weight(60.0);
        let state = PortfolioState::connect(&market(), &ex, strategy, &mut Vec::new()).unwrap();
        let hs = state.holdings();
        assert!((hs[0].target - 60.0).abs() < 1e-9);
        assert!((hs[1].target - 40.0).abs() < 1e-9);
    }

    #[test]
    fn unreachable_cap_is_reported_and_uncapped_targets_kept() {
        let ex = Exchange::with(&[], &priced_all());
        let strategy = Strategy::new("eur", 2, 0).with_max_weight(40.0);
        let mut warnings = Vec::new();
        let state = PortfolioState::connect(&market(), &ex, strategy, &mut warnings).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind(), "redistribution_divergence");
        assert!((state.holdings()[0].target - 75.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_cap_is_fatal() {
        let ex = Exchange::with(&[], &priced_all());
        let strategy = Strategy::new("eur", 2, 0).with_max_weight(0.0);
        let err = PortfolioState::connect(&market(), &ex, strategy, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidCap(_)));
    }

    #[test]
    fn gateway_failure_propagates() {
        let mut ex = Exchange::with(&[], &priced_all());
        ex.offline = true;
        let err = PortfolioState::connect(&market(), &ex, Strategy::new("eur", 2, 0), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, Error::Gateway(GatewayError::Connection(_))));
    }

    #[test]
    fn refresh_rereads_prices_and_balances() {
        let ex = Exchange::with(&[("xxbt", 1.0), ("eth", 10.0)], &priced_all());
        let mut state = PortfolioState::connect(&market(), &ex, Strategy::new("eur", 2, 0), &mut Vec::new()).unwrap();
        assert_eq!(state.total_value(), 200.0);

        ex.prices.borrow_mut().insert(Symbol::new("xxbt"), 300.0);
        ex.owned.borrow_mut().remove(&Symbol::new("eth"));
        state.refresh(&ex, &mut Vec::new()).unwrap();

        assert_eq!(state.holdings().len(), 2);
        assert_eq!(state.holdings()[1].amount, 0.0);
        assert_eq!(state.total_value(), 300.0);
        assert!((state.holdings()[0].allocation - 100.0).abs() < 1e-9);
        assert!((state.holdings()[0].drift - 25.0).abs() < 1e-9);
    }

    #[test]
    fn invest_then_predict_reaches_targets() {
        let ex = Exchange::with(&[("xxbt", 1.0), ("eth", 10.0)], &priced_all());
        let state = PortfolioState::connect(&market(), &ex, Strategy::new("eur", 2, 0), &mut Vec::new()).unwrap();

        let mut warnings = Vec::new();
        let orders = state.invest(200.0, true, &mut warnings);
        assert!(warnings.is_empty());

        let predicted = state.predict(&orders);
        assert!((predicted[0].allocation - 75.0).abs() < 1e-6);
        assert!((predicted[1].allocation - 25.0).abs() < 1e-6);
        assert!(predicted.iter().all(|h| h.drift.abs() < 1e-6));
    }

    #[test]
    fn from_holdings_recomputes_allocation() {
        let mut a = Holding::new(Symbol::new("a"), "A", 1.0, HoldingState::Active)
            .with_amount(3.0)
            .with_metadata(AssetMetadata {
                price: 1.0,
                ..AssetMetadata::default()
            });
        a.target = 100.0;
        let state = PortfolioState::from_holdings(Strategy::new("eur", 1, 0), vec![a]);
        assert_eq!(state.holdings()[0].allocation, 100.0);
        assert!(state.holding(&Symbol::new("a")).is_some());
    }
}
