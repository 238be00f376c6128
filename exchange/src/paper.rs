//! Paper exchange backed by a JSON snapshot file.
//!
//! The snapshot holds everything both gateway traits need: a market listing
//! ranked by capitalization, owned balances, symbol aliases, and one trading
//! pair per (asset, currency). Mock submissions only validate; live
//! submissions fill immediately at the snapshot price and update the
//! in-memory balances, which [`PaperExchange::save`] writes back.
//!
//! ```json
//! {
//!   "markets": [{ "symbol": "btc", "name": "Bitcoin", "market_cap": 1.2e12 }],
//!   "balances": { "xxbt": 0.25 },
//!   "aliases": { "btc": "xxbt" },
//!   "pairs": {
//!     "xxbt": { "eur": { "pair": "XXBTZEUR", "price": 60000.0, "fee": 0.26, "minimum_order": 0.0001 } }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use cryptodex::{
    AssetMetadata, ExchangeData, ExchangeGateway, GatewayError, MarketAsset, MarketDataProvider,
    Order, Side, SubmitOutcome, Symbol,
};
use log::{debug, info};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::ExchangeError;
use crate::symbols::SymbolMap;

/// Tolerance when checking a sell against the held balance.
const BALANCE_TOLERANCE: f64 = 1e-12;

/// One tradeable pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairInfo {
    /// Exchange pair name, e.g. `XXBTZEUR`.
    pub pair: String,
    pub price: f64,
    /// Percent of trade value.
    #[serde(default)]
    pub fee: f64,
    /// In asset units.
    #[serde(default)]
    pub minimum_order: f64,
}

/// On-disk snapshot format.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PaperSnapshot {
    #[serde(default)]
    pub markets: Vec<MarketAsset>,
    #[serde(default)]
    pub balances: BTreeMap<String, f64>,
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    /// asset symbol → currency → pair
    #[serde(default)]
    pub pairs: BTreeMap<String, BTreeMap<String, PairInfo>>,
}

impl PaperSnapshot {
    /// Check symbols are non-blank and prices usable.
    pub fn validate(&self) -> Result<(), ExchangeError> {
        let blank = |s: &str| s.trim().is_empty();

        if let Some(m) = self.markets.iter().find(|m| blank(&m.symbol)) {
            return Err(ExchangeError::Invalid(format!("market {:?} has no symbol", m.name)));
        }
        if self.balances.keys().any(|s| blank(s)) {
            return Err(ExchangeError::Invalid("balance with blank symbol".into()));
        }
        if let Some((generic, _)) = self.aliases.iter().find(|(g, e)| blank(g) || blank(e)) {
            return Err(ExchangeError::Invalid(format!("blank alias for {generic:?}")));
        }
        for (symbol, quotes) in &self.pairs {
            if blank(symbol) {
                return Err(ExchangeError::Invalid("pair with blank asset symbol".into()));
            }
            for (currency, info) in quotes {
                if !info.price.is_finite() || info.price <= 0.0 {
                    return Err(ExchangeError::Invalid(format!(
                        "{symbol}/{currency}: price must be positive, got {}",
                        info.price
                    )));
                }
                if info.fee < 0.0 || info.minimum_order < 0.0 {
                    return Err(ExchangeError::Invalid(format!(
                        "{symbol}/{currency}: fee and minimum order must be >= 0"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Exchange and market-data provider over a [`PaperSnapshot`].
pub struct PaperExchange {
    path: Option<PathBuf>,
    markets: Vec<MarketAsset>,
    aliases: BTreeMap<String, String>,
    symbols: SymbolMap,
    /// (asset, currency) → pair
    pairs: FxHashMap<(Symbol, String), PairInfo>,
    balances: Mutex<FxHashMap<Symbol, f64>>,
    next_txid: AtomicU64,
}

impl PaperExchange {
    /// Load and validate a snapshot file.
    pub fn load(path: &Path) -> Result<Self, ExchangeError> {
        let content = std::fs::read_to_string(path).map_err(|e| ExchangeError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let snapshot: PaperSnapshot =
            serde_json::from_str(&content).map_err(|e| ExchangeError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;
        let mut exchange = Self::from_snapshot(snapshot)?;
        exchange.path = Some(path.to_path_buf());
        Ok(exchange)
    }

    pub fn from_snapshot(snapshot: PaperSnapshot) -> Result<Self, ExchangeError> {
        snapshot.validate()?;

        let symbols: SymbolMap = snapshot
            .aliases
            .iter()
            .map(|(g, e)| (g.as_str(), e.as_str()))
            .collect();

        let mut pairs = FxHashMap::default();
        for (symbol, quotes) in snapshot.pairs {
            let symbol = Symbol::new(&symbol);
            for (currency, info) in quotes {
                pairs.insert((symbol.clone(), currency.to_lowercase()), info);
            }
        }

        let balances = snapshot
            .balances
            .iter()
            .map(|(s, &amount)| (Symbol::new(s), amount))
            .collect();

        let mut markets = snapshot.markets;
        markets.sort_by(|a, b| b.market_cap.total_cmp(&a.market_cap));

        debug!(
            "paper exchange: {} markets, {} pairs, {} aliases",
            markets.len(),
            pairs.len(),
            symbols.len()
        );

        Ok(Self {
            path: None,
            markets,
            aliases: snapshot.aliases,
            symbols,
            pairs,
            balances: Mutex::new(balances),
            next_txid: AtomicU64::new(1),
        })
    }

    /// Snapshot file this exchange was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Current balance of `symbol` (0 if none).
    pub fn balance(&self, symbol: &Symbol) -> f64 {
        self.lock_balances().get(symbol).copied().unwrap_or(0.0)
    }

    /// Current state as a snapshot, including fills applied so far.
    pub fn snapshot(&self) -> PaperSnapshot {
        let mut pairs: BTreeMap<String, BTreeMap<String, PairInfo>> = BTreeMap::new();
        for ((symbol, currency), info) in &self.pairs {
            pairs
                .entry(symbol.as_str().to_string())
                .or_default()
                .insert(currency.clone(), info.clone());
        }
        PaperSnapshot {
            markets: self.markets.clone(),
            balances: self
                .lock_balances()
                .iter()
                .map(|(s, &a)| (s.as_str().to_string(), a))
                .collect(),
            aliases: self.aliases.clone(),
            pairs,
        }
    }

    /// Write the current state back to the file it was loaded from.
    pub fn save(&self) -> Result<(), ExchangeError> {
        let path = self
            .path
            .as_deref()
            .ok_or_else(|| ExchangeError::Invalid("exchange was not loaded from a file".into()))?;
        self.save_to(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ExchangeError> {
        let json = serde_json::to_string_pretty(&self.snapshot()).map_err(|e| ExchangeError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        std::fs::write(path, json).map_err(|e| ExchangeError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
        info!("saved paper balances to {}", path.display());
        Ok(())
    }

    fn lock_balances(&self) -> std::sync::MutexGuard<'_, FxHashMap<Symbol, f64>> {
        self.balances.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn pair(&self, symbol: &Symbol, currency: &str) -> Option<&PairInfo> {
        self.pairs.get(&(symbol.clone(), currency.to_lowercase()))
    }

    fn supports(&self, currency: &str) -> bool {
        let currency = currency.to_lowercase();
        self.pairs.keys().any(|(_, c)| *c == currency)
    }

    fn require_currency(&self, currency: &str) -> Result<(), GatewayError> {
        if self.supports(currency) {
            Ok(())
        } else {
            Err(GatewayError::UnsupportedCurrency(currency.to_string()))
        }
    }
}

impl MarketDataProvider for PaperExchange {
    fn list_markets(&self, currency: &str) -> Result<Vec<MarketAsset>, GatewayError> {
        self.require_currency(currency)?;
        Ok(self.markets.clone())
    }
}

impl ExchangeGateway for PaperExchange {
    fn translate_symbol(&self, generic: &str) -> Symbol {
        self.symbols.translate(generic)
    }

    fn tradeable_assets(&self, currency: &str) -> Result<FxHashSet<Symbol>, GatewayError> {
        self.require_currency(currency)?;
        let currency = currency.to_lowercase();
        Ok(self
            .pairs
            .keys()
            .filter(|(_, c)| *c == currency)
            .map(|(s, _)| s.clone())
            .collect())
    }

    fn owned_assets(&self) -> Result<FxHashMap<Symbol, f64>, GatewayError> {
        Ok(self.lock_balances().clone())
    }

    fn asset_metadata(
        &self,
        symbols: &[Symbol],
        currency: &str,
    ) -> Result<FxHashMap<Symbol, AssetMetadata>, GatewayError> {
        self.require_currency(currency)?;
        let mut metadata = FxHashMap::default();
        for symbol in symbols {
            let Some(info) = self.pair(symbol, currency) else {
                debug!("no {currency} pair for {symbol}");
                continue;
            };
            let mut exchange_data = ExchangeData::new();
            exchange_data.insert("pair".into(), info.pair.clone());
            metadata.insert(
                symbol.clone(),
                AssetMetadata {
                    price: info.price,
                    fee: info.fee,
                    minimum_order: info.minimum_order,
                    exchange_data,
                },
            );
        }
        Ok(metadata)
    }

    fn submit_order(&self, order: &Order, mock: bool) -> Result<SubmitOutcome, GatewayError> {
        let Some(info) = self.pair(&order.symbol, &order.currency) else {
            return Ok(SubmitOutcome::Rejected(format!(
                "unknown pair {}/{}",
                order.symbol, order.currency
            )));
        };
        if let Some(pair) = order.exchange_data.get("pair") {
            if *pair != info.pair {
                return Ok(SubmitOutcome::Rejected(format!(
                    "pair mismatch: order for {pair}, exchange lists {}",
                    info.pair
                )));
            }
        }
        if !order.units.is_finite() || order.units <= 0.0 {
            return Ok(SubmitOutcome::Rejected(format!("invalid volume {}", order.units)));
        }
        if order.units < info.minimum_order {
            return Ok(SubmitOutcome::Rejected(format!(
                "volume minimum not met: {:.8} < {}",
                order.units, info.minimum_order
            )));
        }

        let mut balances = self.lock_balances();
        let held = balances.get(&order.symbol).copied().unwrap_or(0.0);
        if order.side == Side::Sell && order.units > held + BALANCE_TOLERANCE {
            return Ok(SubmitOutcome::Rejected(format!(
                "insufficient {} balance: {:.8} held, {:.8} to sell",
                order.symbol, held, order.units
            )));
        }

        if mock {
            debug!("validated {} {:.8} {}", order.side.as_str(), order.units, info.pair);
            return Ok(SubmitOutcome::Accepted(format!(
                "validated: {} {:.8} {}",
                order.side.as_str(),
                order.units,
                info.pair
            )));
        }

        let after = (held + order.unit_delta()).max(0.0);
        balances.insert(order.symbol.clone(), after);
        let txid = self.next_txid.fetch_add(1, Ordering::Relaxed);
        info!(
            "filled {} {:.8} {} @ {} ({:.8} -> {:.8})",
            order.side.as_str(),
            order.units,
            info.pair,
            info.price,
            held,
            after
        );
        Ok(SubmitOutcome::Accepted(format!(
            "PAPER-{txid:06}: {} {:.8} {} @ {}",
            order.side.as_str(),
            order.units,
            info.pair,
            info.price
        )))
    }
}
