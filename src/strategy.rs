//! Strategy parameters consumed by the engine.

use rustc_hash::FxHashSet;

/// Order in which underweight holdings are funded during rebalancing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum FundingPriority {
    /// Ledger order, i.e. descending market-cap rank.
    #[default]
    LedgerOrder,
    /// Most underweight (most negative drift) first; ties keep ledger order.
    LargestDriftFirst,
}

/// How the portfolio should be composed.
#[derive(Clone, Debug, PartialEq)]
pub struct Strategy {
    /// Fiat currency all prices and funds are expressed in (e.g. `eur`).
    pub currency: String,
    /// Number of top-ranked assets that get a target.
    pub active_asset_count: usize,
    /// Number of assets after the active window that are tracked but frozen.
    pub frozen_asset_count: usize,
    /// Provider symbols never added to the ledger, lowercase.
    pub excluded_symbols: FxHashSet<String>,
    /// Optional cap on any single target, in percent.
    pub max_weight: Option<f64>,
    pub funding_priority: FundingPriority,
}

impl Strategy {
    pub fn new(currency: &str, active_asset_count: usize, frozen_asset_count: usize) -> Self {
        Self {
            currency: currency.to_lowercase(),
            active_asset_count,
            frozen_asset_count,
            excluded_symbols: FxHashSet::default(),
            max_weight: None,
            funding_priority: FundingPriority::default(),
        }
    }

    /// Exclude provider symbols (builder style). Case-insensitive.
    pub fn excluding<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.excluded_symbols
            .extend(symbols.into_iter().map(|s| s.as_ref().trim().to_lowercase()));
        self
    }

    /// Cap any single target at `max_weight` percent (builder style).
    pub fn with_max_weight(mut self, max_weight: f64) -> Self {
        self.max_weight = Some(max_weight);
        self
    }

    pub fn with_funding_priority(mut self, priority: FundingPriority) -> Self {
        self.funding_priority = priority;
        self
    }

    /// Size of the Active + Frozen window.
    #[inline]
    pub fn window(&self) -> usize {
        self.active_asset_count + self.frozen_asset_count
    }

    /// Whether a provider symbol is excluded.
    pub fn is_excluded(&self, generic_symbol: &str) -> bool {
        self.excluded_symbols
            .contains(&generic_symbol.trim().to_lowercase())
    }
}
