//! Ledger construction: ranking market data into holdings and attaching
//! exchange metadata.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::event::{Reporter, Warning};
use crate::gateway::MarketAsset;
use crate::holding::{AssetMetadata, Holding, HoldingState};
use crate::strategy::Strategy;
use crate::types::Symbol;

/// Build holdings from ranked market data.
///
/// Walks `markets` in order (descending market cap). Excluded assets are
/// skipped after being removed from `owned`, so an excluded position is not
/// picked up later. Untradeable assets are skipped. Eligible assets are
/// ranked: the first `active_asset_count` are Active, the next
/// `frozen_asset_count` Frozen, the rest Stale.
///
/// An asset inside the Active + Frozen window is always added. Beyond it,
/// only assets owned with a nonzero amount are added. The walk stops once the
/// window is full and every owned asset has been seen.
pub(crate) fn rank_holdings<F>(
    markets: &[MarketAsset],
    translate: F,
    tradeable: &FxHashSet<Symbol>,
    mut owned: FxHashMap<Symbol, f64>,
    strategy: &Strategy,
) -> Vec<Holding>
where
    F: Fn(&str) -> Symbol,
{
    let window = strategy.window();
    let mut holdings: Vec<Holding> = Vec::new();
    let mut rank = 0usize;

    for asset in markets {
        if rank >= window && owned.is_empty() {
            break;
        }

        let symbol = translate(&asset.symbol);

        if strategy.is_excluded(&asset.symbol) {
            owned.remove(&symbol);
            continue;
        }
        if !tradeable.contains(&symbol) {
            continue;
        }
        // Two provider entries can map onto one exchange symbol; first wins.
        if holdings.iter().any(|h| h.symbol == symbol) {
            continue;
        }

        let state = if rank < strategy.active_asset_count {
            HoldingState::Active
        } else if rank < window {
            HoldingState::Frozen
        } else {
            HoldingState::Stale
        };
        let in_window = rank < window;
        rank += 1;

        let amount = owned.remove(&symbol).unwrap_or(0.0);
        if in_window || amount > 0.0 {
            holdings.push(
                Holding::new(symbol, asset.name.clone(), asset.market_cap, state).with_amount(amount),
            );
        }
    }

    holdings
}

/// Attach trading metadata to every holding.
///
/// A holding with no entry in `metadata` loses any previous pricing and is
/// reported as [`Warning::AssetMetadataMissing`].
pub(crate) fn apply_metadata(
    holdings: &mut [Holding],
    mut metadata: FxHashMap<Symbol, AssetMetadata>,
    reporter: &mut dyn Reporter,
) {
    for h in holdings.iter_mut() {
        h.metadata = metadata.remove(&h.symbol);
        if h.metadata.is_none() {
            reporter.report(Warning::AssetMetadataMissing {
                symbol: h.symbol.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markets() -> Vec<MarketAsset> {
        vec![
            MarketAsset::new("btc", "Bitcoin", 900.0),
            MarketAsset::new("eth", "Ethereum", 400.0),
            MarketAsset::new("usdt", "Tether", 300.0),
            MarketAsset::new("xrp", "XRP", 200.0),
            MarketAsset::new("ada", "Cardano", 100.0),
            MarketAsset::new("doge", "Dogecoin", 50.0),
            MarketAsset::new("dot", "Polkadot", 25.0),
        ]
    }

    fn translate(s: &str) -> Symbol {
        match s {
            "btc" => Symbol::new("xxbt"),
            "eth" => Symbol::new("xeth"),
            other => Symbol::new(other),
        }
    }

    fn all_tradeable() -> FxHashSet<Symbol> {
        ["xxbt", "xeth", "usdt", "xrp", "ada", "doge", "dot"]
            .iter()
            .map(|s| Symbol::new(s))
            .collect()
    }

    fn symbols(hs: &[Holding]) -> Vec<&str> {
        hs.iter().map(|h| h.symbol.as_str()).collect()
    }

    #[test]
    fn classifies_by_rank() {
        let strategy = Strategy::new("eur", 2, 1).excluding(["usdt"]);
        let hs = rank_holdings(&markets(), translate, &all_tradeable(), FxHashMap::default(), &strategy);
        assert_eq!(symbols(&hs), ["xxbt", "xeth", "xrp"]);
        assert_eq!(hs[0].state, HoldingState::Active);
        assert_eq!(hs[1].state, HoldingState::Active);
        assert_eq!(hs[2].state, HoldingState::Frozen);
    }

    #[test]
    fn owned_assets_beyond_window_are_stale() {
        let strategy = Strategy::new("eur", 2, 0).excluding(["usdt"]);
        let owned = FxHashMap::from_iter([(Symbol::new("doge"), 1_000.0), (Symbol::new("xeth"), 2.0)]);
        let hs = rank_holdings(&markets(), translate, &all_tradeable(), owned, &strategy);
        assert_eq!(symbols(&hs), ["xxbt", "xeth", "doge"]);
        assert_eq!(hs[1].amount, 2.0);
        assert_eq!(hs[2].state, HoldingState::Stale);
        assert_eq!(hs[2].amount, 1_000.0);
    }

    #[test]
    fn zero_balance_beyond_window_is_dropped() {
        let strategy = Strategy::new("eur", 1, 0);
        let owned = FxHashMap::from_iter([(Symbol::new("ada"), 0.0)]);
        let hs = rank_holdings(&markets(), translate, &all_tradeable(), owned, &strategy);
        assert_eq!(symbols(&hs), ["xxbt"]);
    }

    #[test]
    fn excluded_owned_asset_is_not_retained() {
        let strategy = Strategy::new("eur", 1, 0).excluding(["USDT"]);
        let owned = FxHashMap::from_iter([(Symbol::new("usdt"), 500.0)]);
        let hs = rank_holdings(&markets(), translate, &all_tradeable(), owned, &strategy);
        assert_eq!(symbols(&hs), ["xxbt"]);
    }

    #[test]
    fn untradeable_assets_do_not_take_a_rank() {
        let strategy = Strategy::new("eur", 2, 0);
        let tradeable: FxHashSet<Symbol> = ["xxbt", "xrp"].iter().map(|s| Symbol::new(s)).collect();
        let hs = rank_holdings(&markets(), translate, &tradeable, FxHashMap::default(), &strategy);
        assert_eq!(symbols(&hs), ["xxbt", "xrp"]);
        assert!(hs.iter().all(|h| h.state == HoldingState::Active));
    }

    #[test]
    fn stops_when_window_full_and_nothing_owned() {
        let strategy = Strategy::new("eur", 1, 0);
        let hs = rank_holdings(&markets(), translate, &all_tradeable(), FxHashMap::default(), &strategy);
        assert_eq!(hs.len(), 1);
    }

    #[test]
    fn duplicate_translation_keeps_first() {
        let mut m = markets();
        m.insert(1, MarketAsset::new("xbt", "Bitcoin (alt)", 800.0));
        let translate = |s: &str| if s == "xbt" { Symbol::new("xxbt") } else { translate(s) };
        let strategy = Strategy::new("eur", 3, 0);
        let hs = rank_holdings(&m, translate, &all_tradeable(), FxHashMap::default(), &strategy);
        assert_eq!(symbols(&hs), ["xxbt", "xeth", "usdt"]);
        assert_eq!(hs[0].name, "Bitcoin");
    }

    #[test]
    fn missing_metadata_is_reported() {
        let strategy = Strategy::new("eur", 2, 0);
        let mut hs = rank_holdings(&markets(), translate, &all_tradeable(), FxHashMap::default(), &strategy);
        let metadata = FxHashMap::from_iter([(
            Symbol::new("xxbt"),
            AssetMetadata {
                price: 30_000.0,
                ..AssetMetadata::default()
            },
        )]);
        let mut warnings = Vec::new();
        apply_metadata(&mut hs, metadata, &mut warnings);
        assert!(hs[0].is_priced());
        assert!(hs[1].metadata.is_none());
        assert_eq!(
            warnings,
            vec![Warning::AssetMetadataMissing {
                symbol: Symbol::new("xeth")
            }]
        );
    }
}
