//! Translation from market-data symbols to exchange symbols.

use cryptodex::Symbol;
use rustc_hash::FxHashMap;

/// Kraken's legacy asset codes for the majors.
pub const KRAKEN_ALIASES: &[(&str, &str)] = &[
    ("btc", "xxbt"),
    ("eth", "xeth"),
    ("xrp", "xxrp"),
    ("ltc", "xltc"),
    ("xlm", "xxlm"),
    ("doge", "xxdg"),
];

/// Generic → exchange symbol table. Symbols without an entry translate to
/// themselves (lowercased).
#[derive(Clone, Debug, Default)]
pub struct SymbolMap {
    aliases: FxHashMap<String, Symbol>,
}

impl SymbolMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map preloaded with [`KRAKEN_ALIASES`].
    pub fn kraken() -> Self {
        let mut map = Self::new();
        for (generic, exchange) in KRAKEN_ALIASES {
            map.insert(generic, Symbol::new(exchange));
        }
        map
    }

    pub fn insert(&mut self, generic: &str, exchange: Symbol) {
        self.aliases.insert(generic.trim().to_lowercase(), exchange);
    }

    /// Translate a generic symbol.
    ///
    /// A blank generic symbol has no sensible translation; it maps to `?`,
    /// which no exchange lists.
    pub fn translate(&self, generic: &str) -> Symbol {
        let key = generic.trim().to_lowercase();
        if let Some(sym) = self.aliases.get(&key) {
            return sym.clone();
        }
        Symbol::try_new(&key).unwrap_or_else(|| Symbol::new("?"))
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for SymbolMap {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (generic, exchange) in iter {
            if let Some(sym) = Symbol::try_new(exchange) {
                map.insert(generic, sym);
            }
        }
        map
    }
}
