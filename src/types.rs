//! Core types: Symbol, ExchangeData

use std::collections::BTreeMap;
use std::fmt;

/// Exchange-normalized asset identifier (e.g. `xxbt` for bitcoin on Kraken).
///
/// Always lowercase and trimmed. Two symbols compare equal iff their
/// normalized forms match, so `Symbol::new("XETH") == Symbol::new("xeth")`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Symbol(String);

impl Symbol {
    /// Create a symbol, normalizing case and whitespace.
    ///
    /// # Panics
    ///
    /// Panics if `s` is empty after trimming. Use [`Symbol::try_new`] for
    /// untrusted input.
    #[track_caller]
    pub fn new(s: &str) -> Self {
        Self::try_new(s).unwrap_or_else(|| panic!("symbol must not be empty: {s:?}"))
    }

    /// Create a symbol, returning `None` for blank input.
    pub fn try_new(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Symbol(trimmed.to_lowercase()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Padding/alignment flags apply to the inner string.
        fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<String> for Symbol {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Symbol::try_new(&value).ok_or_else(|| "symbol must not be empty".to_string())
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

/// Opaque per-asset data an exchange needs to place an order
/// (trading-pair name and the like).
///
/// Produced by the exchange gateway, carried through holdings and orders,
/// and handed back to the gateway on submission. The engine never reads it.
pub type ExchangeData = BTreeMap<String, String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_normalizes() {
        assert_eq!(Symbol::new(" XXBT "), Symbol::new("xxbt"));
        assert_eq!(Symbol::new("XETH").as_str(), "xeth");
    }

    #[test]
    fn symbol_rejects_blank() {
        assert!(Symbol::try_new("").is_none());
        assert!(Symbol::try_new("   ").is_none());
    }

    #[test]
    #[should_panic(expected = "symbol must not be empty")]
    fn symbol_new_panics_on_blank() {
        let _ = Symbol::new("");
    }

    #[test]
    fn symbol_display_pads() {
        assert_eq!(format!("{:>6}", Symbol::new("dot")), "   dot");
        assert_eq!(format!("{:<6}|", Symbol::new("dot")), "dot   |");
    }

    #[test]
    fn symbol_ordering() {
        assert!(Symbol::new("ada") < Symbol::new("xxbt"));
    }
}
