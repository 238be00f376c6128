//! Order side: Buy or Sell

use std::fmt;

/// Side of an order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Side implied by a signed unit delta.
    ///
    /// Pending deltas use the seller's convention: a negative delta means
    /// currency leaves the account, i.e. a buy. Zero maps to `Sell`.
    #[inline]
    pub fn from_delta(delta: f64) -> Self {
        if delta < 0.0 { Side::Buy } else { Side::Sell }
    }

    /// Effect on the held amount: `+1.0` for buys, `-1.0` for sells.
    #[inline]
    pub fn holding_sign(self) -> f64 {
        match self {
            Side::Buy => 1.0,
            Side::Sell => -1.0,
        }
    }

    /// Lowercase wire form, as most exchange APIs expect it.
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_delta_is_buy() {
        assert_eq!(Side::from_delta(-0.5), Side::Buy);
        assert_eq!(Side::from_delta(0.5), Side::Sell);
    }

    #[test]
    fn zero_delta_is_sell() {
        assert_eq!(Side::from_delta(0.0), Side::Sell);
    }

    #[test]
    fn holding_sign() {
        assert_eq!(Side::Buy.holding_sign(), 1.0);
        assert_eq!(Side::Sell.holding_sign(), -1.0);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Side::Buy), "BUY");
        assert_eq!(format!("{}", Side::Sell), "SELL");
        assert_eq!(Side::Sell.as_str(), "sell");
    }
}
