//! Point-in-time quote for watchlist and index display.

use serde::{Deserialize, Serialize};

/// Latest close and percent change from the prior close.
///
/// Ephemeral: recomputed on every refresh, never cached across renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub price: f64,
    /// Percent change, e.g. `1.25` for +1.25%.
    pub pct_change: f64,
}

impl Quote {
    /// Build a quote from the latest close and the close before it.
    pub fn from_closes(symbol: impl Into<String>, close: f64, previous_close: f64) -> Self {
        Self {
            symbol: symbol.into(),
            price: close,
            pct_change: (close - previous_close) / previous_close * 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pct_change_from_prior_close() {
        let q = Quote::from_closes("AAPL", 101.0, 100.0);
        assert_eq!(q.price, 101.0);
        assert!((q.pct_change - 1.0).abs() < 1e-12);

        let q = Quote::from_closes("AAPL", 95.0, 100.0);
        assert!((q.pct_change + 5.0).abs() < 1e-12);
    }
}
