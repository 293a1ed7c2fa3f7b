//! Company information record resolved once at the provider boundary.

use serde::{Deserialize, Serialize};

/// Point-in-time fundamental metrics for one symbol.
///
/// Every field is optional. Providers map absent or malformed fields to
/// `None`; the presentation layer renders `None` as "N/A".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    pub short_name: Option<String>,
    pub long_business_summary: Option<String>,
    pub sector: Option<String>,
    pub market_cap: Option<u64>,
    pub trailing_pe: Option<f64>,
    pub trailing_eps: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub beta: Option<f64>,
}

impl Fundamentals {
    /// True when the provider returned nothing usable at all.
    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }
}
