//! Indicator engine.
//!
//! Indicators are pure functions over one canonical column: values in, a
//! series of the same length out. They are computed once per render pass and
//! appended as new columns; source columns are never touched.

pub mod engine;
pub mod sma;

pub use engine::{add_moving_average, IndicatorTable, DEFAULT_MA_WINDOW};
pub use sma::Sma;

/// A derived series computed from a single source column.
///
/// `None` marks an undefined value, both on input (non-trading rows) and on
/// output (warmup, or no input on that row).
pub trait ColumnIndicator: Send + Sync {
    /// Column prefix, e.g. "MA20". Output columns are `<name>_<Symbol>`.
    fn name(&self) -> &str;

    /// Observations needed before the first defined output.
    fn lookback(&self) -> usize;

    /// Compute the indicator over the whole column.
    fn compute(&self, values: &[Option<f64>]) -> Vec<Option<f64>>;

    fn output_column(&self, symbol: &str) -> String {
        format!("{}_{}", self.name(), symbol)
    }
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
