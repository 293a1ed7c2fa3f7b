//! Trailing simple moving average over observations.
//!
//! The window slides over the defined values of the column, not over rows:
//! a gap row neither counts toward the window nor gets a value.

use super::ColumnIndicator;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    /// A period of 0 is treated as 1.
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            name: format!("MA{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl ColumnIndicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, values: &[Option<f64>]) -> Vec<Option<f64>> {
        let mut window: VecDeque<f64> = VecDeque::with_capacity(self.period);
        let mut result = Vec::with_capacity(values.len());

        for value in values {
            let Some(v) = value.filter(|v| v.is_finite()) else {
                result.push(None);
                continue;
            };

            if window.len() == self.period {
                window.pop_front();
            }
            window.push_back(v);

            if window.len() == self.period {
                result.push(Some(window.iter().sum::<f64>() / self.period as f64));
            } else {
                result.push(None);
            }
        }

        result
    }
}
