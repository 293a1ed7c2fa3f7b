//! Polars bridge for tabular previews.

use super::normalize::{CanonicalTable, DATE_COLUMN};
use chrono::NaiveDate;
use polars::prelude::*;

impl CanonicalTable {
    /// Convert to a polars `DataFrame` with a `Date` column first.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(self.columns().len() + 1);
        let dates: Vec<NaiveDate> = self.dates().to_vec();
        columns.push(Series::new(DATE_COLUMN.into(), dates).into());
        for column in self.columns() {
            columns.push(Series::new(column.name.as_str().into(), column.values.as_slice()).into());
        }
        DataFrame::new(columns)
    }

    /// The first `rows` rows as a `DataFrame`.
    pub fn head_frame(&self, rows: usize) -> PolarsResult<DataFrame> {
        Ok(self.to_dataframe()?.head(Some(rows)))
    }
}
