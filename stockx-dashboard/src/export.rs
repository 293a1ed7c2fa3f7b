//! CSV export of the table exactly as displayed.
//!
//! Header row is `Date` followed by the canonical column names; one row per
//! date. Numbers use default `f64` formatting and undefined values are empty.

use anyhow::{Context, Result};
use std::path::Path;
use stockx_core::CanonicalTable;

pub fn export_csv(table: &CanonicalTable) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(table.column_names())
        .context("failed to write CSV header")?;

    for (row, date) in table.dates().iter().enumerate() {
        let mut record = Vec::with_capacity(table.columns().len() + 1);
        record.push(date.format("%Y-%m-%d").to_string());
        for column in table.columns() {
            record.push(
                column
                    .values
                    .get(row)
                    .copied()
                    .flatten()
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
            );
        }
        wtr.write_record(&record)
            .with_context(|| format!("failed to write CSV row for {date}"))?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Write the CSV export of `table` to `path`.
pub fn write_csv(table: &CanonicalTable, path: &Path) -> Result<()> {
    let csv = export_csv(table)?;
    std::fs::write(path, csv).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
