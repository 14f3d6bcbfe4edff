//! Adapter selection: which concrete parser handles a given input file.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::debug;

use faktura_core::BillingRecord;

use crate::error::Result;
use crate::parsers::{self, delimited, spreadsheet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    /// Plain delimited export: `D.M.YYYY` dates, integer amounts with
    /// thousands separators.
    Delimited,
    /// Spreadsheet export: formula-like cells (`=DATE(Y,M,D)` dates,
    /// `=1234.56`-style amounts).
    SpreadsheetExport,
}

/// Sniff the first data row's `Date` cell: a `DATE(...)` shape selects the
/// spreadsheet adapter, anything else the delimited one.
pub fn detect_format(path: impl AsRef<Path>) -> Result<SourceFormat> {
    let mut rdr = csv::Reader::from_reader(File::open(path.as_ref())?);
    let columns = parsers::find_columns(rdr.headers()?)?;

    for record in rdr.records() {
        let record = record?;
        let cell = record.get(columns.date).unwrap_or("").trim();
        if cell.is_empty() {
            continue;
        }
        let format = if spreadsheet::is_formula_date(cell) {
            SourceFormat::SpreadsheetExport
        } else {
            SourceFormat::Delimited
        };
        debug!(?format, cell, "detected source format");
        return Ok(format);
    }

    // No data rows: either adapter will produce the same empty set.
    Ok(SourceFormat::Delimited)
}

/// Run the adapter for `format` over the file at `path`.
pub fn load_records(path: impl AsRef<Path>, format: SourceFormat) -> Result<Vec<BillingRecord>> {
    match format {
        SourceFormat::Delimited => delimited::parse_delimited(path),
        SourceFormat::SpreadsheetExport => spreadsheet::parse_spreadsheet_export(path),
    }
}
