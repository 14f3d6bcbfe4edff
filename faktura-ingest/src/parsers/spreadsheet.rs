//! Parse spreadsheet billing exports into normalized records.
//!
//! Same delimited container as the plain export, but cells carry
//! formula-like strings:
//! Employee No.,Employee Name,Date,"Billing Price, Reg."
//! 101,Kari Nordmann,"=DATE(2024,1,5)",=12500.50
//!
//! Dates are `=DATE(YYYY,M,D)` (the `=` prefix is optional in some exports).
//! Amounts are formula-like numerics, truncated toward zero to whole
//! currency units.

use chrono::NaiveDate;
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

use faktura_core::BillingRecord;

use crate::error::{IngestError, Result};
use crate::parsers::{find_columns, normalize_name};

const DATE_PATTERN: &str = r"^=?\s*DATE\(\s*(\d{4})\s*,\s*(\d{1,2})\s*,\s*(\d{1,2})\s*\)$";

/// Whether a cell has the `=DATE(...)` shape of a spreadsheet export.
pub fn is_formula_date(cell: &str) -> bool {
    let cell = cell.trim();
    let stripped = cell.strip_prefix('=').unwrap_or(cell).trim_start();
    stripped.starts_with("DATE(") && stripped.ends_with(')')
}

/// Parse a spreadsheet billing export, returning records in file order.
pub fn parse_spreadsheet_export(path: impl AsRef<Path>) -> Result<Vec<BillingRecord>> {
    let records = parse_spreadsheet_reader(File::open(path.as_ref())?)?;
    info!(
        records = records.len(),
        file = %path.as_ref().display(),
        "parsed spreadsheet billing export"
    );
    Ok(records)
}

/// Reader-based entry point, used directly by tests.
pub fn parse_spreadsheet_reader(reader: impl Read) -> Result<Vec<BillingRecord>> {
    let date_re = Regex::new(DATE_PATTERN)?;
    let mut rdr = csv::Reader::from_reader(reader);
    let columns = find_columns(rdr.headers()?)?;

    let mut out = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let row = i + 1;

        let date = parse_date(&date_re, record.get(columns.date).unwrap_or(""), row)?;
        let amount = parse_amount(record.get(columns.amount).unwrap_or(""), row)?;

        out.push(BillingRecord {
            employee_id: record.get(columns.employee_id).unwrap_or("").trim().to_string(),
            employee_name: normalize_name(record.get(columns.employee_name).unwrap_or("")),
            date,
            amount,
        });
    }

    Ok(out)
}

fn parse_date(date_re: &Regex, value: &str, row: usize) -> Result<NaiveDate> {
    let bad = || IngestError::BadDate {
        row,
        value: value.to_string(),
    };

    let caps = date_re.captures(value.trim()).ok_or_else(bad)?;
    let year: i32 = caps[1].parse().map_err(|_| bad())?;
    let month: u32 = caps[2].parse().map_err(|_| bad())?;
    let day: u32 = caps[3].parse().map_err(|_| bad())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(bad)
}

/// Canonical amount rule for spreadsheet exports: strip the `=` prefix and
/// grouping spaces, parse as a decimal number, truncate toward zero.
fn parse_amount(value: &str, row: usize) -> Result<i64> {
    let bad = || IngestError::BadAmount {
        row,
        value: value.to_string(),
    };

    let cell = value.trim();
    let cleaned: String = cell
        .strip_prefix('=')
        .unwrap_or(cell)
        .chars()
        .filter(|c| *c != ' ' && *c != '\u{a0}')
        .collect();

    let parsed: f64 = cleaned.parse().map_err(|_| bad())?;
    if !parsed.is_finite() {
        return Err(bad());
    }
    Ok(parsed.trunc() as i64)
}
