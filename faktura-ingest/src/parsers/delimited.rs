//! Parse delimited billing exports into normalized records.
//!
//! Header row with named columns, then one row per billing entry:
//! Employee No.,Employee Name,Date,"Billing Price, Reg."
//! 101,Kari Nordmann,5.1.2024,"12 500"
//!
//! Dates are `D.M.YYYY`. Amounts are whole currency units, possibly with
//! space (or NBSP) thousands separators and a trailing `,NN` decimal suffix,
//! both stripped before integer parsing.

use chrono::NaiveDate;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

use faktura_core::BillingRecord;

use crate::error::{IngestError, Result};
use crate::parsers::{find_columns, normalize_name};

/// Parse a delimited billing file, returning records in file order.
pub fn parse_delimited(path: impl AsRef<Path>) -> Result<Vec<BillingRecord>> {
    let records = parse_delimited_reader(File::open(path.as_ref())?)?;
    info!(
        records = records.len(),
        file = %path.as_ref().display(),
        "parsed delimited billing export"
    );
    Ok(records)
}

/// Reader-based entry point, used directly by tests.
pub fn parse_delimited_reader(reader: impl Read) -> Result<Vec<BillingRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let columns = find_columns(rdr.headers()?)?;

    let mut out = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        // 1-based data row number, header excluded.
        let row = i + 1;

        let date = parse_date(record.get(columns.date).unwrap_or(""), row)?;
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

fn parse_date(value: &str, row: usize) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%d.%m.%Y").map_err(|_| IngestError::BadDate {
        row,
        value: value.to_string(),
    })
}

/// Canonical amount rule for delimited exports: strip space/NBSP grouping
/// separators and at most one trailing `,NN` decimal suffix, then parse as a
/// whole number of currency units.
fn parse_amount(value: &str, row: usize) -> Result<i64> {
    let bad = || IngestError::BadAmount {
        row,
        value: value.to_string(),
    };

    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| *c != ' ' && *c != '\u{a0}')
        .collect();

    let integral = match cleaned.split_once(',') {
        Some((whole, decimals))
            if !decimals.is_empty()
                && decimals.len() <= 2
                && decimals.chars().all(|c| c.is_ascii_digit()) =>
        {
            whole
        }
        Some(_) => return Err(bad()),
        None => cleaned.as_str(),
    };

    integral.parse::<i64>().map_err(|_| bad())
}
