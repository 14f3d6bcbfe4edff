//! Source-specific billing parsers. Column discovery is header-name driven;
//! a missing required column fails the run before any record is produced.

pub mod delimited;
pub mod spreadsheet;

use faktura_core::UNNAMED_EMPLOYEE;

use crate::error::{IngestError, Result};

pub(crate) const COL_EMPLOYEE_ID: &str = "Employee No.";
pub(crate) const COL_EMPLOYEE_NAME: &str = "Employee Name";
pub(crate) const COL_DATE: &str = "Date";
pub(crate) const COL_AMOUNT: &str = "Billing Price, Reg.";

/// Indices of the required columns within a header row.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Columns {
    pub employee_id: usize,
    pub employee_name: usize,
    pub date: usize,
    pub amount: usize,
}

pub(crate) fn find_columns(headers: &csv::StringRecord) -> Result<Columns> {
    let find = |name: &'static str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or(IngestError::MissingColumn(name))
    };
    Ok(Columns {
        employee_id: find(COL_EMPLOYEE_ID)?,
        employee_name: find(COL_EMPLOYEE_NAME)?,
        date: find(COL_DATE)?,
        amount: find(COL_AMOUNT)?,
    })
}

/// Blank employee names become the `"other"` sentinel; the engine never sees
/// an empty label.
pub(crate) fn normalize_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        UNNAMED_EMPLOYEE.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_columns_by_name() {
        let headers = csv::StringRecord::from(vec![
            "Project",
            "Employee No.",
            "Employee Name",
            "Date",
            "Billing Price, Reg.",
        ]);
        let cols = find_columns(&headers).unwrap();
        assert_eq!(cols.employee_id, 1);
        assert_eq!(cols.amount, 4);
    }

    #[test]
    fn test_missing_column_is_reported_by_name() {
        let headers = csv::StringRecord::from(vec!["Employee No.", "Date"]);
        let err = find_columns(&headers).unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingColumn("Employee Name")
        ));
    }

    #[test]
    fn test_blank_name_becomes_other() {
        assert_eq!(normalize_name("  "), "other");
        assert_eq!(normalize_name(" Kari "), "Kari");
    }
}
