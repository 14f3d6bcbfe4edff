//! Billing record types shared by every adapter and engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label substituted for a blank employee name by the adapters.
pub const UNNAMED_EMPLOYEE: &str = "other";

/// Normalized output of the record adapters (source-agnostic).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingRecord {
    pub employee_id: String,
    pub employee_name: String,
    pub date: NaiveDate,
    /// Whole currency units (NOK). Display scaling to KNOK is a
    /// presentation concern.
    pub amount: i64,
}

impl BillingRecord {
    pub fn new(
        employee_id: impl Into<String>,
        employee_name: impl Into<String>,
        date: NaiveDate,
        amount: i64,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            employee_name: employee_name.into(),
            date,
            amount,
        }
    }
}

/// Mapping from employee id to display name, built once per run.
///
/// A repeated id overwrites the earlier name (last write wins). Iteration is
/// sorted by id so legends and pie labels are stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDirectory {
    names: BTreeMap<String, String>,
}

impl EmployeeDirectory {
    pub fn from_records(records: &[BillingRecord]) -> Self {
        let mut dir = Self::default();
        for rec in records {
            dir.names
                .insert(rec.employee_id.clone(), rec.employee_name.clone());
        }
        dir
    }

    pub fn contains(&self, employee_id: &str) -> bool {
        self.names.contains_key(employee_id)
    }

    pub fn name(&self, employee_id: &str) -> Option<&str> {
        self.names.get(employee_id).map(String::as_str)
    }

    /// (id, name) pairs sorted by id.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(id, name)| (id.as_str(), name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_directory_last_write_wins() {
        let records = vec![
            BillingRecord::new("101", "Kari", date(2024, 1, 5), 1000),
            BillingRecord::new("102", "Ola", date(2024, 1, 6), 500),
            BillingRecord::new("101", "Kari Nordmann", date(2024, 2, 1), 2000),
        ];
        let dir = EmployeeDirectory::from_records(&records);
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.name("101"), Some("Kari Nordmann"));
        assert_eq!(dir.name("102"), Some("Ola"));
    }

    #[test]
    fn test_directory_iterates_sorted_by_id() {
        let records = vec![
            BillingRecord::new("205", "B", date(2024, 3, 1), 1),
            BillingRecord::new("101", "A", date(2024, 3, 2), 1),
        ];
        let dir = EmployeeDirectory::from_records(&records);
        let ids: Vec<_> = dir.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["101", "205"]);
    }
}
