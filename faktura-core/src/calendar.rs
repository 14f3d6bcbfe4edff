//! Calendar resolution: reporting year, elapsed cutoffs and ISO week count.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::billing::BillingRecord;
use crate::error::{FakturaError, Result};

/// The effective reporting year and how much of it counts as elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarResolution {
    pub year: i32,
    /// 1..=12; months up to and including this one are elapsed.
    pub elapsed_month: u32,
    /// 1..=weeks_in_year; ISO weeks up to and including this one are elapsed.
    pub elapsed_week: u32,
    /// 52 or 53 per the ISO 8601 long-year rule.
    pub weeks_in_year: u32,
}

impl CalendarResolution {
    /// Resolve against any single date drawn from the dataset.
    ///
    /// A dataset from a closed prior year counts as fully elapsed; otherwise
    /// the cutoffs come from `today`.
    pub fn resolve(today: NaiveDate, reference_date: NaiveDate) -> Self {
        let year = reference_date.year();
        let weeks_in_year = weeks_in_year(year);
        if today.year() > year {
            Self {
                year,
                elapsed_month: 12,
                elapsed_week: weeks_in_year,
                weeks_in_year,
            }
        } else {
            Self {
                year,
                elapsed_month: today.month(),
                elapsed_week: today.iso_week().week(),
                weeks_in_year,
            }
        }
    }

    /// Resolve from the record set itself (any record's date suffices, the
    /// dataset is assumed single-year).
    pub fn for_records(today: NaiveDate, records: &[BillingRecord]) -> Result<Self> {
        let reference = records.first().ok_or(FakturaError::EmptyDataset)?;
        Ok(Self::resolve(today, reference.date))
    }
}

/// ISO weeks in `year`: the week number of Dec 29, which always falls in the
/// final ISO week of its year.
pub fn weeks_in_year(year: i32) -> u32 {
    NaiveDate::from_ymd_opt(year, 12, 29)
        .expect("Dec 29 is a valid date in every year")
        .iso_week()
        .week()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::BillingRecord;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_iso_week_counts() {
        // Known ISO 8601 facts: 2020 is a long year, 2021 is not.
        assert_eq!(weeks_in_year(2020), 53);
        assert_eq!(weeks_in_year(2021), 52);
        assert_eq!(weeks_in_year(2024), 52);
    }

    #[test]
    fn test_same_year_uses_today() {
        let res = CalendarResolution::resolve(date(2024, 2, 15), date(2024, 1, 5));
        assert_eq!(res.year, 2024);
        assert_eq!(res.elapsed_month, 2);
        assert_eq!(res.elapsed_week, date(2024, 2, 15).iso_week().week());
        assert_eq!(res.weeks_in_year, 52);
    }

    #[test]
    fn test_prior_year_is_fully_elapsed() {
        let res = CalendarResolution::resolve(date(2021, 3, 1), date(2020, 6, 10));
        assert_eq!(res.year, 2020);
        assert_eq!(res.elapsed_month, 12);
        assert_eq!(res.elapsed_week, 53);
        assert_eq!(res.weeks_in_year, 53);
    }

    #[test]
    fn test_for_records_empty_dataset() {
        let err = CalendarResolution::for_records(date(2024, 2, 15), &[]).unwrap_err();
        assert!(matches!(err, FakturaError::EmptyDataset));
    }

    #[test]
    fn test_for_records_takes_first_date() {
        let records = vec![BillingRecord::new("1", "A", date(2023, 4, 2), 100)];
        let res = CalendarResolution::for_records(date(2024, 2, 15), &records).unwrap();
        assert_eq!(res.year, 2023);
        assert_eq!(res.elapsed_month, 12);
    }
}
