//! Aggregation engine: folds billing records into calendar-bucketed series.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::billing::{BillingRecord, EmployeeDirectory};
use crate::calendar::CalendarResolution;
use crate::error::{FakturaError, Result};

/// Weekly series are sized for the longest possible ISO year. A record near
/// a year edge may carry a week number from the neighbouring ISO year, and
/// every record must land in a bucket for the totals to reconcile.
pub const MAX_ISO_WEEKS: usize = 53;

pub const MONTHS: usize = 12;

/// Fixed-length additive sequence indexed by 1-based period number.
///
/// Values default to zero and are only ever accumulated, never overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSeries {
    values: Vec<i64>,
}

impl PeriodSeries {
    pub fn months() -> Self {
        Self::with_len(MONTHS)
    }

    pub fn weeks() -> Self {
        Self::with_len(MAX_ISO_WEEKS)
    }

    pub fn with_len(len: usize) -> Self {
        Self {
            values: vec![0; len],
        }
    }

    /// Add `amount` into 1-based `period`.
    pub fn add(&mut self, period: usize, amount: i64) -> Result<()> {
        if period == 0 || period > self.values.len() {
            return Err(FakturaError::PeriodOutOfRange {
                period,
                len: self.values.len(),
            });
        }
        self.values[period - 1] += amount;
        Ok(())
    }

    /// Value of 1-based `period`, zero outside the series.
    pub fn get(&self, period: usize) -> i64 {
        if period == 0 {
            return 0;
        }
        self.values.get(period - 1).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn total(&self) -> i64 {
        self.values.iter().sum()
    }

    /// Running cumulative sum truncated to elapsed periods: prefix sums for
    /// indices below `elapsed_periods`, zero from there on. The zeroing (as
    /// opposed to omission) keeps the curve directly chartable.
    pub fn cumulative(&self, elapsed_periods: usize) -> PeriodSeries {
        let mut out = PeriodSeries::with_len(self.values.len());
        let mut running = 0;
        for (i, v) in self.values.iter().enumerate() {
            if i >= elapsed_periods {
                break;
            }
            running += v;
            out.values[i] = running;
        }
        out
    }
}

/// Immutable output bundle of one aggregation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub by_month: PeriodSeries,
    pub by_week: PeriodSeries,
    pub cumulative_by_month: PeriodSeries,
    pub cumulative_by_week: PeriodSeries,
    pub by_employee_by_month: BTreeMap<String, PeriodSeries>,
    pub by_employee_by_week: BTreeMap<String, PeriodSeries>,
    pub by_employee_by_year: BTreeMap<String, i64>,
    pub calendar: CalendarResolution,
}

impl AggregateReport {
    /// Grand total over the whole record set.
    pub fn grand_total(&self) -> i64 {
        self.by_month.total()
    }
}

/// Fold `records` into per-month, per-week and per-employee totals.
///
/// The directory must have been built from the same record set; an id it
/// does not know is a data-integrity fault, not a recoverable condition.
pub fn aggregate(
    records: &[BillingRecord],
    directory: &EmployeeDirectory,
    calendar: &CalendarResolution,
) -> Result<AggregateReport> {
    if records.is_empty() {
        return Err(FakturaError::EmptyDataset);
    }

    let mut by_month = PeriodSeries::months();
    let mut by_week = PeriodSeries::weeks();
    let mut by_employee_by_month: BTreeMap<String, PeriodSeries> = BTreeMap::new();
    let mut by_employee_by_week: BTreeMap<String, PeriodSeries> = BTreeMap::new();
    let mut by_employee_by_year: BTreeMap<String, i64> = BTreeMap::new();

    for rec in records {
        if !directory.contains(&rec.employee_id) {
            return Err(FakturaError::UnknownEmployee(rec.employee_id.clone()));
        }

        // Week numbering comes straight from ISO 8601: a late-December date
        // can belong to week 1 and an early-January date to week 52/53.
        let month = rec.date.month() as usize;
        let week = rec.date.iso_week().week() as usize;

        by_month.add(month, rec.amount)?;
        by_week.add(week, rec.amount)?;
        by_employee_by_month
            .entry(rec.employee_id.clone())
            .or_insert_with(PeriodSeries::months)
            .add(month, rec.amount)?;
        by_employee_by_week
            .entry(rec.employee_id.clone())
            .or_insert_with(PeriodSeries::weeks)
            .add(week, rec.amount)?;
        *by_employee_by_year.entry(rec.employee_id.clone()).or_insert(0) += rec.amount;
    }

    debug!(
        records = records.len(),
        employees = by_employee_by_year.len(),
        total = by_month.total(),
        "aggregated billing records"
    );

    let cumulative_by_month = by_month.cumulative(calendar.elapsed_month as usize);
    let cumulative_by_week = by_week.cumulative(calendar.elapsed_week as usize);

    Ok(AggregateReport {
        by_month,
        by_week,
        cumulative_by_month,
        cumulative_by_week,
        by_employee_by_month,
        by_employee_by_week,
        by_employee_by_year,
        calendar: *calendar,
    })
}
