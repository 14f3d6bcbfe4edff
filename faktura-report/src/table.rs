//! Fixed-width console report: one row per employee, monthly KNOK totals.

use std::fmt;

use faktura_core::{AggregateReport, EmployeeDirectory, MONTHS};

use crate::artifacts::{MONTH_LABELS, knok};

pub struct ConsoleReport<'a> {
    report: &'a AggregateReport,
    directory: &'a EmployeeDirectory,
    budget_knok: Option<i64>,
}

impl<'a> ConsoleReport<'a> {
    pub fn new(
        report: &'a AggregateReport,
        directory: &'a EmployeeDirectory,
        budget_knok: Option<i64>,
    ) -> Self {
        Self {
            report,
            directory,
            budget_knok,
        }
    }

    fn name_width(&self) -> usize {
        self.directory
            .iter()
            .map(|(_, name)| name.chars().count())
            .chain(std::iter::once("total".len()))
            .max()
            .unwrap_or(5)
    }
}

impl fmt::Display for ConsoleReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = self.name_width();

        writeln!(f, "Billed per month ({})", self.report.calendar.year)?;
        write!(f, "{:<w$}", "", w = w)?;
        for label in MONTH_LABELS {
            write!(f, " {label:>7}")?;
        }
        writeln!(f, " {:>9}", "Total")?;

        for (id, name) in self.directory.iter() {
            write!(f, "{:<w$}", name, w = w)?;
            for month in 1..=MONTHS {
                let v = self
                    .report
                    .by_employee_by_month
                    .get(id)
                    .map(|s| s.get(month))
                    .unwrap_or(0);
                write!(f, " {:>7.1}", knok(v))?;
            }
            let total = self.report.by_employee_by_year.get(id).copied().unwrap_or(0);
            writeln!(f, " {:>9.1}", knok(total))?;
        }

        write!(f, "{:<w$}", "total", w = w)?;
        for month in 1..=MONTHS {
            write!(f, " {:>7.1}", knok(self.report.by_month.get(month)))?;
        }
        writeln!(f, " {:>9.1}", knok(self.report.grand_total()))?;

        if let Some(budget) = self.budget_knok {
            let remaining = budget as f64 - knok(self.report.grand_total());
            writeln!(f)?;
            writeln!(f, "remaining budget: {remaining:.1} KNOK")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use faktura_core::{BillingRecord, CalendarResolution, aggregate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> (AggregateReport, EmployeeDirectory) {
        let records = vec![
            BillingRecord::new("101", "Kari", date(2024, 1, 5), 1_500),
            BillingRecord::new("102", "Ola", date(2024, 2, 3), 2_000),
        ];
        let directory = EmployeeDirectory::from_records(&records);
        let calendar = CalendarResolution::resolve(date(2024, 2, 15), date(2024, 1, 5));
        let report = aggregate(&records, &directory, &calendar).unwrap();
        (report, directory)
    }

    #[test]
    fn test_table_has_employee_and_totals_rows() {
        let (report, directory) = sample();
        let rendered = ConsoleReport::new(&report, &directory, None).to_string();

        assert!(rendered.contains("Jan"));
        assert!(rendered.contains("Des"));
        assert!(rendered.contains("Kari"));
        assert!(rendered.contains("Ola"));
        assert!(rendered.contains("total"));
        // Grand total in KNOK: (1500 + 2000) / 1000.
        assert!(rendered.contains("3.5"));
        assert!(!rendered.contains("remaining budget"));
    }

    #[test]
    fn test_remaining_budget_line() {
        let (report, directory) = sample();
        let rendered = ConsoleReport::new(&report, &directory, Some(100)).to_string();
        assert!(rendered.contains("remaining budget: 96.5 KNOK"));
    }

    #[test]
    fn test_rows_align() {
        let (report, directory) = sample();
        let rendered = ConsoleReport::new(&report, &directory, None).to_string();
        let lines: Vec<&str> = rendered.lines().skip(1).collect();
        let widths: Vec<usize> = lines.iter().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{widths:?}");
    }
}
