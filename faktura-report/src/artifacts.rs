//! The fixed set of chart artifacts a run produces, and the KNOK scaling
//! between stored currency units and everything the charts display.

use faktura_core::{AggregateReport, EmployeeDirectory, MONTHS, PeriodSeries, TrendFit};
use std::collections::BTreeMap;
use svg::Document;
use tracing::debug;

use crate::chart::{RefLine, TrendOverlay, bar_chart, pie_chart, stacked_bar_chart};
use crate::style::ChartStyle;

/// Month tick labels, as the reports have always shown them.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mai", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Des",
];

const Y_LABEL: &str = "KNOK";

/// One rendered chart, ready to be written under its fixed filename.
pub struct Artifact {
    pub filename: &'static str,
    pub svg: String,
}

/// Everything the chart set is derived from.
pub struct ChartInputs<'a> {
    pub report: &'a AggregateReport,
    pub directory: &'a EmployeeDirectory,
    /// Total budget in KNOK; enables the reference lines and the budget pie.
    pub budget_knok: Option<i64>,
    pub monthly_trend: Option<TrendFit>,
    pub weekly_trend: Option<TrendFit>,
}

/// Render the full artifact set in memory. Nothing is written to disk here,
/// so a failing run can abort before any file is touched.
pub fn render_charts(inputs: &ChartInputs<'_>, style: &ChartStyle) -> Vec<Artifact> {
    let report = inputs.report;
    let weeks = report.calendar.weeks_in_year as usize;

    let month_labels: Vec<String> = MONTH_LABELS.iter().map(|l| l.to_string()).collect();
    let week_labels = week_labels(weeks);

    let monthly_mean = inputs.budget_knok.map(|b| RefLine {
        value: b as f64 / MONTHS as f64,
        label: "mean".to_string(),
        dashed: true,
    });
    let weekly_mean = inputs.budget_knok.map(|b| RefLine {
        value: b as f64 / weeks as f64,
        label: "mean".to_string(),
        dashed: true,
    });
    let ceiling = inputs.budget_knok.map(|b| RefLine {
        value: b as f64,
        label: "total budget".to_string(),
        dashed: false,
    });

    let monthly_overlay = overlay(&inputs.monthly_trend, MONTHS);
    let weekly_overlay = overlay(&inputs.weekly_trend, weeks);

    let by_employee_monthly = employee_series(
        &report.by_employee_by_month,
        inputs.directory,
        MONTHS,
        None,
    );
    let by_employee_weekly =
        employee_series(&report.by_employee_by_week, inputs.directory, weeks, None);
    let cumulative_monthly_by_employee = employee_series(
        &report.by_employee_by_month,
        inputs.directory,
        MONTHS,
        Some(report.calendar.elapsed_month as usize),
    );
    let cumulative_weekly_by_employee = employee_series(
        &report.by_employee_by_week,
        inputs.directory,
        weeks,
        Some(report.calendar.elapsed_week as usize),
    );

    let mut artifacts = vec![
        artifact(
            "actuals_per_month.svg",
            bar_chart(
                style,
                "Actuals per month",
                Y_LABEL,
                &month_labels,
                &knok_series(&report.by_month, MONTHS),
                monthly_mean.as_ref(),
                None,
            ),
        ),
        artifact(
            "actuals_per_week.svg",
            bar_chart(
                style,
                "Actuals per week",
                Y_LABEL,
                &week_labels,
                &knok_series(&report.by_week, weeks),
                weekly_mean.as_ref(),
                None,
            ),
        ),
        artifact(
            "actuals_per_month_stacked.svg",
            stacked_bar_chart(
                style,
                "Actuals per month by employee",
                Y_LABEL,
                &month_labels,
                &by_employee_monthly,
                monthly_mean.as_ref(),
                None,
            ),
        ),
        artifact(
            "actuals_per_week_stacked.svg",
            stacked_bar_chart(
                style,
                "Actuals per week by employee",
                Y_LABEL,
                &week_labels,
                &by_employee_weekly,
                weekly_mean.as_ref(),
                None,
            ),
        ),
        artifact(
            "actuals_accumulated.svg",
            bar_chart(
                style,
                "Actuals accumulated",
                Y_LABEL,
                &month_labels,
                &knok_series(&report.cumulative_by_month, MONTHS),
                ceiling.as_ref(),
                monthly_overlay.as_ref(),
            ),
        ),
        artifact(
            "actuals_accumulated_weekly.svg",
            bar_chart(
                style,
                "Actuals accumulated by week",
                Y_LABEL,
                &week_labels,
                &knok_series(&report.cumulative_by_week, weeks),
                ceiling.as_ref(),
                weekly_overlay.as_ref(),
            ),
        ),
        artifact(
            "actuals_accumulated_stacked.svg",
            stacked_bar_chart(
                style,
                "Actuals accumulated by employee",
                Y_LABEL,
                &month_labels,
                &cumulative_monthly_by_employee,
                ceiling.as_ref(),
                monthly_overlay.as_ref(),
            ),
        ),
        artifact(
            "actuals_accumulated_weekly_stacked.svg",
            stacked_bar_chart(
                style,
                "Actuals accumulated by week and employee",
                Y_LABEL,
                &week_labels,
                &cumulative_weekly_by_employee,
                ceiling.as_ref(),
                weekly_overlay.as_ref(),
            ),
        ),
        artifact(
            "budget_actuals_pie.svg",
            pie_chart(style, "Budget actuals", &billed_shares(inputs), false),
        ),
    ];

    if let Some(budget) = inputs.budget_knok {
        let mut slices = billed_shares(inputs);
        let remaining = (budget as f64 - knok(report.grand_total())).max(0.0);
        slices.push(("remaining".to_string(), remaining));
        artifacts.push(artifact(
            "budget_total_pie.svg",
            pie_chart(style, "Budget total", &slices, true),
        ));
    }

    debug!(count = artifacts.len(), "rendered chart artifacts");
    artifacts
}

fn artifact(filename: &'static str, doc: Document) -> Artifact {
    Artifact {
        filename,
        svg: doc.to_string(),
    }
}

pub fn knok(units: i64) -> f64 {
    units as f64 / 1000.0
}

/// The first `periods` values of a series, scaled for display.
fn knok_series(series: &PeriodSeries, periods: usize) -> Vec<f64> {
    (1..=periods).map(|p| knok(series.get(p))).collect()
}

/// Week tick labels: week 1 and every fifth week, the rest left blank to
/// keep the axis readable.
fn week_labels(weeks: usize) -> Vec<String> {
    (1..=weeks)
        .map(|w| {
            if w == 1 || w % 5 == 0 {
                w.to_string()
            } else {
                String::new()
            }
        })
        .collect()
}

/// Per-employee display series in directory order, optionally cumulated and
/// truncated at the elapsed cutoff.
fn employee_series(
    map: &BTreeMap<String, PeriodSeries>,
    directory: &EmployeeDirectory,
    periods: usize,
    cumulative_elapsed: Option<usize>,
) -> Vec<(String, Vec<f64>)> {
    directory
        .iter()
        .map(|(id, name)| {
            let values = match (map.get(id), cumulative_elapsed) {
                (Some(series), None) => knok_series(series, periods),
                (Some(series), Some(elapsed)) => knok_series(&series.cumulative(elapsed), periods),
                (None, _) => vec![0.0; periods],
            };
            (name.to_string(), values)
        })
        .collect()
}

fn billed_shares(inputs: &ChartInputs<'_>) -> Vec<(String, f64)> {
    inputs
        .directory
        .iter()
        .map(|(id, name)| {
            let total = inputs
                .report
                .by_employee_by_year
                .get(id)
                .copied()
                .unwrap_or(0);
            (name.to_string(), knok(total))
        })
        .collect()
}

fn overlay(fit: &Option<TrendFit>, total_periods: usize) -> Option<TrendOverlay> {
    fit.as_ref().map(|f| TrendOverlay {
        curve: f.curve(total_periods).into_iter().map(|v| v / 1000.0).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_labels_are_sparse() {
        let labels = week_labels(52);
        assert_eq!(labels[0], "1");
        assert_eq!(labels[1], "");
        assert_eq!(labels[4], "5");
        assert_eq!(labels[49], "50");
        assert_eq!(labels.len(), 52);
    }

    #[test]
    fn test_knok_scaling() {
        assert_eq!(knok(12_500), 12.5);
        assert_eq!(knok(-1_000), -1.0);
    }
}
