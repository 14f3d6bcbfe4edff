use chrono::NaiveDate;
use faktura_core::{
    BillingRecord, CalendarResolution, EmployeeDirectory, aggregate, fit_cumulative,
};
use faktura_report::{ChartInputs, ChartStyle, render_charts};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn inputs() -> (faktura_core::AggregateReport, EmployeeDirectory) {
    let records = vec![
        BillingRecord::new("101", "Kari", date(2024, 1, 5), 10_000),
        BillingRecord::new("101", "Kari", date(2024, 2, 12), 12_000),
        BillingRecord::new("101", "Kari", date(2024, 3, 7), 9_000),
        BillingRecord::new("102", "Ola", date(2024, 1, 20), 4_000),
        BillingRecord::new("102", "Ola", date(2024, 4, 2), 6_000),
    ];
    let directory = EmployeeDirectory::from_records(&records);
    let calendar = CalendarResolution::for_records(date(2024, 4, 20), &records).unwrap();
    let report = aggregate(&records, &directory, &calendar).unwrap();
    (report, directory)
}

#[test]
fn test_full_artifact_set_with_budget() {
    let (report, directory) = inputs();
    let monthly_trend = fit_cumulative(
        &report.cumulative_by_month,
        report.calendar.elapsed_month as usize,
    )
    .unwrap();
    let weekly_trend = fit_cumulative(
        &report.cumulative_by_week,
        report.calendar.elapsed_week as usize,
    )
    .unwrap();
    assert!(monthly_trend.is_some());
    assert!(weekly_trend.is_some());

    let artifacts = render_charts(
        &ChartInputs {
            report: &report,
            directory: &directory,
            budget_knok: Some(200),
            monthly_trend,
            weekly_trend,
        },
        &ChartStyle::default(),
    );

    let names: Vec<&str> = artifacts.iter().map(|a| a.filename).collect();
    assert_eq!(
        names,
        vec![
            "actuals_per_month.svg",
            "actuals_per_week.svg",
            "actuals_per_month_stacked.svg",
            "actuals_per_week_stacked.svg",
            "actuals_accumulated.svg",
            "actuals_accumulated_weekly.svg",
            "actuals_accumulated_stacked.svg",
            "actuals_accumulated_weekly_stacked.svg",
            "budget_actuals_pie.svg",
            "budget_total_pie.svg",
        ]
    );
    for a in &artifacts {
        assert!(a.svg.starts_with("<svg"), "{} is not an svg root", a.filename);
    }

    // The budget pie carries the exploded remaining slice.
    let budget_pie = &artifacts[artifacts.len() - 1];
    assert!(budget_pie.svg.contains("remaining"));
}

#[test]
fn test_budget_pie_omitted_without_budget() {
    let (report, directory) = inputs();
    let artifacts = render_charts(
        &ChartInputs {
            report: &report,
            directory: &directory,
            budget_knok: None,
            monthly_trend: None,
            weekly_trend: None,
        },
        &ChartStyle::default(),
    );
    assert_eq!(artifacts.len(), 9);
    assert!(artifacts.iter().all(|a| a.filename != "budget_total_pie.svg"));
    // No trend fit: the cumulative charts carry no overlay.
    let accumulated = artifacts
        .iter()
        .find(|a| a.filename == "actuals_accumulated.svg")
        .unwrap();
    assert!(!accumulated.svg.contains("<polyline"));
}
