use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use faktura_core::{
    CalendarResolution, EmployeeDirectory, PeriodSeries, TrendFit, aggregate, fit_cumulative,
};
use faktura_ingest::{SourceFormat, detect_format, load_records};
use faktura_report::{ChartInputs, ChartStyle, ConsoleReport, render_charts};

#[derive(Parser, Debug)]
#[command(name = "faktura", version, about = "Parse and plot project billing data")]
struct Cli {
    /// Input billing export (delimited text or spreadsheet export)
    #[arg(long)]
    filename: PathBuf,

    /// Total budget in KNOK; enables budget reference lines, the budget pie
    /// and the remaining-budget report line
    #[arg(long)]
    totalbudget: Option<i64>,

    /// Overlay the linear regression on the accumulated charts
    #[arg(
        long = "regressionON",
        default_value = "true",
        default_missing_value = "true",
        num_args = 0..=1,
        action = clap::ArgAction::Set,
        value_parser = parse_bool_like,
    )]
    regression_on: bool,

    /// Input format; detected from the file when not given
    #[arg(long, value_enum, default_value_t = FormatArg::Auto)]
    format: FormatArg,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Auto,
    Delimited,
    Spreadsheet,
}

/// Accepts the classic boolean token set, case-insensitively.
fn parse_bool_like(value: &str) -> Result<bool, String> {
    match value.to_lowercase().as_str() {
        "yes" | "true" | "t" | "y" | "1" => Ok(true),
        "no" | "false" | "f" | "n" | "0" => Ok(false),
        other => Err(format!("boolean value expected, got {other:?}")),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    if !cli.filename.exists() {
        bail!("input file not found: {}", cli.filename.display());
    }

    let format = match cli.format {
        FormatArg::Delimited => SourceFormat::Delimited,
        FormatArg::Spreadsheet => SourceFormat::SpreadsheetExport,
        FormatArg::Auto => detect_format(&cli.filename)
            .with_context(|| format!("inspecting {}", cli.filename.display()))?,
    };

    let records = load_records(&cli.filename, format)
        .with_context(|| format!("parsing {}", cli.filename.display()))?;
    info!(records = records.len(), ?format, "loaded billing records");

    let directory = EmployeeDirectory::from_records(&records);
    let today = Local::now().date_naive();
    let calendar = CalendarResolution::for_records(today, &records)?;
    let report = aggregate(&records, &directory, &calendar)?;

    let (monthly_trend, weekly_trend) = if cli.regression_on {
        (
            trend_or_skip(
                &report.cumulative_by_month,
                calendar.elapsed_month as usize,
                "month",
            ),
            trend_or_skip(
                &report.cumulative_by_week,
                calendar.elapsed_week as usize,
                "week",
            ),
        )
    } else {
        (None, None)
    };

    let artifacts = render_charts(
        &ChartInputs {
            report: &report,
            directory: &directory,
            budget_knok: cli.totalbudget,
            monthly_trend,
            weekly_trend,
        },
        &ChartStyle::default(),
    );

    // Every chart is rendered before the first write, so a failed run never
    // leaves a partial artifact set behind.
    for artifact in &artifacts {
        fs::write(artifact.filename, &artifact.svg)
            .with_context(|| format!("writing {}", artifact.filename))?;
    }
    info!(artifacts = artifacts.len(), "wrote chart artifacts");

    print!(
        "{}",
        ConsoleReport::new(&report, &directory, cli.totalbudget)
    );

    Ok(())
}

/// A trend fit that cannot be made only costs the overlay, never the run.
fn trend_or_skip(series: &PeriodSeries, elapsed: usize, axis: &str) -> Option<TrendFit> {
    match fit_cumulative(series, elapsed) {
        Ok(Some(fit)) => Some(fit),
        Ok(None) => {
            warn!(axis, elapsed, "too few elapsed periods, skipping regression");
            None
        }
        Err(err) => {
            warn!(axis, %err, "trend fit failed, skipping regression");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_like_tokens() {
        for token in ["yes", "TRUE", "t", "Y", "1"] {
            assert_eq!(parse_bool_like(token), Ok(true), "{token}");
        }
        for token in ["no", "False", "f", "N", "0"] {
            assert_eq!(parse_bool_like(token), Ok(false), "{token}");
        }
        assert!(parse_bool_like("maybe").is_err());
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from([
            "faktura",
            "--filename",
            "billing.csv",
            "--totalbudget",
            "500",
            "--regressionON",
            "no",
        ]);
        assert_eq!(cli.filename, PathBuf::from("billing.csv"));
        assert_eq!(cli.totalbudget, Some(500));
        assert!(!cli.regression_on);
    }

    #[test]
    fn test_regression_defaults_on() {
        let cli = Cli::parse_from(["faktura", "--filename", "billing.csv"]);
        assert!(cli.regression_on);
    }

    #[test]
    fn test_bare_regression_flag_reads_as_true() {
        let cli = Cli::parse_from(["faktura", "--filename", "billing.csv", "--regressionON"]);
        assert!(cli.regression_on);
    }
}
