//! faktura-report: presentation adapters for billing aggregates, the SVG
//! chart set and the fixed-width console report.

pub mod artifacts;
pub mod chart;
pub mod style;
pub mod table;

pub use artifacts::{Artifact, ChartInputs, MONTH_LABELS, render_charts};
pub use chart::{RefLine, TrendOverlay, bar_chart, pie_chart, stacked_bar_chart};
pub use style::{ChartStyle, PALETTE};
pub use table::ConsoleReport;
