//! faktura-core: billing domain types, calendar resolution, aggregation and
//! trend projection for project-billing reports.

pub mod aggregate;
pub mod billing;
pub mod calendar;
pub mod error;
pub mod trend;

pub use aggregate::{AggregateReport, PeriodSeries, MAX_ISO_WEEKS, MONTHS, aggregate};
pub use billing::{BillingRecord, EmployeeDirectory, UNNAMED_EMPLOYEE};
pub use calendar::{CalendarResolution, weeks_in_year};
pub use error::{FakturaError, Result};
pub use trend::{TrendFit, fit_cumulative};
