use thiserror::Error;

#[derive(Error, Debug)]
pub enum FakturaError {
    #[error("no billing records found in input")]
    EmptyDataset,

    #[error("employee id {0:?} is not in the directory")]
    UnknownEmployee(String),

    #[error("too few elapsed periods for a trend fit ({points})")]
    InsufficientData { points: usize },

    #[error("period {period} is outside a series of {len} periods")]
    PeriodOutOfRange { period: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, FakturaError>;
