use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("required column {0:?} not found in header row")]
    MissingColumn(&'static str),

    #[error("row {row}: unparseable date {value:?}")]
    BadDate { row: usize, value: String },

    #[error("row {row}: unparseable amount {value:?}")]
    BadAmount { row: usize, value: String },

    #[error("invalid parser pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;
