//! faktura-ingest: billing source adapters (delimited text and spreadsheet
//! export) producing the normalized record sequence the engine consumes.

pub mod error;
pub mod parsers;
pub mod types;

pub use error::IngestError;
pub use types::{SourceFormat, detect_format, load_records};
