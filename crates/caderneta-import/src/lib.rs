pub mod csv;
pub mod error;

pub use csv::{export_csv, parse_csv, CsvContact, ImportReport, ParsedCsv};
pub use error::ImportError;
