// src/parse/mod.rs

pub mod delimited;
pub mod spreadsheet;

use crate::table::RawTable;
use thiserror::Error;
use tracing::{debug, instrument};

pub use spreadsheet::{spreadsheet_support, SpreadsheetReader, SpreadsheetSupport};

/// Upload encodings we know how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
    Xls,
}

impl FileFormat {
    /// Pick the format from the file name suffix, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        if lower.ends_with(".csv") {
            Some(FileFormat::Csv)
        } else if lower.ends_with(".xlsx") {
            Some(FileFormat::Xlsx)
        } else if lower.ends_with(".xls") {
            Some(FileFormat::Xls)
        } else {
            None
        }
    }

    pub fn is_spreadsheet(&self) -> bool {
        matches!(self, FileFormat::Xlsx | FileFormat::Xls)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unsupported file type: {0} (only .csv, .xlsx and .xls files are accepted)")]
    UnsupportedFormat(String),

    #[error(
        "reading .xlsx/.xls files requires spreadsheet support; rebuild with `--features spreadsheet` or upload a .csv file"
    )]
    MissingSpreadsheetSupport,

    /// Malformed content; the message is shown to the operator as-is.
    #[error("{0}")]
    Content(String),
}

/// Parse an uploaded file using the process-wide spreadsheet capability.
pub fn parse_table(name: &str, bytes: &[u8]) -> Result<RawTable, ParseError> {
    parse_table_with(name, bytes, spreadsheet_support())
}

#[instrument(level = "debug", skip(bytes, support), fields(len = bytes.len()))]
pub fn parse_table_with(
    name: &str,
    bytes: &[u8],
    support: &SpreadsheetSupport,
) -> Result<RawTable, ParseError> {
    let format =
        FileFormat::from_name(name).ok_or_else(|| ParseError::UnsupportedFormat(name.to_string()))?;

    let table = match format {
        FileFormat::Csv => delimited::parse_csv(bytes)?,
        FileFormat::Xlsx | FileFormat::Xls => match support {
            SpreadsheetSupport::Available(reader) => reader.read_first_sheet(format, bytes)?,
            SpreadsheetSupport::Unavailable => return Err(ParseError::MissingSpreadsheetSupport),
        },
    };

    debug!(
        ?format,
        rows = table.len(),
        columns = table.headers.len(),
        "parsed upload"
    );
    Ok(table)
}
