// src/parse/delimited.rs

use super::ParseError;
use crate::table::{CellValue, RawTable, TableBuilder};
use csv::{ReaderBuilder, Terminator, Trim};
use tracing::trace;

/// Parse comma-separated text into a [`RawTable`].
///
/// Blank lines are ignored, every line and cell is trimmed, and quotes are
/// plain characters. The first remaining line is the header. An input with
/// no content lines yields an empty table.
pub fn parse_csv(bytes: &[u8]) -> Result<RawTable, ParseError> {
    let text = String::from_utf8_lossy(bytes);
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() {
        return Ok(RawTable::default());
    }
    trace!(lines = lines.len(), "csv content lines");

    let joined = lines.join("\n");
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // short rows are padded later, not rejected
        .quoting(false)
        .trim(Trim::All)
        .terminator(Terminator::Any(b'\n')) // a lone \r stays inside its cell
        .from_reader(joined.as_bytes());

    let mut records = rdr.records();
    let header = match records.next() {
        Some(rec) => rec.map_err(|e| ParseError::Content(format!("CSV header: {}", e)))?,
        None => return Ok(RawTable::default()),
    };

    let mut builder = TableBuilder::new(header.iter());
    for (idx, result) in records.enumerate() {
        let record =
            result.map_err(|e| ParseError::Content(format!("CSV record {}: {}", idx + 1, e)))?;
        builder.push(record.iter().map(|c| CellValue::Text(c.to_string())));
    }

    Ok(builder.finish())
}
