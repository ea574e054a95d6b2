// src/parse/spreadsheet.rs

use super::{FileFormat, ParseError};
use crate::table::RawTable;
use once_cell::sync::Lazy;

/// Something that can turn workbook bytes into a table.
pub trait SpreadsheetReader: Send + Sync {
    /// Read the first worksheet only; later sheets are ignored.
    fn read_first_sheet(&self, format: FileFormat, bytes: &[u8]) -> Result<RawTable, ParseError>;
}

/// Outcome of resolving the optional spreadsheet capability.
pub enum SpreadsheetSupport {
    Available(&'static dyn SpreadsheetReader),
    Unavailable,
}

impl SpreadsheetSupport {
    pub fn is_available(&self) -> bool {
        matches!(self, SpreadsheetSupport::Available(_))
    }
}

static SUPPORT: Lazy<SpreadsheetSupport> = Lazy::new(resolve);

/// The process-wide capability, resolved on first use.
pub fn spreadsheet_support() -> &'static SpreadsheetSupport {
    &SUPPORT
}

#[cfg(feature = "spreadsheet")]
fn resolve() -> SpreadsheetSupport {
    tracing::debug!("spreadsheet support: calamine");
    SpreadsheetSupport::Available(&calamine_reader::CalamineReader)
}

#[cfg(not(feature = "spreadsheet"))]
fn resolve() -> SpreadsheetSupport {
    tracing::debug!("spreadsheet support: unavailable");
    SpreadsheetSupport::Unavailable
}

#[cfg(feature = "spreadsheet")]
mod calamine_reader {
    use super::*;
    use crate::table::{CellValue, TableBuilder};
    use calamine::{Data, Range, Reader, Xls, Xlsx};
    use std::{
        fmt::Display,
        io::{Cursor, Read, Seek},
    };
    use tracing::trace;

    pub struct CalamineReader;

    impl SpreadsheetReader for CalamineReader {
        fn read_first_sheet(
            &self,
            format: FileFormat,
            bytes: &[u8],
        ) -> Result<RawTable, ParseError> {
            let cursor = Cursor::new(bytes);
            let range = match format {
                FileFormat::Xlsx => first_sheet::<_, Xlsx<_>>(cursor)?,
                FileFormat::Xls => first_sheet::<_, Xls<_>>(cursor)?,
                FileFormat::Csv => {
                    return Err(ParseError::Content(
                        "CSV input handed to the spreadsheet reader".into(),
                    ))
                }
            };
            Ok(range_to_table(&range))
        }
    }

    fn first_sheet<RS, R>(reader: RS) -> Result<Range<Data>, ParseError>
    where
        RS: Read + Seek,
        R: Reader<RS>,
        R::Error: Display,
    {
        let mut workbook =
            R::new(reader).map_err(|e| ParseError::Content(format!("cannot open workbook: {}", e)))?;
        let names = workbook.sheet_names();
        let first = names
            .first()
            .ok_or_else(|| ParseError::Content("workbook contains no sheets".into()))?;
        trace!(sheet = %first, total = names.len(), "reading first sheet");
        workbook
            .worksheet_range(first)
            .map_err(|e| ParseError::Content(format!("cannot read sheet {}: {}", first, e)))
    }

    fn range_to_table(range: &Range<Data>) -> RawTable {
        let mut rows = range
            .rows()
            .filter(|r| !r.iter().all(|c| matches!(c, Data::Empty)));

        let header = match rows.next() {
            Some(h) => h,
            None => return RawTable::default(),
        };
        let names: Vec<String> = header
            .iter()
            .map(|c| match c {
                Data::Empty => String::new(),
                other => other.to_string(),
            })
            .collect();

        let mut builder = TableBuilder::new(names);
        for row in rows {
            builder.push(row.iter().map(to_cell));
        }
        builder.finish()
    }

    fn to_cell(data: &Data) -> CellValue {
        match data {
            Data::Empty => CellValue::Null,
            Data::Bool(b) => CellValue::Bool(*b),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::String(s) => CellValue::Text(s.clone()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

#[cfg(all(test, feature = "spreadsheet"))]
mod tests {
    use super::*;
    use crate::table::CellValue;
    use anyhow::Result;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::CompressionMethod;

    const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/worksheets/sheet2.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

    const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

    const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets>
<sheet name="today" sheetId="1" r:id="rId1"/>
<sheet name="ignored" sheetId="2" r:id="rId2"/>
</sheets>
</workbook>"#;

    const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/>
</Relationships>"#;

    fn inline(cell: &str, value: &str) -> String {
        format!(
            r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
            cell, value
        )
    }

    fn number(cell: &str, value: f64) -> String {
        format!(r#"<c r="{}"><v>{}</v></c>"#, cell, value)
    }

    fn sheet(rows: &[(u32, Vec<String>)]) -> String {
        let body: String = rows
            .iter()
            .map(|(r, cells)| format!(r#"<row r="{}">{}</row>"#, r, cells.concat()))
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
            body
        )
    }

    /// Assemble a minimal two-sheet .xlsx in memory.
    fn build_xlsx(first: &str, second: &str) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            for (name, body) in [
                ("[Content_Types].xml", CONTENT_TYPES),
                ("_rels/.rels", ROOT_RELS),
                ("xl/workbook.xml", WORKBOOK),
                ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS),
                ("xl/worksheets/sheet1.xml", first),
                ("xl/worksheets/sheet2.xml", second),
            ] {
                let options =
                    SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
                zip.start_file(name, options)?;
                zip.write_all(body.as_bytes())?;
            }
            zip.finish()?;
        }
        Ok(buf)
    }

    #[test]
    fn test_reads_first_sheet_with_null_padding() -> Result<()> {
        let first = sheet(&[
            (
                1,
                vec![
                    inline("A1", "discount"),
                    inline("B1", "holiday_flag"),
                    inline("C1", "precpt"),
                ],
            ),
            (2, vec![number("A2", 0.25), number("B2", 1.0)]),
        ]);
        let second = sheet(&[(1, vec![inline("A1", "unrelated")])]);
        let bytes = build_xlsx(&first, &second)?;

        let table = crate::parse::parse_table("today.xlsx", &bytes)?;
        assert_eq!(table.headers, vec!["discount", "holiday_flag", "precpt"]);
        assert_eq!(table.len(), 1);

        let row = table.row(0).unwrap();
        assert_eq!(row.get("discount"), Some(&CellValue::Number(0.25)));
        assert_eq!(row.get("holiday_flag"), Some(&CellValue::Number(1.0)));
        assert_eq!(row.get("precpt"), Some(&CellValue::Null));
        assert!(row.get("unrelated").is_none());
        Ok(())
    }

    #[test]
    fn test_blank_rows_are_skipped() -> Result<()> {
        let first = sheet(&[
            (1, vec![inline("A1", "a"), inline("B1", "b")]),
            (2, vec![number("A2", 1.0), number("B2", 2.0)]),
            (4, vec![number("A4", 3.0), number("B4", 4.0)]),
        ]);
        let bytes = build_xlsx(&first, &sheet(&[]))?;

        let table = crate::parse::parse_table("t.XLSX", &bytes)?;
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.row(1).unwrap().get("a"),
            Some(&CellValue::Number(3.0))
        );
        Ok(())
    }

    #[test]
    fn test_corrupt_workbook_is_a_content_error() {
        let err = crate::parse::parse_table("broken.xlsx", b"not a zip").unwrap_err();
        assert!(matches!(err, ParseError::Content(_)));
    }

    #[test]
    fn test_support_resolves_when_feature_enabled() {
        assert!(spreadsheet_support().is_available());
    }
}
