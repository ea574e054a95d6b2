// src/table.rs

use std::{collections::HashMap, fmt};

/// A single cell as it came out of the uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str("null"),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// Normalized in-memory form of an uploaded file.
///
/// Every row holds exactly `headers.len()` cells; a cell the file did not
/// provide is [`CellValue::Null`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    /// Column names in first-seen order, already deduplicated.
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, idx: usize) -> Option<Row<'_>> {
        self.rows.get(idx).map(|cells| Row {
            headers: &self.headers,
            cells,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |cells| Row {
            headers: &self.headers,
            cells,
        })
    }

    /// Borrow the first `n` rows (fewer if the table is shorter).
    pub fn preview(&self, n: usize) -> impl Iterator<Item = Row<'_>> {
        self.iter().take(n)
    }
}

/// Borrowed view of one row, addressable by column name.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    headers: &'a [String],
    cells: &'a [CellValue],
}

impl<'a> Row<'a> {
    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        self.headers
            .iter()
            .position(|h| h == column)
            .and_then(|i| self.cells.get(i))
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a str> {
        self.headers.iter().map(String::as_str)
    }

    pub fn cells(&self) -> &'a [CellValue] {
        self.cells
    }
}

/// Builds a [`RawTable`] from a positional header and positional records.
///
/// Shared by the CSV and spreadsheet readers so both apply the same naming
/// and padding rules.
pub struct TableBuilder {
    headers: Vec<String>,
    /// header position → column index (duplicates map onto the first column)
    slots: Vec<usize>,
    rows: Vec<Vec<CellValue>>,
}

impl TableBuilder {
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut headers: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut slots = Vec::new();

        for (pos, raw) in header.into_iter().enumerate() {
            let name = match raw.as_ref().trim() {
                "" => format!("col{}", pos + 1),
                s => s.to_string(),
            };
            let col = *index.entry(name.clone()).or_insert_with(|| {
                headers.push(name);
                headers.len() - 1
            });
            slots.push(col);
        }

        Self {
            headers,
            slots,
            rows: Vec::new(),
        }
    }

    /// Append a record; positions past the header are dropped, positions the
    /// record lacks stay null.
    pub fn push<I>(&mut self, record: I)
    where
        I: IntoIterator<Item = CellValue>,
    {
        let mut cells = vec![CellValue::Null; self.headers.len()];
        for (pos, value) in record.into_iter().enumerate() {
            match self.slots.get(pos) {
                Some(&col) => cells[col] = value,
                None => break,
            }
        }
        self.rows.push(cells);
    }

    pub fn finish(self) -> RawTable {
        RawTable {
            headers: self.headers,
            rows: self.rows,
        }
    }
}
