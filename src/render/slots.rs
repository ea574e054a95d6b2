// src/render/slots.rs

use crate::dataset::{DatasetController, SlotKind};
use crate::schema::SchemaSpec;

/// What is shown for one upload slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotDisplay {
    pub kind: SlotKind,
    pub file_name: Option<String>,
    pub required: &'static [&'static str],
    /// Only set once a table was parsed.
    pub missing: Option<Vec<String>>,
    pub error: Option<String>,
    pub row_count: Option<usize>,
    pub preview_headers: Vec<String>,
    pub preview_rows: Vec<Vec<String>>,
}

impl SlotDisplay {
    pub fn from_controller(ctl: &DatasetController, kind: SlotKind) -> Self {
        let slot = ctl.slot(kind);
        let table = slot.table();
        let preview = ctl.preview(kind);

        let preview_headers = table.map(|t| t.headers.clone()).unwrap_or_default();
        let preview_rows = preview
            .iter()
            .map(|row| row.cells().iter().map(|c| c.to_string()).collect())
            .collect();

        Self {
            kind,
            file_name: slot.file_name().map(str::to_string),
            required: SchemaSpec::for_slot(kind).columns,
            missing: table.map(|_| ctl.validation(kind).missing),
            error: slot.error().map(|e| e.to_string()),
            row_count: slot.row_count(),
            preview_headers,
            preview_rows,
        }
    }

    pub fn has_preview(&self) -> bool {
        !self.preview_rows.is_empty()
    }
}

/// Advisory notes that never block submission.
pub fn advisories(ctl: &DatasetController) -> Vec<String> {
    ctl.row_count_mismatch()
        .map(|(today, tomorrow)| {
            format!(
                "row counts differ: today has {} rows, tomorrow has {}",
                today, tomorrow
            )
        })
        .into_iter()
        .collect()
}
