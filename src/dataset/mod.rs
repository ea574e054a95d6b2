// src/dataset/mod.rs

pub mod controller;

use crate::parse::ParseError;
use crate::table::RawTable;
use anyhow::{Context, Result};
use std::{fmt, path::Path, str::FromStr, sync::Arc};

pub use controller::{DatasetController, ParseTicket, SubmitError};

/// Rows shown in a slot preview.
pub const PREVIEW_ROWS: usize = 5;

/// The two upload roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Today,
    Tomorrow,
}

impl SlotKind {
    pub const ALL: [SlotKind; 2] = [SlotKind::Today, SlotKind::Tomorrow];

    pub fn as_str(&self) -> &'static str {
        match self {
            SlotKind::Today => "today",
            SlotKind::Tomorrow => "tomorrow",
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlotKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "today" => Ok(SlotKind::Today),
            "tomorrow" => Ok(SlotKind::Tomorrow),
            other => Err(format!("unknown slot {:?} (expected today or tomorrow)", other)),
        }
    }
}

/// An uploaded file: its declared name plus the raw bytes that get parsed
/// locally and forwarded untouched to the prediction service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub contents: Arc<[u8]>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, contents: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }

    /// Read a file from disk, naming it after its final path component.
    pub async fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("{} has no file name", path.display()))?;
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        Ok(Self::new(name, bytes))
    }
}

/// Per-slot state. Validation and previews are derived on read by the
/// controller, never stored here.
#[derive(Debug)]
pub struct DatasetSlot {
    kind: SlotKind,
    file: Option<SelectedFile>,
    table: Option<RawTable>,
    error: Option<ParseError>,
    generation: u64,
}

impl DatasetSlot {
    pub fn new(kind: SlotKind) -> Self {
        Self {
            kind,
            file: None,
            table: None,
            error: None,
            generation: 0,
        }
    }

    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file.as_ref().map(|f| f.name.as_str())
    }

    pub fn table(&self) -> Option<&RawTable> {
        self.table.as_ref()
    }

    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn row_count(&self) -> Option<usize> {
        self.table.as_ref().map(RawTable::len)
    }

    /// Replace the selection and drop everything derived from the old one.
    fn select(&mut self, file: SelectedFile) -> u64 {
        self.generation += 1;
        self.file = Some(file);
        self.table = None;
        self.error = None;
        self.generation
    }

    fn apply(&mut self, result: Result<RawTable, ParseError>) {
        match result {
            Ok(table) => {
                self.table = Some(table);
                self.error = None;
            }
            Err(err) => {
                self.table = None;
                self.error = Some(err);
            }
        }
    }
}
