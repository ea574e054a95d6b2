// src/session.rs

use crate::dataset::{DatasetController, SelectedFile, SlotKind, SubmitError};
use crate::parse::{self, FileFormat, ParseError};
use crate::predict::{PredictionClient, PredictionSet, TransportError};
use crate::table::RawTable;
use anyhow::Result;
use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// What happened to a selection once its parse finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Applied,
    /// A newer selection on the same slot won; this result was dropped.
    Superseded,
}

/// Async driver around a [`DatasetController`].
///
/// Parses run on the blocking pool and may overlap across slots; the
/// controller's generation check keeps only the latest one per slot.
pub struct Session<C> {
    controller: Arc<Mutex<DatasetController>>,
    client: C,
}

impl<C: PredictionClient> Session<C> {
    pub fn new(client: C) -> Self {
        Self {
            controller: Arc::new(Mutex::new(DatasetController::new())),
            client,
        }
    }

    /// Lock the controller for reading derived state.
    pub fn controller(&self) -> MutexGuard<'_, DatasetController> {
        self.controller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Read `path` from disk and select it into `slot`.
    pub async fn load_path(&self, slot: SlotKind, path: impl AsRef<Path>) -> Result<ParseOutcome> {
        let file = SelectedFile::read(path).await?;
        Ok(self.select(slot, file).await)
    }

    /// Select `file` into `slot` and parse it.
    #[instrument(level = "info", skip(self, file), fields(file = %file.name))]
    pub async fn select(&self, slot: SlotKind, file: SelectedFile) -> ParseOutcome {
        self.select_with(slot, file, parse::parse_table).await
    }

    async fn select_with<F>(&self, slot: SlotKind, file: SelectedFile, parser: F) -> ParseOutcome
    where
        F: FnOnce(&str, &[u8]) -> Result<RawTable, ParseError> + Send + 'static,
    {
        let ticket = self.controller().select_file(slot, file.clone());
        if let Some(format) = FileFormat::from_name(&file.name) {
            debug!(?format, spreadsheet = format.is_spreadsheet(), "dispatching parse");
        }

        let result = tokio::task::spawn_blocking(move || parser(&file.name, &file.contents))
            .await
            .unwrap_or_else(|e| Err(ParseError::Content(format!("parser task failed: {}", e))));

        if self.controller().complete_parse(ticket, result) {
            ParseOutcome::Applied
        } else {
            ParseOutcome::Superseded
        }
    }

    /// Submit both uploads. Only one submission runs at a time; the controller
    /// is left retryable whatever the outcome.
    #[instrument(level = "info", skip(self))]
    pub async fn submit(&self) -> Result<PredictionSet, SessionError> {
        let request = self.controller().begin_submission()?;
        let result = self.client.predict(&request).await;
        let mut ctl = self.controller();
        ctl.finish_submission(result.clone());
        Ok(result?)
    }
}
