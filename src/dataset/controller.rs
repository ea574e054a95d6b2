// src/dataset/controller.rs

use super::{DatasetSlot, SelectedFile, SlotKind, PREVIEW_ROWS};
use crate::parse::ParseError;
use crate::predict::{PredictionRequest, PredictionSet, TransportError};
use crate::schema::{self, SchemaSpec, ValidationResult};
use crate::table::{RawTable, Row};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Issued by [`DatasetController::select_file`]; a parse result is only
/// applied while its ticket is still the slot's latest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseTicket {
    pub slot: SlotKind,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("a submission is already in flight")]
    InFlight,

    #[error("not ready to submit: {}", .0.join("; "))]
    NotReady(Vec<String>),
}

/// Owns both upload slots and the submission lifecycle.
///
/// Everything derived (validation, readiness, previews) is computed from the
/// slots on each call.
#[derive(Debug)]
pub struct DatasetController {
    today: DatasetSlot,
    tomorrow: DatasetSlot,
    in_flight: bool,
    /// Slot generations the in-flight submission was built from.
    submitted: Option<(u64, u64)>,
    predictions: Option<PredictionSet>,
    submission_error: Option<TransportError>,
}

impl Default for DatasetController {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetController {
    pub fn new() -> Self {
        Self {
            today: DatasetSlot::new(SlotKind::Today),
            tomorrow: DatasetSlot::new(SlotKind::Tomorrow),
            in_flight: false,
            submitted: None,
            predictions: None,
            submission_error: None,
        }
    }

    pub fn slot(&self, kind: SlotKind) -> &DatasetSlot {
        match kind {
            SlotKind::Today => &self.today,
            SlotKind::Tomorrow => &self.tomorrow,
        }
    }

    fn slot_mut(&mut self, kind: SlotKind) -> &mut DatasetSlot {
        match kind {
            SlotKind::Today => &mut self.today,
            SlotKind::Tomorrow => &mut self.tomorrow,
        }
    }

    /// Store a new file for `kind`, superseding any parse still running for
    /// the previous one.
    pub fn select_file(&mut self, kind: SlotKind, file: SelectedFile) -> ParseTicket {
        info!(slot = %kind, file = %file.name, "file selected");
        let generation = self.slot_mut(kind).select(file);
        // results on screen no longer match the inputs
        self.predictions = None;
        self.submission_error = None;
        ParseTicket {
            slot: kind,
            generation,
        }
    }

    /// Apply a finished parse. Returns `false` when the ticket is stale and
    /// the result was dropped.
    pub fn complete_parse(
        &mut self,
        ticket: ParseTicket,
        result: Result<RawTable, ParseError>,
    ) -> bool {
        let slot = self.slot_mut(ticket.slot);
        if slot.generation() != ticket.generation {
            debug!(
                slot = %ticket.slot,
                ticket = ticket.generation,
                current = slot.generation(),
                "dropping stale parse result"
            );
            return false;
        }
        match &result {
            Ok(table) => info!(slot = %ticket.slot, rows = table.len(), "parsed"),
            Err(err) => warn!(slot = %ticket.slot, error = %err, "parse failed"),
        }
        slot.apply(result);
        true
    }

    pub fn file_name(&self, kind: SlotKind) -> Option<&str> {
        self.slot(kind).file_name()
    }

    pub fn preview(&self, kind: SlotKind) -> Vec<Row<'_>> {
        self.slot(kind)
            .table()
            .map(|t| t.preview(PREVIEW_ROWS).collect())
            .unwrap_or_default()
    }

    pub fn row_count(&self, kind: SlotKind) -> Option<usize> {
        self.slot(kind).row_count()
    }

    pub fn error(&self, kind: SlotKind) -> Option<&ParseError> {
        self.slot(kind).error()
    }

    pub fn validation(&self, kind: SlotKind) -> ValidationResult {
        schema::check(self.slot(kind).table(), SchemaSpec::for_slot(kind))
    }

    /// Both row counts when both slots parsed and they differ. Advisory only.
    pub fn row_count_mismatch(&self) -> Option<(usize, usize)> {
        match (self.row_count(SlotKind::Today), self.row_count(SlotKind::Tomorrow)) {
            (Some(a), Some(b)) if a != b => Some((a, b)),
            _ => None,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn can_submit(&self) -> bool {
        self.blockers().is_empty()
    }

    /// Human-readable reasons submission is currently disabled.
    pub fn blockers(&self) -> Vec<String> {
        let mut out = Vec::new();
        for kind in SlotKind::ALL {
            let slot = self.slot(kind);
            match (slot.file(), slot.error(), slot.table()) {
                (None, _, _) => out.push(format!("{}: no file selected", kind)),
                (Some(_), Some(err), _) => out.push(format!("{}: {}", kind, err)),
                (Some(_), None, None) => out.push(format!("{}: not parsed yet", kind)),
                (Some(_), None, Some(t)) if t.is_empty() => {
                    out.push(format!("{}: table has no rows", kind))
                }
                (Some(_), None, Some(_)) => {
                    let res = self.validation(kind);
                    if !res.satisfied {
                        out.push(format!("{}: missing columns {}", kind, res.missing.join(", ")));
                    }
                }
            }
        }
        if self.in_flight {
            out.push("a submission is already in flight".to_string());
        }
        out
    }

    /// Start a submission: checks readiness, marks it in flight and clears the
    /// previous outcome.
    pub fn begin_submission(&mut self) -> Result<PredictionRequest, SubmitError> {
        if self.in_flight {
            return Err(SubmitError::InFlight);
        }
        let blockers = self.blockers();
        if !blockers.is_empty() {
            return Err(SubmitError::NotReady(blockers));
        }
        let (Some(today), Some(tomorrow)) = (self.today.file(), self.tomorrow.file()) else {
            return Err(SubmitError::NotReady(vec!["files missing".to_string()]));
        };
        let request = PredictionRequest {
            today: today.clone(),
            tomorrow: tomorrow.clone(),
        };

        self.in_flight = true;
        self.submitted = Some(self.generations());
        self.predictions = None;
        self.submission_error = None;
        info!(today = %request.today.name, tomorrow = %request.tomorrow.name, "submission started");
        Ok(request)
    }

    fn generations(&self) -> (u64, u64) {
        (self.today.generation(), self.tomorrow.generation())
    }

    /// Settle the in-flight submission; either way the controller is ready for
    /// another attempt. Returns `false` when a slot was reselected meanwhile
    /// and the outcome was dropped.
    pub fn finish_submission(&mut self, result: Result<PredictionSet, TransportError>) -> bool {
        self.in_flight = false;
        let submitted = self.submitted.take();
        if submitted != Some(self.generations()) {
            debug!(
                submitted = ?submitted,
                current = ?self.generations(),
                ok = result.is_ok(),
                "dropping submission outcome for replaced inputs"
            );
            return false;
        }
        match result {
            Ok(set) => {
                info!(rows = set.len(), "submission succeeded");
                self.predictions = Some(set);
            }
            Err(err) => {
                warn!(error = %err, "submission failed");
                self.submission_error = Some(err);
            }
        }
        true
    }

    pub fn predictions(&self) -> Option<&PredictionSet> {
        self.predictions.as_ref()
    }

    pub fn submission_error(&self) -> Option<&TransportError> {
        self.submission_error.as_ref()
    }
}
