// src/render/text.rs
//! Plain-text rendering for the terminal.

use super::slots::SlotDisplay;
use super::{PredictionView, Report};
use crate::schema::{docs, SchemaSpec};
use std::io::{self, Write};

pub const NO_PREDICTIONS: &str = "no predictions";

pub fn write_slot<W: Write>(out: &mut W, slot: &SlotDisplay) -> io::Result<()> {
    writeln!(out, "[{}]", slot.kind)?;
    match &slot.file_name {
        Some(name) => writeln!(out, "  file: {}", name)?,
        None => writeln!(out, "  file: no file selected")?,
    }
    writeln!(out, "  required: {}", slot.required.join(", "))?;
    if let Some(err) = &slot.error {
        writeln!(out, "  error: {}", err)?;
    }
    if let Some(missing) = &slot.missing {
        if missing.is_empty() {
            writeln!(out, "  missing: none")?;
        } else {
            writeln!(out, "  missing: {}", missing.join(", "))?;
        }
    }
    if let Some(rows) = slot.row_count {
        writeln!(out, "  rows: {}", rows)?;
    }

    if !slot.has_preview() {
        return writeln!(out, "  preview: no data");
    }
    writeln!(out, "  preview:")?;
    writeln!(out, "    {}", slot.preview_headers.join(" | "))?;
    for row in &slot.preview_rows {
        writeln!(out, "    {}", row.join(" | "))?;
    }
    Ok(())
}

/// Readiness line plus any blocking reasons and advisories.
pub fn write_readiness<W: Write>(
    out: &mut W,
    blockers: &[String],
    advisories: &[String],
) -> io::Result<()> {
    for note in advisories {
        writeln!(out, "note: {}", note)?;
    }
    if blockers.is_empty() {
        return writeln!(out, "ready to submit");
    }
    writeln!(out, "not ready:")?;
    for reason in blockers {
        writeln!(out, "  - {}", reason)?;
    }
    Ok(())
}

pub fn write_report<W: Write>(out: &mut W, view: &PredictionView) -> io::Result<()> {
    match view {
        PredictionView::Empty => writeln!(out, "{}", NO_PREDICTIONS),
        PredictionView::Populated(report) => write_populated(out, report),
    }
}

fn write_populated<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    let summary = &report.summary;
    writeln!(out, "rows: {}", summary.count)?;
    writeln!(out, "total: {}", summary.total_label())?;
    writeln!(out, "mean per hour: {}", summary.mean_label())?;
    if let Some(peak) = summary.peak {
        writeln!(
            out,
            "peak: row {} ({})",
            peak.index + 1,
            super::format::format_magnitude(peak.value)
        )?;
    }

    writeln!(out)?;
    writeln!(out, "{:>4}  {:>14}  {:>14}", "#", "mean/hour", "day total")?;
    for row in &report.details {
        writeln!(
            out,
            "{:>4}  {:>14}  {:>14}",
            row.number, row.mean_per_hour, row.day_total
        )?;
    }
    if summary.count > report.details.len() {
        writeln!(
            out,
            "({} more rows not shown)",
            summary.count - report.details.len()
        )?;
    }
    Ok(())
}

/// Required columns of `spec` with their descriptions.
pub fn write_columns<W: Write>(out: &mut W, spec: &SchemaSpec) -> io::Result<()> {
    let width = spec.columns.iter().map(|c| c.len()).max().unwrap_or(0);
    for column in spec.columns {
        writeln!(
            out,
            "{:<width$}  {}",
            column,
            docs::describe(column).unwrap_or(""),
            width = width
        )?;
    }
    Ok(())
}
