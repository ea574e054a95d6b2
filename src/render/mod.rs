// src/render/mod.rs

pub mod chart;
pub mod format;
pub mod slots;
pub mod svg;
pub mod text;

use crate::predict::{PredictionRow, PredictionSet};
use chart::ChartLayout;
use format::{fixed, format_magnitude};

/// Rows listed in the detail table.
pub const DETAIL_ROWS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// 0-based row index.
    pub index: usize,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub total: f64,
    pub mean: f64,
    pub peak: Option<Peak>,
}

impl Summary {
    pub fn compute(rows: &[PredictionRow]) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }
        let total = rows.iter().map(|r| r.predicted_day_total).sum();
        let mean =
            rows.iter().map(|r| r.predicted_mean_per_hour).sum::<f64>() / rows.len() as f64;
        Some(Self {
            count: rows.len(),
            total,
            mean,
            peak: peak(rows),
        })
    }

    pub fn total_label(&self) -> String {
        format_magnitude(self.total)
    }

    pub fn mean_label(&self) -> String {
        fixed(self.mean, 2)
    }
}

/// Row with the largest day total; the first one wins a tie.
pub fn peak(rows: &[PredictionRow]) -> Option<Peak> {
    rows.iter()
        .enumerate()
        .fold(None, |best: Option<Peak>, (index, r)| match best {
            Some(b) if !(r.predicted_day_total > b.value) => Some(b),
            _ if r.predicted_day_total.is_nan() => best,
            _ => Some(Peak {
                index,
                value: r.predicted_day_total,
            }),
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    /// 1-based.
    pub number: usize,
    pub mean_per_hour: String,
    pub day_total: String,
}

pub fn details(rows: &[PredictionRow]) -> Vec<DetailRow> {
    rows.iter()
        .take(DETAIL_ROWS)
        .enumerate()
        .map(|(i, r)| DetailRow {
            number: i + 1,
            mean_per_hour: fixed(r.predicted_mean_per_hour, 3),
            day_total: format_magnitude(r.predicted_day_total),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub summary: Summary,
    pub chart: ChartLayout,
    pub details: Vec<DetailRow>,
}

/// Everything needed to display a prediction response.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionView {
    /// Nothing came back; only a "no predictions" indicator is shown.
    Empty,
    Populated(Report),
}

pub fn render(set: &PredictionSet) -> PredictionView {
    match Summary::compute(&set.rows) {
        None => PredictionView::Empty,
        Some(summary) => {
            let chart = chart::layout(&set.rows, summary.peak.map(|p| p.index));
            PredictionView::Populated(Report {
                summary,
                chart,
                details: details(&set.rows),
            })
        }
    }
}
