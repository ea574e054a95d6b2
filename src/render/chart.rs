// src/render/chart.rs

use super::format::{format_magnitude, round2};
use crate::predict::PredictionRow;

pub const CHART_WIDTH: u32 = 700;
pub const CHART_HEIGHT: u32 = 220;
pub const PADDING: Padding = Padding {
    top: 12,
    right: 12,
    bottom: 28,
    left: 40,
};

/// Positions of the y-axis reference ticks, top to bottom.
pub const TICK_POSITIONS: [f64; 3] = [0.0, 0.5, 1.0];
/// Above this many bars only every n-th bar gets an x-axis label.
pub const MAX_X_LABELS: usize = 20;

pub const MIN_GAP: u32 = 2;
pub const MAX_GAP: u32 = 6;
pub const MIN_BAR_WIDTH: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// 0-based row index.
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub width: u32,
    pub height: f64,
    pub value: f64,
    pub value_label: String,
    pub is_peak: bool,
    /// 1-based index shown under the bar, when this bar is labeled.
    pub axis_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub y: f64,
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub width: u32,
    pub height: u32,
    pub padding: Padding,
    pub inner_width: u32,
    pub inner_height: u32,
    pub max_total: f64,
    pub gap: u32,
    pub bar_width: u32,
    pub label_step: usize,
    pub bars: Vec<Bar>,
    pub ticks: Vec<Tick>,
}

pub fn inner_width() -> u32 {
    CHART_WIDTH - PADDING.left - PADDING.right
}

pub fn inner_height() -> u32 {
    CHART_HEIGHT - PADDING.top - PADDING.bottom
}

/// Gap between bars; narrows as bars get denser, bounded to `[2, 6]`.
pub fn bar_gap(count: usize, inner_width: u32) -> u32 {
    let slots = (count as u64).saturating_mul(6).max(40);
    let raw = u64::from(inner_width) / slots;
    (raw as u32).clamp(MIN_GAP, MAX_GAP)
}

/// Bar width; never below 6 even if the bars then overflow the plot area.
pub fn bar_width(count: usize, inner_width: u32, gap: u32) -> u32 {
    let count = count.max(1) as i64;
    let free = i64::from(inner_width) - i64::from(gap) * (count - 1);
    free.div_euclid(count).max(i64::from(MIN_BAR_WIDTH)) as u32
}

/// Every how many bars an x-axis label is drawn.
pub fn label_step(count: usize) -> usize {
    if count <= MAX_X_LABELS {
        1
    } else {
        count.div_ceil(MAX_X_LABELS)
    }
}

/// Lay out the bar chart for `rows`. `peak` is the emphasized bar.
pub fn layout(rows: &[PredictionRow], peak: Option<usize>) -> ChartLayout {
    let count = rows.len();
    let inner_w = inner_width();
    let inner_h = inner_height();
    let max_total = rows
        .iter()
        .map(|r| r.predicted_day_total)
        .fold(1.0_f64, f64::max);

    let gap = bar_gap(count, inner_w);
    let bar_w = bar_width(count, inner_w, gap);
    let step = label_step(count);
    let baseline = f64::from(PADDING.top + inner_h);

    let bars = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let raw = r.predicted_day_total * f64::from(inner_h) / max_total;
            let height = raw.max(1.0);
            Bar {
                index: i,
                x: f64::from(PADDING.left) + i as f64 * f64::from(bar_w + gap),
                y: baseline - height,
                width: bar_w,
                height,
                value: r.predicted_day_total,
                value_label: format_magnitude(r.predicted_day_total),
                is_peak: peak == Some(i),
                axis_label: (i % step == 0).then(|| (i + 1).to_string()),
            }
        })
        .collect();

    let ticks = TICK_POSITIONS
        .iter()
        .map(|&position| {
            let value = round2((1.0 - position) * max_total);
            Tick {
                position,
                y: f64::from(PADDING.top) + position * f64::from(inner_h),
                value,
                label: format_magnitude(value),
            }
        })
        .collect();

    ChartLayout {
        width: CHART_WIDTH,
        height: CHART_HEIGHT,
        padding: PADDING,
        inner_width: inner_w,
        inner_height: inner_h,
        max_total,
        gap,
        bar_width: bar_w,
        label_step: step,
        bars,
        ticks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(totals: &[f64]) -> Vec<PredictionRow> {
        totals
            .iter()
            .map(|&t| PredictionRow {
                predicted_mean_per_hour: t / 24.0,
                predicted_day_total: t,
            })
            .collect()
    }

    #[test]
    fn test_inner_dimensions() {
        assert_eq!(inner_width(), 648);
        assert_eq!(inner_height(), 180);
    }

    #[test]
    fn test_bar_width_and_gap_bounds_for_all_counts() {
        for count in 1..=5_000 {
            let gap = bar_gap(count, inner_width());
            let width = bar_width(count, inner_width(), gap);
            assert!((MIN_GAP..=MAX_GAP).contains(&gap), "gap {} at {}", gap, count);
            assert!(width >= MIN_BAR_WIDTH, "width {} at {}", width, count);
        }
    }

    #[test]
    fn test_gap_and_width_at_known_counts() {
        // 648 / 40 = 16 -> clamped to 6
        assert_eq!(bar_gap(1, 648), 6);
        assert_eq!(bar_width(1, 648, 6), 648);
        // 648 / 60 = 10 -> 6; (648 - 54) / 10 = 59
        assert_eq!(bar_gap(10, 648), 6);
        assert_eq!(bar_width(10, 648, 6), 59);
        // 648 / 300 = 2
        assert_eq!(bar_gap(50, 648), 2);
        assert_eq!(bar_width(50, 648, 2), 11);
        // dense: bars stay 6 wide even past the plot edge
        assert_eq!(bar_gap(500, 648), 2);
        assert_eq!(bar_width(500, 648, 2), 6);
    }

    #[test]
    fn test_zero_totals_keep_a_visible_sliver() {
        let chart = layout(&rows(&[0.0, 0.0]), Some(0));
        assert_eq!(chart.max_total, 1.0);
        for bar in &chart.bars {
            assert_eq!(bar.height, 1.0);
            assert_eq!(bar.y + bar.height, f64::from(PADDING.top + chart.inner_height));
        }
    }

    #[test]
    fn test_heights_are_proportional_to_max() {
        let chart = layout(&rows(&[10.0, 30.0, 30.0, 5.0]), Some(1));
        assert_eq!(chart.max_total, 30.0);
        assert_eq!(chart.bars[1].height, 180.0);
        assert_eq!(chart.bars[0].height, 60.0);
        assert_eq!(chart.bars[3].height, 30.0);
        assert_eq!(chart.bars[1].y, 12.0);
    }

    #[test]
    fn test_only_the_peak_bar_is_emphasized() {
        let chart = layout(&rows(&[10.0, 30.0, 30.0, 5.0]), Some(1));
        let peaks: Vec<usize> = chart
            .bars
            .iter()
            .filter(|b| b.is_peak)
            .map(|b| b.index)
            .collect();
        assert_eq!(peaks, vec![1]);
    }

    #[test]
    fn test_three_ticks_top_to_bottom() {
        let chart = layout(&rows(&[1500.0, 3.0]), Some(0));
        let labels: Vec<&str> = chart.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["1,500", "750", "0"]);
        assert_eq!(chart.ticks[0].y, 12.0);
        assert_eq!(chart.ticks[2].y, 192.0);
    }

    #[test]
    fn test_tick_values_round_to_two_decimals() {
        let chart = layout(&rows(&[3.336]), Some(0));
        assert_eq!(chart.ticks[0].value, 3.34);
        assert_eq!(chart.ticks[1].label, "1.67");
    }

    #[test]
    fn test_every_bar_labeled_up_to_twenty() {
        let chart = layout(&rows(&[1.0; 20]), Some(0));
        assert!(chart.bars.iter().all(|b| b.axis_label.is_some()));
        assert_eq!(chart.bars[19].axis_label.as_deref(), Some("20"));
    }

    #[test]
    fn test_sparse_labels_above_twenty() {
        let chart = layout(&rows(&[1.0; 45]), Some(0));
        assert_eq!(chart.label_step, 3);
        let labeled: Vec<usize> = chart
            .bars
            .iter()
            .filter(|b| b.axis_label.is_some())
            .map(|b| b.index)
            .collect();
        assert_eq!(labeled.len(), 15);
        assert!(labeled.iter().all(|i| i % 3 == 0));
        assert_eq!(chart.bars[3].axis_label.as_deref(), Some("4"));
    }

    #[test]
    fn test_bars_are_laid_out_left_to_right() {
        let chart = layout(&rows(&[1.0, 2.0, 3.0]), Some(2));
        let step = f64::from(chart.bar_width + chart.gap);
        assert_eq!(chart.bars[0].x, 40.0);
        assert_eq!(chart.bars[2].x, 40.0 + 2.0 * step);
    }
}
