// src/render/svg.rs

use super::chart::ChartLayout;
use std::fmt::Write;

const BAR_COLOR: &str = "#34d399";
const BAR_OPACITY: f64 = 0.9;
const PEAK_COLOR: &str = "#15803d";
const GRID_COLOR: &str = "#e5e7eb";
const TEXT_COLOR: &str = "#6b7280";
const CORNER_RADIUS: u32 = 4;

/// Draw `chart` as a standalone SVG document.
pub fn chart_svg(chart: &ChartLayout) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_svg(&mut out, chart);
    out
}

fn write_svg(out: &mut String, chart: &ChartLayout) -> std::fmt::Result {
    let left = f64::from(chart.padding.left);
    let right = left + f64::from(chart.inner_width);
    let axis_y = f64::from(chart.padding.top + chart.inner_height) + 18.0;

    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
        w = chart.width,
        h = chart.height
    )?;

    for tick in &chart.ticks {
        writeln!(
            out,
            r#"  <line x1="{left}" y1="{y}" x2="{right}" y2="{y}" stroke="{GRID_COLOR}" stroke-width="1"/>"#,
            y = tick.y
        )?;
        writeln!(
            out,
            r#"  <text x="{x}" y="{y}" font-size="10" text-anchor="end" fill="{TEXT_COLOR}">{label}</text>"#,
            x = left - 6.0,
            y = tick.y + 3.0,
            label = escape(&tick.label)
        )?;
    }

    for bar in &chart.bars {
        let (fill, opacity) = if bar.is_peak {
            (PEAK_COLOR, 1.0)
        } else {
            (BAR_COLOR, BAR_OPACITY)
        };
        let center = bar.x + f64::from(bar.width) / 2.0;
        writeln!(
            out,
            r#"  <rect x="{x}" y="{y}" width="{w}" height="{h}" rx="{CORNER_RADIUS}" fill="{fill}" fill-opacity="{opacity}"/>"#,
            x = bar.x,
            y = bar.y,
            w = bar.width,
            h = bar.height
        )?;
        writeln!(
            out,
            r#"  <text x="{center}" y="{y}" font-size="9" text-anchor="middle" fill="{TEXT_COLOR}">{label}</text>"#,
            y = bar.y - 4.0,
            label = escape(&bar.value_label)
        )?;
        if let Some(label) = &bar.axis_label {
            writeln!(
                out,
                r#"  <text x="{center}" y="{axis_y}" font-size="10" text-anchor="middle" fill="{TEXT_COLOR}">{label}</text>"#,
                label = escape(label)
            )?;
        }
    }

    writeln!(out, "</svg>")
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::PredictionRow;
    use crate::render::chart::layout;

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
    fn test_document_shape() {
        let svg = chart_svg(&layout(&rows(&[10.0, 30.0, 5.0]), Some(1)));
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(r#"width="700" height="220""#));
        assert_eq!(svg.matches("<rect").count(), 3);
        assert_eq!(svg.matches("<line").count(), 3);
    }

    #[test]
    fn test_peak_bar_uses_emphasis_color() {
        let svg = chart_svg(&layout(&rows(&[10.0, 30.0, 30.0, 5.0]), Some(1)));
        assert_eq!(svg.matches(PEAK_COLOR).count(), 1);
        assert_eq!(svg.matches(BAR_COLOR).count(), 3);
    }

    #[test]
    fn test_value_and_tick_labels_present() {
        let svg = chart_svg(&layout(&rows(&[1500.0, 700.0]), Some(0)));
        assert!(svg.contains(">1,500</text>"));
        assert!(svg.contains(">700</text>"));
        assert!(svg.contains(">750</text>"));
        assert!(svg.contains(">0</text>"));
    }

    #[test]
    fn test_axis_labels_follow_layout() {
        let chart = layout(&rows(&[1.0; 45]), Some(0));
        let svg = chart_svg(&chart);
        let axis_y = format!(r#"y="{}""#, 192.0 + 18.0);
        let labeled = svg.lines().filter(|l| l.contains(&axis_y)).count();
        assert_eq!(labeled, 15);
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b&c>"), "a&lt;b&amp;c&gt;");
    }
}
