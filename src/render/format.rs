// src/render/format.rs

/// Format a displayed magnitude.
///
/// Values of 1000 and above are rounded to whole numbers and grouped with
/// `,`; smaller values keep two decimals unless they are integral. Ties
/// round away from zero.
pub fn format_magnitude(v: f64) -> String {
    if v >= 1000.0 {
        group_thousands(v)
    } else if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        fixed(v, 2)
    }
}

/// `v` with exactly `decimals` places, rounding ties away from zero
/// (`{:.N}` alone rounds them to even).
pub fn fixed(v: f64, decimals: u32) -> String {
    let scale = 10_f64.powi(decimals as i32);
    format!("{:.*}", decimals as usize, (v * scale).round() / scale)
}

/// Only called with `v >= 1000`.
fn group_thousands(v: f64) -> String {
    let digits = format!("{:.0}", v.round());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Round half away from zero to two decimals, as the axis labels do.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
