//! Display formatting shared by the dashboard, the PDF report and the CLI.
//!
//! All rounding happens here; the computed figures themselves are never
//! rounded.

/// Whole-unit amount with thousands separators: `₹1,234,567`, `₹-2,500`.
#[must_use]
pub fn money(value: f64, symbol: &str) -> String {
    format!("{symbol}{}", grouped(value, 0))
}

/// Number with thousands separators and `decimals` fraction digits.
#[must_use]
pub fn grouped(value: f64, decimals: usize) -> String {
    let rendered = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rendered.as_str(), None),
    };

    let mut out = String::with_capacity(rendered.len() + rendered.len() / 3 + 1);
    let is_zero = rendered.bytes().all(|b| b == b'0' || b == b'.');
    if value.is_sign_negative() && !is_zero {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Percentage with a fixed number of decimals: `12.35%`.
#[must_use]
pub fn pct(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}%")
}

/// First `max_chars` characters of `s`, cut without an ellipsis.
#[must_use]
pub fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// Escape text for inclusion in HTML element content or attribute values.
#[must_use]
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
