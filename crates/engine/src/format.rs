// Display formatting for cell values

use chrono::{Duration, NaiveDate};

use crate::cell::CellFormat;
use crate::formula::Value;

/// Excel-compatible serial date epoch (serial 1 = 1899-12-31, serial 0 = 1899-12-30).
fn date_epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)
}

/// Shortest sensible rendering of a number: integers without a decimal
/// point, other values rounded to 10 places with trailing zeros trimmed.
pub fn format_general(n: f64) -> String {
    if n.is_nan() {
        return "#NUM!".to_string();
    }
    if n.is_infinite() {
        return "#DIV/0!".to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e15 {
        return format!("{}", n as i64);
    }
    let s = format!("{:.10}", n);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Insert thousands separators into the integer part of a decimal string.
fn group_thousands(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*b as char);
    }
    out
}

fn fixed_grouped(n: f64, decimals: usize) -> String {
    let s = format!("{:.*}", decimals, n.abs());
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s.as_str(), None),
    };
    let mut out = group_thousands(int_part);
    if let Some(f) = frac_part {
        out.push('.');
        out.push_str(f);
    }
    out
}

/// Render a number according to a cell format.
pub fn format_number(n: f64, format: CellFormat) -> String {
    if !n.is_finite() {
        return format_general(n);
    }
    match format {
        CellFormat::Plain => format_general(n),
        CellFormat::Number => {
            let body = fixed_grouped(n, 2);
            if n < 0.0 { format!("-{body}") } else { body }
        }
        CellFormat::Currency => {
            let body = fixed_grouped(n, 2);
            if n < 0.0 { format!("-${body}") } else { format!("${body}") }
        }
        CellFormat::Percent => format!("{}%", format_general((n * 100.0 * 1e10).round() / 1e10)),
        CellFormat::Date => format_serial_date(n).unwrap_or_else(|| format_general(n)),
    }
}

/// Serial day number to `YYYY-MM-DD`; fractional days are truncated.
pub fn format_serial_date(serial: f64) -> Option<String> {
    if !serial.is_finite() || serial.abs() > 2_958_465.0 {
        return None;
    }
    let date = date_epoch()?.checked_add_signed(Duration::days(serial.floor() as i64))?;
    Some(date.format("%Y-%m-%d").to_string())
}

/// Parse a literal as a number the way the grid does: trimmed, finite only.
pub fn parse_number(raw: &str) -> Option<f64> {
    let t = raw.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Display a literal (non-formula) raw value. Plain-formatted and non-numeric
/// literals are shown verbatim.
pub fn display_literal(raw: &str, format: CellFormat) -> String {
    if format == CellFormat::Plain {
        return raw.to_string();
    }
    match parse_number(raw) {
        Some(n) => format_number(n, format),
        None => raw.to_string(),
    }
}

/// Display an evaluated formula result.
pub fn display_value(value: &Value, format: CellFormat) -> String {
    match value {
        Value::Empty => String::new(),
        Value::Number(n) => format_number(*n, format),
        Value::Text(s) => s.clone(),
        Value::Error(e) => e.to_string(),
    }
}
