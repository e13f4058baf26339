//! Reference translation for fill and copy.
//!
//! Shifts every relative cell reference in a formula by a row/column delta.
//! `$`-anchored parts stay put, text inside string literals is left alone,
//! and a reference that would move before row 1 or column A is kept as it
//! was rather than turned into an error.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use sheetgrid_core::{col_to_letters, letters_to_col};

fn ref_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\$?)([A-Za-z]{1,3})(\$?)([0-9]+)").expect("valid cell reference pattern")
    })
}

/// Translate the references in `formula` by `(delta_row, delta_col)`.
/// Non-formulas are returned unchanged.
pub fn translate_formula(formula: &str, delta_row: isize, delta_col: isize) -> String {
    if !formula.starts_with('=') || (delta_row == 0 && delta_col == 0) {
        return formula.to_string();
    }

    let mut out = String::with_capacity(formula.len() + 4);
    let mut rest = formula;
    // Alternate between code segments and quoted string literals
    loop {
        match rest.find('"') {
            None => {
                out.push_str(&shift_segment(rest, delta_row, delta_col));
                break;
            }
            Some(open) => {
                out.push_str(&shift_segment(&rest[..open], delta_row, delta_col));
                let after = &rest[open + 1..];
                let close = closing_quote(after);
                match close {
                    Some(end) => {
                        out.push_str(&rest[open..open + 1 + end + 1]);
                        rest = &after[end + 1..];
                    }
                    None => {
                        // Unterminated string: copy the tail verbatim
                        out.push_str(&rest[open..]);
                        break;
                    }
                }
            }
        }
    }
    out
}

/// Index of the quote that ends a string literal, treating `""` as an escape.
fn closing_quote(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'"' {
            if bytes.get(i + 1) == Some(&b'"') {
                i += 2;
                continue;
            }
            return Some(i);
        }
        i += 1;
    }
    None
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'.' || b == b'$'
}

fn shift_segment(segment: &str, delta_row: isize, delta_col: isize) -> String {
    let bytes = segment.as_bytes();
    let mut out = String::with_capacity(segment.len());
    let mut last = 0;

    for caps in ref_pattern().captures_iter(segment) {
        let Some(m) = caps.get(0) else { continue };
        let preceded = m.start() > 0 && is_word_byte(bytes[m.start() - 1]);
        let followed = bytes
            .get(m.end())
            .is_some_and(|&b| is_word_byte(b) || b == b'(');
        if preceded || followed {
            continue;
        }
        out.push_str(&segment[last..m.start()]);
        out.push_str(&shift_ref(&caps, delta_row, delta_col).unwrap_or_else(|| m.as_str().to_string()));
        last = m.end();
    }
    out.push_str(&segment[last..]);
    out
}

/// Shifted reference text, or None when the result would be out of range.
fn shift_ref(caps: &Captures<'_>, delta_row: isize, delta_col: isize) -> Option<String> {
    let col_abs = &caps[1] == "$";
    let row_abs = &caps[3] == "$";
    let col = letters_to_col(&caps[2])?;
    let row: usize = caps[4].parse().ok()?;
    if row == 0 {
        return None;
    }

    let new_col = if col_abs { col } else { col.checked_add_signed(delta_col)? };
    let new_row = if row_abs { row } else { row.checked_add_signed(delta_row)? };
    if new_row == 0 {
        return None;
    }

    Some(format!(
        "{}{}{}{}",
        if col_abs { "$" } else { "" },
        col_to_letters(new_col),
        if row_abs { "$" } else { "" },
        new_row
    ))
}
