//! A1-style addressing: column letters, cell names, and range strings.
//!
//! Rows and columns are 0-based internally; `B7` is `(6, 1)`.

use std::fmt;

use crate::range::CellRange;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeParseError {
    /// Input was empty after trimming.
    Empty,
    /// Not of the form letters followed by digits.
    BadCell(String),
    /// Row number 0 is not addressable.
    ZeroRow(String),
}

impl fmt::Display for RangeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty range"),
            Self::BadCell(s) => write!(f, "invalid cell reference '{s}'"),
            Self::ZeroRow(s) => write!(f, "row 0 is not valid in '{s}'"),
        }
    }
}

impl std::error::Error for RangeParseError {}

/// 0 -> "A", 25 -> "Z", 26 -> "AA"
pub fn col_to_letters(col: usize) -> String {
    let mut s = String::new();
    let mut n = col;
    loop {
        s.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    s
}

/// "A" -> 0, "AA" -> 26. Case-insensitive; None for empty or non-letters.
pub fn letters_to_col(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    let mut acc: usize = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let v = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        acc = acc.checked_mul(26)?.checked_add(v)?;
    }
    Some(acc - 1)
}

pub fn cell_name(row: usize, col: usize) -> String {
    format!("{}{}", col_to_letters(col), row + 1)
}

/// Parse `B7` (optionally `$B$7`) into `(row, col)`.
pub fn parse_cell_ref(input: &str) -> Result<(usize, usize), RangeParseError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(RangeParseError::Empty);
    }
    let cleaned: String = s.chars().filter(|c| *c != '$').collect();
    let split = cleaned
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| RangeParseError::BadCell(s.to_string()))?;
    let (letters, digits) = cleaned.split_at(split);
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(RangeParseError::BadCell(s.to_string()));
    }
    let col = letters_to_col(letters).ok_or_else(|| RangeParseError::BadCell(s.to_string()))?;
    let row: usize = digits
        .parse()
        .map_err(|_| RangeParseError::BadCell(s.to_string()))?;
    if row == 0 {
        return Err(RangeParseError::ZeroRow(s.to_string()));
    }
    Ok((row - 1, col))
}

/// Parse `A1` or `A1:C3` into a normalized range.
pub fn parse_range(input: &str) -> Result<CellRange, RangeParseError> {
    let s = input.trim();
    match s.split_once(':') {
        Some((a, b)) => {
            let (r1, c1) = parse_cell_ref(a)?;
            let (r2, c2) = parse_cell_ref(b)?;
            Ok(CellRange::new(r1, c1, r2, c2))
        }
        None => {
            let (r, c) = parse_cell_ref(s)?;
            Ok(CellRange::single(r, c))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_col_letters() {
        assert_eq!(col_to_letters(0), "A");
        assert_eq!(col_to_letters(25), "Z");
        assert_eq!(col_to_letters(26), "AA");
        assert_eq!(col_to_letters(701), "ZZ");
        assert_eq!(col_to_letters(702), "AAA");
        for col in [0, 1, 25, 26, 51, 52, 701, 702, 16383] {
            assert_eq!(letters_to_col(&col_to_letters(col)), Some(col));
        }
    }

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!(parse_cell_ref("B7"), Ok((6, 1)));
        assert_eq!(parse_cell_ref("$c$12"), Ok((11, 2)));
        assert_eq!(parse_cell_ref("A0"), Err(RangeParseError::ZeroRow("A0".into())));
        assert!(matches!(parse_cell_ref("7B"), Err(RangeParseError::BadCell(_))));
        assert!(matches!(parse_cell_ref("B"), Err(RangeParseError::BadCell(_))));
        assert_eq!(parse_cell_ref("  "), Err(RangeParseError::Empty));
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("C3:A1"), Ok(CellRange::new(0, 0, 2, 2)));
        assert_eq!(parse_range("D4"), Ok(CellRange::single(3, 3)));
        assert!(parse_range("A1:").is_err());
    }
}
