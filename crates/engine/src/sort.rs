//! Whole-row sort keyed by one column.
//!
//! Every row in `0..num_rows` moves as a unit; cells below the bounds are
//! left alone. Row heights and hidden rows are positional and stay put.

use std::cmp::Ordering;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::formula::Value;
use crate::sheet::Sheet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Normalized comparison value. This is a deliberate ordering rather than
/// a plain string compare: numbers sort before text, and blanks and errors
/// always sink to the bottom regardless of direction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue {
    Number(OrderedFloat<f64>),
    /// Lowercased for case-insensitive ordering
    Text(String),
    Blank,
}

impl SortValue {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => SortValue::Number(OrderedFloat(*n)),
            Value::Text(s) => SortValue::Text(s.to_lowercase()),
            Value::Empty | Value::Error(_) => SortValue::Blank,
        }
    }
}

/// Compare two keys for the given direction. Ties are left to the caller's
/// stable sort.
fn compare(a: &SortValue, b: &SortValue, direction: SortDirection) -> Ordering {
    match (a, b) {
        (SortValue::Blank, SortValue::Blank) => Ordering::Equal,
        (SortValue::Blank, _) => Ordering::Greater,
        (_, SortValue::Blank) => Ordering::Less,
        _ => match direction {
            SortDirection::Ascending => a.cmp(b),
            SortDirection::Descending => b.cmp(a),
        },
    }
}

/// New row order for sorting by `col`: `order[new_row] = old_row`.
pub fn sort_permutation(sheet: &Sheet, col: usize, direction: SortDirection) -> Vec<usize> {
    let mut keyed: Vec<(SortValue, usize)> = (0..sheet.num_rows)
        .map(|row| (SortValue::from_value(&sheet.evaluate(row, col)), row))
        .collect();
    // Vec::sort_by is stable: equal keys keep their current relative order
    keyed.sort_by(|a, b| compare(&a.0, &b.0, direction));
    keyed.into_iter().map(|(_, row)| row).collect()
}

impl Sheet {
    /// Reorder whole rows by the values in `col`.
    pub fn sort_by_column(&mut self, col: usize, direction: SortDirection) {
        let order = sort_permutation(self, col, direction);
        let mut new_index = vec![0usize; order.len()];
        for (new_row, &old_row) in order.iter().enumerate() {
            new_index[old_row] = new_row;
        }
        self.cells = self.cells.remap(
            |row| Some(new_index.get(row).copied().unwrap_or(row)),
            Some,
        );
    }
}
