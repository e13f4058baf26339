//! Column filters and row visibility.
//!
//! A row is not shown when it is explicitly hidden *or* when filtering is
//! enabled and its raw value in some filtered column is outside that
//! column's allowed set. The two mechanisms never touch each other's state.

use std::collections::BTreeSet;

use crate::sheet::Sheet;

impl Sheet {
    /// True if the active filter rejects this row.
    pub fn is_row_filtered(&self, row: usize) -> bool {
        self.filter_enabled
            && self
                .filter_values
                .iter()
                .any(|(&col, allowed)| !allowed.contains(self.raw(row, col)))
    }

    /// Hidden explicitly or by the filter.
    pub fn is_row_hidden(&self, row: usize) -> bool {
        self.hidden_rows.contains(&row) || self.is_row_filtered(row)
    }

    /// Every row in bounds that is not shown.
    pub fn rows_not_shown(&self) -> BTreeSet<usize> {
        let mut hidden: BTreeSet<usize> = self
            .hidden_rows
            .iter()
            .copied()
            .filter(|&r| r < self.num_rows)
            .collect();
        if self.filter_enabled && !self.filter_values.is_empty() {
            hidden.extend((0..self.num_rows).filter(|&r| self.is_row_filtered(r)));
        }
        hidden
    }

    pub fn visible_rows(&self) -> Vec<usize> {
        (0..self.num_rows).filter(|&r| !self.is_row_hidden(r)).collect()
    }

    /// Distinct raw values in a column, for building a filter list.
    /// Explicitly hidden rows are skipped; blanks appear as `""`.
    pub fn distinct_values(&self, col: usize) -> Vec<String> {
        let set: BTreeSet<&str> = (0..self.num_rows)
            .filter(|r| !self.hidden_rows.contains(r))
            .map(|r| self.raw(r, col))
            .collect();
        set.into_iter().map(str::to_string).collect()
    }

    /// Only rows whose raw value in `col` is in `allowed` pass. Enables filtering.
    pub fn set_filter(&mut self, col: usize, allowed: BTreeSet<String>) {
        self.filter_values.insert(col, allowed);
        self.filter_enabled = true;
    }

    pub fn clear_filter(&mut self, col: usize) {
        self.filter_values.remove(&col);
    }

    pub fn clear_all_filters(&mut self) {
        self.filter_values.clear();
    }

    /// Turn filtering on or off without forgetting the per-column sets.
    pub fn set_filter_enabled(&mut self, enabled: bool) {
        self.filter_enabled = enabled;
    }

    /// Width that fits the longest displayed value among shown rows.
    pub fn autofit_width(&self, col: usize, char_width: u32, padding: u32, min_width: u32) -> u32 {
        let longest = (0..self.num_rows)
            .filter(|&r| !self.is_row_hidden(r))
            .map(|r| self.display(r, col).chars().count())
            .max()
            .unwrap_or(0);
        (longest as u32 * char_width + padding).max(min_width)
    }
}
