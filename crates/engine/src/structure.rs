//! Structural edits: insert/delete rows and columns, hide/unhide, merge,
//! freeze panes.
//!
//! Insert and delete are built on [`CellStore::remap`] and apply the same
//! index mapping to every row- or column-keyed side table, so cells,
//! sizes, hidden sets, merges, filters and freeze counts never disagree
//! about which index is which.
//!
//! [`CellStore::remap`]: crate::store::CellStore::remap

use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

use sheetgrid_core::CellRange;

use crate::sheet::Sheet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Col,
}

/// Index mapping for inserting one line at `at`.
fn insert_map(at: usize) -> impl Fn(usize) -> Option<usize> {
    move |i| Some(if i >= at { i + 1 } else { i })
}

/// Index mapping for deleting the line at `pivot`.
fn delete_map(pivot: usize) -> impl Fn(usize) -> Option<usize> {
    move |i| {
        if i < pivot {
            Some(i)
        } else if i == pivot {
            None
        } else {
            Some(i - 1)
        }
    }
}

fn remap_set(set: &BTreeSet<usize>, map: &impl Fn(usize) -> Option<usize>) -> BTreeSet<usize> {
    set.iter().filter_map(|&i| map(i)).collect()
}

fn remap_keys<V: Clone>(
    table: &BTreeMap<usize, V>,
    map: &impl Fn(usize) -> Option<usize>,
) -> BTreeMap<usize, V> {
    table
        .iter()
        .filter_map(|(&i, v)| map(i).map(|j| (j, v.clone())))
        .collect()
}

fn span_after_insert(start: usize, end: usize, at: usize) -> (usize, usize) {
    if at <= start {
        (start + 1, end + 1)
    } else if at <= end {
        // Inserting inside a merge widens it
        (start, end + 1)
    } else {
        (start, end)
    }
}

fn span_after_delete(start: usize, end: usize, pivot: usize) -> Option<(usize, usize)> {
    if end < pivot {
        Some((start, end))
    } else if start > pivot {
        Some((start - 1, end - 1))
    } else if start == end || start == pivot {
        // Losing the origin line loses the merge's content with it
        None
    } else {
        Some((start, end - 1))
    }
}

impl Sheet {
    pub fn insert_row_above(&mut self, pivot: usize) {
        self.insert_line(Axis::Row, pivot);
    }

    pub fn insert_row_below(&mut self, pivot: usize) {
        self.insert_line(Axis::Row, pivot + 1);
    }

    pub fn insert_col_left(&mut self, pivot: usize) {
        self.insert_line(Axis::Col, pivot);
    }

    pub fn insert_col_right(&mut self, pivot: usize) {
        self.insert_line(Axis::Col, pivot + 1);
    }

    pub fn delete_row(&mut self, pivot: usize) {
        self.delete_line(Axis::Row, pivot);
    }

    pub fn delete_col(&mut self, pivot: usize) {
        self.delete_line(Axis::Col, pivot);
    }

    /// Shift every index `>= at` on `axis` by one and grow the bound.
    pub fn insert_line(&mut self, axis: Axis, at: usize) {
        let map = insert_map(at);
        self.remap_axis(axis, &map);
        self.merged_cells = self
            .merged_cells
            .iter()
            .map(|m| {
                let mut m = *m;
                match axis {
                    Axis::Row => (m.start_row, m.end_row) = span_after_insert(m.start_row, m.end_row, at),
                    Axis::Col => (m.start_col, m.end_col) = span_after_insert(m.start_col, m.end_col, at),
                }
                m
            })
            .collect();
        match axis {
            Axis::Row => {
                self.num_rows += 1;
                if at < self.freeze_row {
                    self.freeze_row += 1;
                }
            }
            Axis::Col => {
                self.num_cols += 1;
                if at < self.freeze_col {
                    self.freeze_col += 1;
                }
            }
        }
    }

    /// Drop the line at `pivot` and pull later ones back by one. The bound
    /// shrinks but never below 1.
    pub fn delete_line(&mut self, axis: Axis, pivot: usize) {
        let map = delete_map(pivot);
        self.remap_axis(axis, &map);
        self.merged_cells = self
            .merged_cells
            .iter()
            .filter_map(|m| {
                let mut m = *m;
                match axis {
                    Axis::Row => (m.start_row, m.end_row) = span_after_delete(m.start_row, m.end_row, pivot)?,
                    Axis::Col => (m.start_col, m.end_col) = span_after_delete(m.start_col, m.end_col, pivot)?,
                }
                (!m.is_single()).then_some(m)
            })
            .collect();
        match axis {
            Axis::Row => {
                self.num_rows = self.num_rows.saturating_sub(1).max(1);
                if pivot < self.freeze_row {
                    self.freeze_row -= 1;
                }
            }
            Axis::Col => {
                self.num_cols = self.num_cols.saturating_sub(1).max(1);
                if pivot < self.freeze_col {
                    self.freeze_col -= 1;
                }
            }
        }
    }

    fn remap_axis(&mut self, axis: Axis, map: &impl Fn(usize) -> Option<usize>) {
        match axis {
            Axis::Row => {
                self.cells = self.cells.remap(map, Some);
                self.row_heights = remap_keys(&self.row_heights, map);
                self.hidden_rows = remap_set(&self.hidden_rows, map);
            }
            Axis::Col => {
                self.cells = self.cells.remap(Some, map);
                self.col_widths = remap_keys(&self.col_widths, map);
                self.hidden_cols = remap_set(&self.hidden_cols, map);
                self.filter_values = remap_keys(&self.filter_values, map);
            }
        }
    }

    pub fn hide_rows(&mut self, rows: RangeInclusive<usize>) {
        self.hidden_rows.extend(rows);
    }

    pub fn unhide_rows(&mut self, rows: RangeInclusive<usize>) {
        for row in rows {
            self.hidden_rows.remove(&row);
        }
    }

    pub fn hide_cols(&mut self, cols: RangeInclusive<usize>) {
        self.hidden_cols.extend(cols);
    }

    pub fn unhide_cols(&mut self, cols: RangeInclusive<usize>) {
        for col in cols {
            self.hidden_cols.remove(&col);
        }
    }

    pub fn is_col_hidden(&self, col: usize) -> bool {
        self.hidden_cols.contains(&col)
    }

    /// Merge a range. Returns false (and changes nothing) for a single cell.
    ///
    /// Existing merges that touch the new range are dissolved and every
    /// covered cell except the origin loses its value.
    pub fn merge(&mut self, range: CellRange) -> bool {
        if range.is_single() {
            return false;
        }
        self.merged_cells.retain(|m| !m.intersects(&range));
        let origin = range.origin();
        for (row, col) in range.cells() {
            if (row, col) != origin {
                self.cells.set_value(row, col, "");
            }
        }
        self.merged_cells.push(range);
        true
    }

    /// Remove the merge covering `(row, col)`. Returns false if none does.
    pub fn unmerge(&mut self, row: usize, col: usize) -> bool {
        let before = self.merged_cells.len();
        self.merged_cells.retain(|m| !m.contains(row, col));
        self.merged_cells.len() != before
    }

    /// The merge covering `(row, col)`, if any.
    pub fn merge_at(&self, row: usize, col: usize) -> Option<&CellRange> {
        self.merged_cells.iter().find(|m| m.contains(row, col))
    }

    /// Leading rows kept in view while scrolling; 0 turns it off.
    pub fn set_freeze_rows(&mut self, count: usize) {
        self.freeze_row = count.min(self.num_rows);
    }

    pub fn set_freeze_cols(&mut self, count: usize) {
        self.freeze_col = count.min(self.num_cols);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> Sheet {
        let mut sheet = Sheet::with_size("S", 5, 5);
        for r in 0..5 {
            for c in 0..5 {
                sheet.set_value(r, c, &format!("{r}{c}"));
            }
        }
        sheet
    }

    #[test]
    fn test_insert_row_above_and_below() {
        let mut sheet = sample();
        sheet.insert_row_above(1);
        assert_eq!(sheet.num_rows, 6);
        assert_eq!(sheet.raw(0, 0), "00");
        assert_eq!(sheet.raw(1, 0), "");
        assert_eq!(sheet.raw(2, 0), "10");

        let mut sheet = sample();
        sheet.insert_row_below(1);
        assert_eq!(sheet.raw(1, 0), "10");
        assert_eq!(sheet.raw(2, 0), "");
        assert_eq!(sheet.raw(3, 0), "20");
    }

    #[test]
    fn test_insert_col_right() {
        let mut sheet = sample();
        sheet.insert_col_right(0);
        assert_eq!(sheet.num_cols, 6);
        assert_eq!(sheet.raw(0, 0), "00");
        assert_eq!(sheet.raw(0, 1), "");
        assert_eq!(sheet.raw(0, 2), "01");
    }

    #[test]
    fn test_delete_col_shifts_left() {
        let mut sheet = sample();
        sheet.delete_col(2);
        assert_eq!(sheet.num_cols, 4);
        assert_eq!(sheet.raw(0, 1), "01");
        assert_eq!(sheet.raw(0, 2), "03");
        assert_eq!(sheet.raw(0, 4), "");
    }

    #[test]
    fn test_delete_last_row_floors_at_one() {
        let mut sheet = Sheet::with_size("S", 1, 1);
        sheet.set_value(0, 0, "x");
        sheet.delete_row(0);
        assert_eq!(sheet.num_rows, 1);
        assert!(sheet.cells().is_empty());
    }

    #[test]
    fn test_formulas_are_not_rewritten() {
        let mut sheet = sample();
        sheet.set_value(4, 4, "=A1");
        sheet.insert_row_above(0);
        assert_eq!(sheet.raw(5, 4), "=A1");
    }

    #[test]
    fn test_side_tables_follow_rows() {
        let mut sheet = sample();
        sheet.hide_rows(3..=3);
        sheet.set_row_height(4, 40);
        sheet.set_freeze_rows(2);
        sheet.insert_row_above(1);
        assert!(sheet.hidden_rows.contains(&4));
        assert_eq!(sheet.row_height(5), Some(40));
        assert_eq!(sheet.freeze_row, 3);

        sheet.delete_row(4);
        assert!(sheet.hidden_rows.is_empty());
        assert_eq!(sheet.row_height(4), Some(40));
    }

    #[test]
    fn test_side_tables_follow_cols() {
        let mut sheet = sample();
        sheet.set_col_width(2, 150);
        sheet.filter_values.insert(3, ["33".to_string()].into_iter().collect());
        sheet.delete_col(0);
        assert_eq!(sheet.col_width(1), Some(150));
        assert!(sheet.filter_values.contains_key(&2));
    }

    #[test]
    fn test_merge_clears_covered_values() {
        let mut sheet = sample();
        assert!(sheet.merge(CellRange::new(0, 0, 1, 1)));
        assert_eq!(sheet.raw(0, 0), "00");
        assert_eq!(sheet.raw(0, 1), "");
        assert_eq!(sheet.raw(1, 0), "");
        assert_eq!(sheet.raw(1, 1), "");
        assert_eq!(sheet.raw(2, 2), "22");
    }

    #[test]
    fn test_merge_single_cell_is_noop() {
        let mut sheet = sample();
        assert!(!sheet.merge(CellRange::single(2, 2)));
        assert!(sheet.merged_cells.is_empty());
        assert_eq!(sheet.raw(2, 2), "22");
    }

    #[test]
    fn test_merge_replaces_overlapping() {
        let mut sheet = sample();
        sheet.merge(CellRange::new(0, 0, 1, 1));
        sheet.merge(CellRange::new(3, 3, 4, 4));
        sheet.merge(CellRange::new(1, 1, 2, 2));
        assert_eq!(
            sheet.merged_cells,
            vec![CellRange::new(3, 3, 4, 4), CellRange::new(1, 1, 2, 2)]
        );
    }

    #[test]
    fn test_unmerge() {
        let mut sheet = sample();
        sheet.merge(CellRange::new(0, 0, 2, 0));
        assert!(!sheet.unmerge(4, 4));
        assert_eq!(sheet.merge_at(1, 0), Some(&CellRange::new(0, 0, 2, 0)));
        assert!(sheet.unmerge(1, 0));
        assert!(sheet.merged_cells.is_empty());
        // Values are not restored
        assert_eq!(sheet.raw(1, 0), "");
    }

    #[test]
    fn test_merge_shrinks_and_vanishes_on_delete() {
        let mut sheet = sample();
        sheet.merge(CellRange::new(1, 0, 2, 0));
        sheet.delete_row(2);
        assert!(sheet.merged_cells.is_empty());

        sheet.merge(CellRange::new(0, 0, 2, 1));
        sheet.delete_row(1);
        assert_eq!(sheet.merged_cells, vec![CellRange::new(0, 0, 1, 1)]);
        sheet.insert_row_below(0);
        assert_eq!(sheet.merged_cells, vec![CellRange::new(0, 0, 2, 1)]);
    }

    #[test]
    fn test_deleting_merge_origin_line_drops_merge() {
        let mut sheet = sample();
        sheet.merge(CellRange::new(1, 1, 3, 2));
        sheet.delete_row(1);
        assert!(sheet.merged_cells.is_empty());

        sheet.merge(CellRange::new(0, 1, 1, 3));
        sheet.delete_col(1);
        assert!(sheet.merged_cells.is_empty());
    }

    #[test]
    fn test_freeze_clamped() {
        let mut sheet = Sheet::with_size("S", 5, 5);
        sheet.set_freeze_rows(10);
        assert_eq!(sheet.freeze_row, 5);
        sheet.set_freeze_cols(0);
        assert_eq!(sheet.freeze_col, 0);
    }

    proptest! {
        #[test]
        fn prop_merges_never_overlap(
            ranges in proptest::collection::vec((0usize..8, 0usize..8, 0usize..8, 0usize..8), 0..30),
        ) {
            let mut sheet = Sheet::with_size("S", 8, 8);
            for (r1, c1, r2, c2) in ranges {
                sheet.merge(CellRange::new(r1, c1, r2, c2));
            }
            let merges = &sheet.merged_cells;
            for (i, a) in merges.iter().enumerate() {
                prop_assert!(!a.is_single());
                for b in &merges[i + 1..] {
                    prop_assert!(!a.intersects(b));
                }
            }
        }

        #[test]
        fn prop_insert_then_delete_restores_sheet(
            cells in proptest::collection::vec((0usize..10, 0usize..10, "[a-z]{1,3}"), 0..30),
            pivot in 0usize..10,
            rows in any::<bool>(),
        ) {
            let mut sheet = Sheet::with_size("S", 10, 10);
            for (r, c, v) in &cells {
                sheet.set_value(*r, *c, v);
            }
            sheet.hide_rows(pivot..=pivot);
            let original = sheet.clone();
            let axis = if rows { Axis::Row } else { Axis::Col };
            sheet.insert_line(axis, pivot);
            sheet.delete_line(axis, pivot);
            prop_assert_eq!(sheet, original);
        }
    }
}
