use crate::range::CellRange;

/// The selection model: an anchor cell plus a cursor cell spanning a
/// rectangular range. A single-cell selection has anchor == cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    anchor: (usize, usize),
    cursor: (usize, usize),
}

impl Selection {
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            anchor: (row, col),
            cursor: (row, col),
        }
    }

    /// The active cell: where editing and formula-bar mirroring happen.
    pub fn active_cell(&self) -> (usize, usize) {
        self.anchor
    }

    pub fn anchor(&self) -> (usize, usize) {
        self.anchor
    }

    /// The moving end of the selection (extended by Shift+Arrow or drag).
    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn range(&self) -> CellRange {
        CellRange::new(self.anchor.0, self.anchor.1, self.cursor.0, self.cursor.1)
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.range().contains(row, col)
    }

    pub fn is_single_cell(&self) -> bool {
        self.anchor == self.cursor
    }

    /// Set selection to a single cell (click).
    pub fn select_cell(&mut self, row: usize, col: usize) {
        self.anchor = (row, col);
        self.cursor = (row, col);
    }

    /// Extend from the anchor to the given cell (shift+click/arrow, drag).
    pub fn extend_to(&mut self, row: usize, col: usize) {
        self.cursor = (row, col);
    }

    /// Select the whole `rows x cols` grid, keeping A1 active.
    pub fn select_all(&mut self, rows: usize, cols: usize) {
        self.anchor = (0, 0);
        self.cursor = (rows.saturating_sub(1), cols.saturating_sub(1));
    }

    /// Clamp both ends into a `rows x cols` grid (after a delete shrinks it).
    pub fn clamp_to(&mut self, rows: usize, cols: usize) {
        let max_row = rows.saturating_sub(1);
        let max_col = cols.saturating_sub(1);
        self.anchor = (self.anchor.0.min(max_row), self.anchor.1.min(max_col));
        self.cursor = (self.cursor.0.min(max_row), self.cursor.1.min(max_col));
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
