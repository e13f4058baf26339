use serde::{Deserialize, Serialize};

/// A rectangular range of cells, inclusive on both ends.
///
/// Serialized with camelCase keys (`startRow`, `startCol`, `endRow`, `endCol`)
/// because merged ranges are stored in the document payload in this shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRange {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl CellRange {
    /// Create a new range, automatically normalizing so start <= end.
    pub fn new(r1: usize, c1: usize, r2: usize, c2: usize) -> Self {
        Self {
            start_row: r1.min(r2),
            start_col: c1.min(c2),
            end_row: r1.max(r2),
            end_col: c1.max(c2),
        }
    }

    /// Create a single-cell range.
    pub fn single(row: usize, col: usize) -> Self {
        Self::new(row, col, row, col)
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.start_row && row <= self.end_row && col >= self.start_col && col <= self.end_col
    }

    /// True when the two rectangles share at least one cell.
    pub fn intersects(&self, other: &CellRange) -> bool {
        self.start_row <= other.end_row
            && other.start_row <= self.end_row
            && self.start_col <= other.end_col
            && other.start_col <= self.end_col
    }

    pub fn rows(&self) -> usize {
        self.end_row - self.start_row + 1
    }

    pub fn cols(&self) -> usize {
        self.end_col - self.start_col + 1
    }

    /// Number of cells in this range.
    pub fn cell_count(&self) -> usize {
        self.rows() * self.cols()
    }

    pub fn is_single(&self) -> bool {
        self.start_row == self.end_row && self.start_col == self.end_col
    }

    /// Top-left cell.
    pub fn origin(&self) -> (usize, usize) {
        (self.start_row, self.start_col)
    }

    /// Iterate over all cells in this range (row-major order).
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let (start_row, end_row) = (self.start_row, self.end_row);
        let (start_col, end_col) = (self.start_col, self.end_col);
        (start_row..=end_row).flat_map(move |r| (start_col..=end_col).map(move |c| (r, c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_normalizes() {
        let r = CellRange::new(5, 5, 1, 1);
        assert_eq!(r.origin(), (1, 1));
        assert_eq!((r.end_row, r.end_col), (5, 5));
        assert_eq!(r.cell_count(), 25);
    }

    #[test]
    fn test_intersects() {
        let a = CellRange::new(0, 0, 2, 2);
        assert!(a.intersects(&CellRange::new(2, 2, 4, 4)));
        assert!(!a.intersects(&CellRange::new(3, 0, 4, 4)));
        assert!(!a.intersects(&CellRange::new(0, 3, 0, 3)));
    }

    #[test]
    fn test_cells_row_major() {
        let r = CellRange::new(1, 1, 2, 2);
        let cells: Vec<_> = r.cells().collect();
        assert_eq!(cells, vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
    }

    #[test]
    fn test_payload_shape() {
        let json = serde_json::to_string(&CellRange::new(0, 1, 2, 3)).unwrap();
        assert_eq!(json, r#"{"startRow":0,"startCol":1,"endRow":2,"endCol":3}"#);
    }
}
