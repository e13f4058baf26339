//! Plain-text clipboard grid: tab between columns, newline between rows.

use sheetgrid_core::{CellRange, GrowPolicy};

use crate::sheet::Sheet;

/// Split clipboard text into rows of fields. A trailing newline does not
/// start an extra row, and `\r\n` line endings are accepted.
pub fn parse_grid_text(text: &str) -> Vec<Vec<String>> {
    let text = text.strip_suffix('\n').unwrap_or(text);
    let text = text.strip_suffix('\r').unwrap_or(text);
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n')
        .map(|line| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            line.split('\t').map(str::to_string).collect()
        })
        .collect()
}

impl Sheet {
    /// Displayed values of `range` as clipboard text.
    pub fn copy_text(&self, range: &CellRange) -> String {
        let mut out = String::new();
        for row in range.start_row..=range.end_row {
            if row > range.start_row {
                out.push('\n');
            }
            for col in range.start_col..=range.end_col {
                if col > range.start_col {
                    out.push('\t');
                }
                out.push_str(&self.display(row, col));
            }
        }
        out
    }

    /// Write clipboard text as raw values starting at `anchor`.
    ///
    /// With [`GrowPolicy::Grow`] the bounds extend to fit; with
    /// [`GrowPolicy::Clamp`] anything past them is dropped. Returns the
    /// range written, or None if nothing was.
    pub fn paste_text(
        &mut self,
        anchor: (usize, usize),
        text: &str,
        policy: GrowPolicy,
    ) -> Option<CellRange> {
        let rows = parse_grid_text(text);
        let height = rows.len();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if height == 0 || width == 0 {
            return None;
        }

        let (row0, col0) = anchor;
        match policy {
            GrowPolicy::Grow => self.ensure_size(row0 + height, col0 + width),
            GrowPolicy::Clamp => {
                if row0 >= self.num_rows || col0 >= self.num_cols {
                    return None;
                }
            }
        }

        let mut last = anchor;
        for (dr, fields) in rows.iter().enumerate() {
            let row = row0 + dr;
            if row >= self.num_rows {
                break;
            }
            for (dc, value) in fields.iter().enumerate() {
                let col = col0 + dc;
                if col >= self.num_cols {
                    break;
                }
                self.set_value(row, col, value);
                last = (last.0.max(row), last.1.max(col));
            }
        }
        Some(CellRange::new(row0, col0, last.0, last.1))
    }
}
