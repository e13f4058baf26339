use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};
use sheetgrid_core::CellRange;

use crate::cell::{Alignment, Borders, CellData, CellFormat, TextStyle};
use crate::format::{display_literal, display_value};
use crate::formula::{evaluate_cell, CellLookup, Value};
use crate::store::CellStore;

pub const DEFAULT_ROWS: usize = 50;
pub const DEFAULT_COLS: usize = 26;

fn default_name() -> String {
    "Sheet1".to_string()
}

fn default_rows() -> usize {
    DEFAULT_ROWS
}

fn default_cols() -> usize {
    DEFAULT_COLS
}

/// Stored bounds of 0 load as 1; a sheet always has at least one cell.
fn at_least_one<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    Ok(usize::deserialize(deserializer)?.max(1))
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// One grid: sparse cells plus the row/column side tables that describe
/// how it is laid out. Serialized with camelCase keys; every field but
/// `name` may be omitted from a payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub(crate) cells: CellStore,
    /// Iteration bounds. They do not limit what the store can hold.
    #[serde(default = "default_rows", deserialize_with = "at_least_one")]
    pub num_rows: usize,
    #[serde(default = "default_cols", deserialize_with = "at_least_one")]
    pub num_cols: usize,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub col_widths: BTreeMap<usize, u32>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub row_heights: BTreeMap<usize, u32>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub hidden_rows: BTreeSet<usize>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub hidden_cols: BTreeSet<usize>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub freeze_row: usize,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub freeze_col: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merged_cells: Vec<CellRange>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub filter_enabled: bool,
    /// Column -> raw values allowed through the filter
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub filter_values: BTreeMap<usize, BTreeSet<String>>,
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new(default_name())
    }
}

impl CellLookup for Sheet {
    fn raw_value(&self, row: usize, col: usize) -> Cow<'_, str> {
        Cow::Borrowed(self.cells.raw(row, col))
    }
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_size(name, DEFAULT_ROWS, DEFAULT_COLS)
    }

    pub fn with_size(name: impl Into<String>, num_rows: usize, num_cols: usize) -> Self {
        Self {
            name: name.into(),
            cells: CellStore::new(),
            num_rows: num_rows.max(1),
            num_cols: num_cols.max(1),
            col_widths: BTreeMap::new(),
            row_heights: BTreeMap::new(),
            hidden_rows: BTreeSet::new(),
            hidden_cols: BTreeSet::new(),
            freeze_row: 0,
            freeze_col: 0,
            merged_cells: Vec::new(),
            filter_enabled: false,
            filter_values: BTreeMap::new(),
        }
    }

    pub fn cells(&self) -> &CellStore {
        &self.cells
    }

    /// Full bounds as a range, `A1` to the last row/column.
    pub fn bounds(&self) -> CellRange {
        CellRange::new(0, 0, self.num_rows.saturating_sub(1), self.num_cols.saturating_sub(1))
    }

    pub fn raw(&self, row: usize, col: usize) -> &str {
        self.cells.raw(row, col)
    }

    pub fn cell(&self, row: usize, col: usize) -> CellData {
        self.cells.get(row, col)
    }

    pub fn set_value(&mut self, row: usize, col: usize, value: &str) {
        self.cells.set_value(row, col, value);
    }

    pub fn set_cell(&mut self, row: usize, col: usize, data: CellData) {
        self.cells.set(row, col, data);
    }

    pub fn update_cell<F: FnOnce(&mut CellData)>(&mut self, row: usize, col: usize, f: F) {
        self.cells.update(row, col, f);
    }

    /// Evaluated value of a cell. Never mutates the sheet.
    pub fn evaluate(&self, row: usize, col: usize) -> Value {
        evaluate_cell(row, col, self)
    }

    /// What the grid shows for a cell: formulas evaluated, numbers rendered
    /// through the cell's format, other literals verbatim.
    pub fn display(&self, row: usize, col: usize) -> String {
        let Some(cell) = self.cells.get_ref(row, col) else {
            return String::new();
        };
        if cell.is_formula() {
            display_value(&self.evaluate(row, col), cell.format)
        } else {
            display_literal(&cell.value, cell.format)
        }
    }

    /// Grow bounds so `(rows, cols)` fit. Never shrinks.
    pub fn ensure_size(&mut self, rows: usize, cols: usize) {
        self.num_rows = self.num_rows.max(rows);
        self.num_cols = self.num_cols.max(cols);
    }

    /// Clear values in a range, keeping formatting.
    pub fn clear_range(&mut self, range: &CellRange) {
        for (row, col) in range.cells() {
            self.cells.set_value(row, col, "");
        }
    }

    pub fn col_width(&self, col: usize) -> Option<u32> {
        self.col_widths.get(&col).copied()
    }

    pub fn row_height(&self, row: usize) -> Option<u32> {
        self.row_heights.get(&row).copied()
    }

    pub fn set_col_width(&mut self, col: usize, width: u32) {
        self.col_widths.insert(col, width.max(1));
    }

    pub fn set_row_height(&mut self, row: usize, height: u32) {
        self.row_heights.insert(row, height.max(1));
    }

    // Formatting over a range

    fn format_range<F: Fn(&mut CellData)>(&mut self, range: &CellRange, f: F) {
        for (row, col) in range.cells() {
            self.cells.update(row, col, &f);
        }
    }

    /// Turn a text style on across the range, or off if every cell already has it.
    pub fn toggle_style(&mut self, range: &CellRange, style: TextStyle) {
        let all_on = range
            .cells()
            .all(|(r, c)| self.cells.get_ref(r, c).is_some_and(|cell| style.get(cell)));
        self.format_range(range, |cell| style.set(cell, !all_on));
    }

    pub fn set_format(&mut self, range: &CellRange, format: CellFormat) {
        self.format_range(range, |cell| cell.format = format);
    }

    pub fn set_alignment(&mut self, range: &CellRange, align: Alignment) {
        self.format_range(range, |cell| cell.align = align);
    }

    pub fn set_bg_color(&mut self, range: &CellRange, color: Option<&str>) {
        self.format_range(range, |cell| cell.bg_color = color.map(str::to_string));
    }

    pub fn set_text_color(&mut self, range: &CellRange, color: Option<&str>) {
        self.format_range(range, |cell| cell.text_color = color.map(str::to_string));
    }

    pub fn set_font_size(&mut self, range: &CellRange, size: Option<u32>) {
        self.format_range(range, |cell| cell.font_size = size);
    }

    pub fn set_borders(&mut self, range: &CellRange, borders: Borders) {
        self.format_range(range, |cell| cell.borders = borders);
    }

    /// Reset every formatting field, keeping values.
    pub fn clear_formatting(&mut self, range: &CellRange) {
        self.format_range(range, |cell| {
            *cell = CellData::with_value(std::mem::take(&mut cell.value));
        });
    }
}
