//! Committed operations: clipboard, structure, formatting, view ops,
//! sheet management and CSV.

use std::collections::BTreeSet;
use std::path::Path;

use sheetgrid_core::CellRange;
use sheetgrid_engine::{Alignment, Borders, CellFormat, RenameOutcome, Sheet, SortDirection, TextStyle};
use sheetgrid_io::{csv, IoError};

use crate::autosave::Clock;
use crate::clipboard::ClipboardProvider;
use crate::controller::SheetController;
use crate::persist::DocumentStore;

// Autofit measurement, in pixels
const AUTOFIT_CHAR_WIDTH: u32 = 8;
const AUTOFIT_PADDING: u32 = 16;
const AUTOFIT_MIN_WIDTH: u32 = 40;

impl<C, S, K> SheetController<C, S, K>
where
    C: ClipboardProvider,
    S: DocumentStore,
    K: Clock,
{
    /// Close any edit, run `f` on the active sheet with the selection
    /// range, and commit the result.
    fn apply<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Sheet, CellRange),
    {
        self.finish_edit();
        let range = self.selection.range();
        f(self.sheet_mut(), range);
        self.clamp_selection();
        self.commit();
    }

    // Clipboard

    /// Copy displayed values of the selection. Returns false if the
    /// clipboard refused the write.
    pub fn copy(&mut self) -> bool {
        self.finish_edit();
        let text = self.sheet().copy_text(&self.selection.range());
        match self.clipboard.write_text(&text) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("copy failed: {e}");
                false
            }
        }
    }

    /// Copy, then clear the selection. Nothing is cleared if the copy failed.
    pub fn cut(&mut self) {
        if self.copy() {
            self.clear_selection();
        }
    }

    /// Paste clipboard text at the active cell and select what was written.
    pub fn paste(&mut self) {
        self.finish_edit();
        let text = match self.clipboard.read_text() {
            Ok(text) => text,
            Err(e) => {
                log::warn!("paste failed: {e}");
                return;
            }
        };
        let anchor = self.selection.active_cell();
        let policy = self.settings.paste_grow_policy;
        if let Some(written) = self.sheet_mut().paste_text(anchor, &text, policy) {
            self.selection.select_cell(written.start_row, written.start_col);
            self.selection.extend_to(written.end_row, written.end_col);
            self.commit();
        }
    }

    /// Delete/Backspace: empty the values in the selection, keeping formatting.
    pub fn clear_selection(&mut self) {
        self.apply(|sheet, range| sheet.clear_range(&range));
    }

    // Structure

    pub fn insert_row_above(&mut self) {
        self.apply(|sheet, range| sheet.insert_row_above(range.start_row));
    }

    pub fn insert_row_below(&mut self) {
        self.apply(|sheet, range| sheet.insert_row_below(range.end_row));
    }

    pub fn insert_col_left(&mut self) {
        self.apply(|sheet, range| sheet.insert_col_left(range.start_col));
    }

    pub fn insert_col_right(&mut self) {
        self.apply(|sheet, range| sheet.insert_col_right(range.end_col));
    }

    pub fn delete_row(&mut self) {
        let (row, col) = self.selection.active_cell();
        self.apply(|sheet, _| sheet.delete_row(row));
        self.selection.select_cell(row, col);
        self.clamp_selection();
    }

    pub fn delete_col(&mut self) {
        let (row, col) = self.selection.active_cell();
        self.apply(|sheet, _| sheet.delete_col(col));
        self.selection.select_cell(row, col);
        self.clamp_selection();
    }

    pub fn hide_rows(&mut self) {
        self.apply(|sheet, range| sheet.hide_rows(range.start_row..=range.end_row));
    }

    pub fn unhide_rows(&mut self) {
        self.apply(|sheet, range| sheet.unhide_rows(range.start_row..=range.end_row));
    }

    pub fn hide_cols(&mut self) {
        self.apply(|sheet, range| sheet.hide_cols(range.start_col..=range.end_col));
    }

    pub fn unhide_cols(&mut self) {
        self.apply(|sheet, range| sheet.unhide_cols(range.start_col..=range.end_col));
    }

    /// Merge the selection. A single-cell selection is left alone.
    pub fn merge_selection(&mut self) {
        self.apply(|sheet, range| {
            sheet.merge(range);
        });
    }

    /// Unmerge the merged range covering the active cell, if any.
    pub fn unmerge_active(&mut self) {
        let (row, col) = self.selection.active_cell();
        self.apply(|sheet, _| {
            sheet.unmerge(row, col);
        });
    }

    pub fn freeze_rows(&mut self, count: usize) {
        self.apply(|sheet, _| sheet.set_freeze_rows(count));
    }

    pub fn freeze_cols(&mut self, count: usize) {
        self.apply(|sheet, _| sheet.set_freeze_cols(count));
    }

    /// Freeze the rows above and the columns left of the active cell.
    pub fn freeze_at_selection(&mut self) {
        let (row, col) = self.selection.active_cell();
        self.apply(|sheet, _| {
            sheet.set_freeze_rows(row);
            sheet.set_freeze_cols(col);
        });
    }

    // Formatting

    pub fn toggle_style(&mut self, style: TextStyle) {
        self.apply(|sheet, range| sheet.toggle_style(&range, style));
    }

    pub fn set_format(&mut self, format: CellFormat) {
        self.apply(|sheet, range| sheet.set_format(&range, format));
    }

    pub fn set_alignment(&mut self, align: Alignment) {
        self.apply(|sheet, range| sheet.set_alignment(&range, align));
    }

    pub fn set_bg_color(&mut self, color: Option<&str>) {
        self.apply(|sheet, range| sheet.set_bg_color(&range, color));
    }

    pub fn set_text_color(&mut self, color: Option<&str>) {
        self.apply(|sheet, range| sheet.set_text_color(&range, color));
    }

    pub fn set_font_size(&mut self, size: Option<u32>) {
        self.apply(|sheet, range| sheet.set_font_size(&range, size));
    }

    pub fn set_borders(&mut self, borders: Borders) {
        self.apply(|sheet, range| sheet.set_borders(&range, borders));
    }

    pub fn clear_formatting(&mut self) {
        self.apply(|sheet, range| sheet.clear_formatting(&range));
    }

    /// Size a column to its widest visible value.
    pub fn autofit_column(&mut self, col: usize) {
        self.apply(|sheet, _| {
            let width = sheet.autofit_width(col, AUTOFIT_CHAR_WIDTH, AUTOFIT_PADDING, AUTOFIT_MIN_WIDTH);
            sheet.set_col_width(col, width);
        });
    }

    // View ops

    pub fn sort(&mut self, col: usize, direction: SortDirection) {
        self.apply(|sheet, _| sheet.sort_by_column(col, direction));
    }

    pub fn set_filter(&mut self, col: usize, allowed: BTreeSet<String>) {
        self.apply(|sheet, _| sheet.set_filter(col, allowed));
    }

    pub fn clear_filter(&mut self, col: usize) {
        self.apply(|sheet, _| sheet.clear_filter(col));
    }

    pub fn clear_all_filters(&mut self) {
        self.apply(|sheet, _| sheet.clear_all_filters());
    }

    pub fn toggle_filter(&mut self) {
        self.apply(|sheet, _| {
            let enabled = !sheet.filter_enabled;
            sheet.set_filter_enabled(enabled);
        });
    }

    // Sheets

    /// Add a sheet of the configured default size and switch to it.
    pub fn add_sheet(&mut self) -> usize {
        self.finish_edit();
        let index = self
            .workbook
            .add_sheet(self.settings.default_rows, self.settings.default_cols);
        self.active_sheet = index;
        self.selection.select_cell(0, 0);
        self.commit();
        index
    }

    pub fn rename_sheet(&mut self, index: usize, name: &str) -> RenameOutcome {
        self.finish_edit();
        let outcome = self.workbook.rename_sheet(index, name);
        match outcome {
            RenameOutcome::Rejected => return outcome,
            RenameOutcome::RenamedDuplicate => {
                log::warn!("another sheet is already named '{}'", name.trim());
            }
            RenameOutcome::Renamed => {}
        }
        self.commit();
        outcome
    }

    /// Delete a sheet. The last one can't be deleted.
    pub fn delete_sheet(&mut self, index: usize) -> bool {
        self.finish_edit();
        if !self.workbook.delete_sheet(index) {
            return false;
        }
        if self.active_sheet > index || self.active_sheet >= self.workbook.sheet_count() {
            self.active_sheet = self.active_sheet.saturating_sub(1);
        }
        self.clamp_selection();
        self.commit();
        true
    }

    /// Switch the active sheet. Not a data change, so nothing is recorded.
    pub fn switch_sheet(&mut self, index: usize) -> bool {
        if index >= self.workbook.sheet_count() {
            return false;
        }
        self.finish_edit();
        self.active_sheet = index;
        self.selection.select_cell(0, 0);
        true
    }

    // CSV

    pub fn export_csv(&self) -> Result<String, IoError> {
        csv::export_string(self.sheet())
    }

    /// File name for a CSV download, after the document title.
    pub fn csv_file_name(&self) -> String {
        csv::export_file_name(self.title())
    }

    pub fn export_csv_to(&self, path: &Path) -> Result<(), IoError> {
        csv::export(self.sheet(), path)
    }

    /// Import CSV text into the active sheet from A1 and select it.
    pub fn import_csv(&mut self, content: &str) -> Result<(), IoError> {
        self.finish_edit();
        let imported = csv::import_into(self.sheet_mut(), content)?;
        if let Some(range) = imported {
            self.selection.select_cell(range.start_row, range.start_col);
            self.selection.extend_to(range.end_row, range.end_col);
            self.commit();
        }
        Ok(())
    }

    pub fn import_csv_file(&mut self, path: &Path) -> Result<(), IoError> {
        let bytes = std::fs::read(path)?;
        self.import_csv(&csv::decode_bytes(bytes))
    }
}
