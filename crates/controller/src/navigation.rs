//! Selection movement and pointer gestures.

use sheetgrid_engine::Axis;

use crate::autosave::Clock;
use crate::clipboard::ClipboardProvider;
use crate::controller::SheetController;
use crate::gesture::Gesture;
use crate::persist::DocumentStore;

impl<C, S, K> SheetController<C, S, K>
where
    C: ClipboardProvider,
    S: DocumentStore,
    K: Clock,
{
    /// Step from (row, col) by (dr, dc), skipping hidden and filtered rows
    /// and hidden columns. Stays put at the sheet edge.
    fn step_visible(&self, from: (usize, usize), dr: isize, dc: isize) -> (usize, usize) {
        let sheet = self.sheet();
        let (mut row, mut col) = (from.0 as isize, from.1 as isize);
        loop {
            row += dr;
            col += dc;
            if row < 0 || col < 0 || row as usize >= sheet.num_rows || col as usize >= sheet.num_cols {
                return from;
            }
            if dr != 0 && sheet.is_row_hidden(row as usize) {
                continue;
            }
            if dc != 0 && sheet.is_col_hidden(col as usize) {
                continue;
            }
            return (row as usize, col as usize);
        }
    }

    /// Move the active cell, collapsing any range.
    pub fn move_selection(&mut self, dr: isize, dc: isize) {
        let (row, col) = self.step_visible(self.selection.active_cell(), dr, dc);
        self.selection.select_cell(row, col);
    }

    /// Move the cursor end of the selection, keeping the anchor.
    pub fn extend_selection(&mut self, dr: isize, dc: isize) {
        let (row, col) = self.step_visible(self.selection.cursor(), dr, dc);
        self.selection.extend_to(row, col);
    }

    pub fn select_cell(&mut self, row: usize, col: usize) {
        self.finish_edit();
        let sheet = self.sheet();
        let row = row.min(sheet.num_rows.saturating_sub(1));
        let col = col.min(sheet.num_cols.saturating_sub(1));
        self.selection.select_cell(row, col);
    }

    pub fn select_all(&mut self) {
        let (rows, cols) = (self.sheet().num_rows, self.sheet().num_cols);
        self.selection.select_all(rows, cols);
    }

    // Pointer gestures

    /// Mouse-down on a cell arms a range selection (Shift extends the
    /// current one instead of starting over).
    pub fn mouse_down(&mut self, row: usize, col: usize, shift: bool) {
        self.finish_edit();
        let sheet = self.sheet();
        let (row, col) = (
            row.min(sheet.num_rows.saturating_sub(1)),
            col.min(sheet.num_cols.saturating_sub(1)),
        );
        if shift {
            self.selection.extend_to(row, col);
        } else {
            self.selection.select_cell(row, col);
        }
        self.gesture = Gesture::SelectingRange;
        log::debug!("gesture: selecting from {:?}", self.selection.anchor());
    }

    /// Mouse-down on the fill handle of the active cell.
    pub fn fill_handle_down(&mut self) {
        self.finish_edit();
        let origin = self.selection.active_cell();
        self.selection.select_cell(origin.0, origin.1);
        self.gesture = Gesture::AutoFilling {
            origin,
            target: origin,
        };
        log::debug!("gesture: autofill armed at {:?}", origin);
    }

    /// Mouse-down on a row or column border.
    pub fn resize_handle_down(&mut self, axis: Axis, index: usize) {
        self.finish_edit();
        self.gesture = Gesture::Resizing { axis, index };
        log::debug!("gesture: resizing {:?} {}", axis, index);
    }

    /// Pointer entered a cell while a gesture may be active.
    pub fn mouse_enter(&mut self, row: usize, col: usize) {
        let sheet = self.sheet();
        let (row, col) = (
            row.min(sheet.num_rows.saturating_sub(1)),
            col.min(sheet.num_cols.saturating_sub(1)),
        );
        if self.gesture.track(row, col) && self.gesture == Gesture::SelectingRange {
            self.selection.extend_to(row, col);
        }
    }

    /// Pointer moved while dragging a border. Silent: folded into the next
    /// commit.
    pub fn resize_drag(&mut self, size: u32) {
        let Gesture::Resizing { axis, index } = self.gesture else {
            return;
        };
        let size = size.max(1);
        match axis {
            Axis::Col => self.sheet_mut().set_col_width(index, size),
            Axis::Row => self.sheet_mut().set_row_height(index, size),
        }
        self.touch();
    }

    /// Window-level mouse-up. Ends whatever gesture is armed; an autofill
    /// runs with the last target seen.
    pub fn mouse_up(&mut self) {
        match std::mem::take(&mut self.gesture) {
            Gesture::AutoFilling { origin, target } => {
                log::debug!("gesture: autofill {:?} -> {:?}", origin, target);
                if self.sheet_mut().autofill(origin, target) {
                    self.selection.select_cell(origin.0, origin.1);
                    self.selection.extend_to(target.0, target.1);
                    self.commit();
                }
            }
            Gesture::SelectingRange | Gesture::Resizing { .. } => {
                log::debug!("gesture: released");
            }
            Gesture::Idle => {}
        }
    }
}
