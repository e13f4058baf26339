//! Edit mode and keyboard dispatch.

use sheetgrid_engine::TextStyle;

use crate::autosave::Clock;
use crate::clipboard::ClipboardProvider;
use crate::controller::SheetController;
use crate::keys::{Key, KeyEvent, KeyOutcome};
use crate::mode::{EditState, Mode};
use crate::persist::DocumentStore;

impl<C, S, K> SheetController<C, S, K>
where
    C: ClipboardProvider,
    S: DocumentStore,
    K: Clock,
{
    /// Start editing the active cell (its merge origin if merged). With
    /// `seed`, the buffer starts as that text instead of the current value.
    pub fn start_edit(&mut self, seed: Option<&str>) {
        if self.mode.is_editing() {
            return;
        }
        let (mut row, mut col) = self.selection.active_cell();
        if let Some(merge) = self.sheet().merge_at(row, col) {
            (row, col) = merge.origin();
        }
        let original = self.sheet().raw(row, col).to_string();
        let buffer = seed.map(str::to_string).unwrap_or_else(|| original.clone());
        let seeded = buffer != original;
        self.mode = Mode::Editing(EditState {
            sheet: self.active_sheet,
            row,
            col,
            original,
            buffer,
        });
        if seeded {
            self.write_edit_buffer();
        }
    }

    /// Replace the whole edit buffer (formula bar input). Starts an edit
    /// of the active cell if none is in progress.
    pub fn set_edit_text(&mut self, text: &str) {
        self.start_edit(None);
        if let Some(edit) = self.mode.edit_mut() {
            edit.buffer = text.to_string();
        }
        self.write_edit_buffer();
    }

    pub fn type_char(&mut self, c: char) {
        self.start_edit(Some(""));
        if let Some(edit) = self.mode.edit_mut() {
            edit.buffer.push(c);
        }
        self.write_edit_buffer();
    }

    pub fn backspace(&mut self) {
        if let Some(edit) = self.mode.edit_mut() {
            edit.buffer.pop();
            self.write_edit_buffer();
        }
    }

    /// Typing is live: the buffer goes straight into the cell without a
    /// history entry.
    fn write_edit_buffer(&mut self) {
        let Some(edit) = self.mode.edit() else {
            return;
        };
        let (sheet, row, col, value) = (edit.sheet, edit.row, edit.col, edit.buffer.clone());
        if let Some(sheet) = self.workbook.sheet_mut(sheet) {
            sheet.set_value(row, col, &value);
        }
        self.touch();
    }

    /// Leave edit mode keeping the typed value, and commit.
    pub fn confirm_edit(&mut self) {
        if self.mode.take_edit().is_some() {
            self.commit();
        }
    }

    /// Confirm and move the active cell (Enter moves down, Tab right).
    pub fn confirm_edit_and_move(&mut self, dr: isize, dc: isize) {
        self.confirm_edit();
        self.move_selection(dr, dc);
    }

    /// Escape: put the pre-edit value back. No history entry.
    pub fn cancel_edit(&mut self) {
        let Some(edit) = self.mode.take_edit() else {
            return;
        };
        if let Some(sheet) = self.workbook.sheet_mut(edit.sheet) {
            sheet.set_value(edit.row, edit.col, &edit.original);
        }
        self.touch();
    }

    /// Focus left the grid.
    pub fn blur(&mut self) {
        self.confirm_edit();
    }

    /// Any command that isn't part of typing first closes an open edit.
    pub(crate) fn finish_edit(&mut self) {
        self.confirm_edit();
    }

    // Keyboard

    pub fn handle_key(&mut self, event: KeyEvent) -> KeyOutcome {
        if event.modifiers.is_command() {
            return self.handle_shortcut(event);
        }
        if self.mode.is_editing() {
            self.handle_edit_key(event)
        } else {
            self.handle_grid_key(event)
        }
    }

    fn handle_shortcut(&mut self, event: KeyEvent) -> KeyOutcome {
        let Some(c) = event.shortcut_char() else {
            return KeyOutcome::NotConsumed;
        };
        let shift = event.modifiers.shift;

        // While editing, clipboard and undo shortcuts belong to the text field
        if self.mode.is_editing() && matches!(c, 'z' | 'y' | 'c' | 'x' | 'v' | 'a') {
            return KeyOutcome::NotConsumed;
        }

        match c {
            'z' if shift => {
                self.redo();
            }
            'z' => {
                self.undo();
            }
            'y' => {
                self.redo();
            }
            'c' => {
                self.copy();
            }
            'x' => self.cut(),
            'v' => self.paste(),
            'a' => self.select_all(),
            'b' => self.toggle_style(TextStyle::Bold),
            'i' => self.toggle_style(TextStyle::Italic),
            'u' => self.toggle_style(TextStyle::Underline),
            'f' | 'h' => return KeyOutcome::OpenFindReplace,
            _ => return KeyOutcome::NotConsumed,
        }
        KeyOutcome::Consumed
    }

    fn handle_edit_key(&mut self, event: KeyEvent) -> KeyOutcome {
        let shift = event.modifiers.shift;
        match event.key {
            Key::Enter => self.confirm_edit_and_move(if shift { -1 } else { 1 }, 0),
            Key::Tab => self.confirm_edit_and_move(0, if shift { -1 } else { 1 }),
            Key::Escape => self.cancel_edit(),
            Key::Backspace => self.backspace(),
            Key::Char(c) if !c.is_control() => self.type_char(c),
            // Caret movement stays inside the editor
            _ => return KeyOutcome::NotConsumed,
        }
        KeyOutcome::Consumed
    }

    fn handle_grid_key(&mut self, event: KeyEvent) -> KeyOutcome {
        let shift = event.modifiers.shift;
        let arrow = match event.key {
            Key::Up => Some((-1, 0)),
            Key::Down => Some((1, 0)),
            Key::Left => Some((0, -1)),
            Key::Right => Some((0, 1)),
            _ => None,
        };
        if let Some((dr, dc)) = arrow {
            if shift {
                self.extend_selection(dr, dc);
            } else {
                self.move_selection(dr, dc);
            }
            return KeyOutcome::Consumed;
        }

        match event.key {
            Key::Enter => self.move_selection(if shift { -1 } else { 1 }, 0),
            Key::Tab => self.move_selection(0, if shift { -1 } else { 1 }),
            Key::F2 => self.start_edit(None),
            Key::Delete | Key::Backspace => self.clear_selection(),
            Key::Escape => {
                let (row, col) = self.selection.active_cell();
                self.selection.select_cell(row, col);
            }
            Key::Char(c) if !c.is_control() => {
                let seed = c.to_string();
                self.start_edit(Some(&seed));
            }
            _ => return KeyOutcome::NotConsumed,
        }
        KeyOutcome::Consumed
    }
}
