//! The controller that owns a workbook and everything interactive around it.
//!
//! Mutations come in two kinds. Committed ones (formatting, structural
//! edits, sort, paste, merge, a confirmed edit) push a snapshot of every
//! sheet onto the history. Silent ones (typing, drag-resize, drag
//! selection) change the sheet in place and are folded into the next
//! commit. Both kinds reschedule the autosave debounce.

use std::time::Duration;

use sheetgrid_config::EditorSettings;
use sheetgrid_core::Selection;
use sheetgrid_engine::{History, Sheet, Workbook};
use sheetgrid_io::document;

use crate::autosave::{Clock, Debouncer, RealClock};
use crate::clipboard::ClipboardProvider;
use crate::gesture::Gesture;
use crate::mode::Mode;
use crate::persist::DocumentStore;

pub struct SheetController<C, S, K = RealClock> {
    pub(crate) workbook: Workbook,
    pub(crate) active_sheet: usize,
    pub(crate) selection: Selection,
    pub(crate) mode: Mode,
    pub(crate) gesture: Gesture,
    pub(crate) history: History<Vec<Sheet>>,
    pub(crate) settings: EditorSettings,
    pub(crate) clipboard: C,
    pub(crate) store: S,
    pub(crate) clock: K,
    pub(crate) autosave: Debouncer,
    doc_id: String,
    title: String,
}

impl<C, S, K> SheetController<C, S, K>
where
    C: ClipboardProvider,
    S: DocumentStore,
    K: Clock,
{
    pub fn new(
        doc_id: impl Into<String>,
        workbook: Workbook,
        settings: EditorSettings,
        clipboard: C,
        store: S,
        clock: K,
    ) -> Self {
        let history = History::new(workbook.sheets().to_vec(), settings.history_limit);
        let autosave = Debouncer::new(Duration::from_millis(settings.autosave_debounce_ms));
        Self {
            workbook,
            active_sheet: 0,
            selection: Selection::default(),
            mode: Mode::Idle,
            gesture: Gesture::Idle,
            history,
            settings,
            clipboard,
            store,
            clock,
            autosave,
            doc_id: doc_id.into(),
            title: String::from("Untitled"),
        }
    }

    /// Load `doc_id` from the store. An absent or unreadable document starts
    /// as one empty sheet of the configured size.
    pub fn open(
        doc_id: impl Into<String>,
        settings: EditorSettings,
        clipboard: C,
        mut store: S,
        clock: K,
    ) -> Self {
        let doc_id = doc_id.into();
        let payload = match store.load(&doc_id) {
            Ok(payload) => payload,
            Err(e) => {
                log::warn!("could not load document {doc_id}: {e}");
                None
            }
        };
        let workbook = match payload {
            Some(payload) => document::load_document(Some(&payload)),
            None => Workbook::from_sheets(vec![Sheet::with_size(
                "Sheet1",
                settings.default_rows,
                settings.default_cols,
            )]),
        };
        Self::new(doc_id, workbook, settings, clipboard, store, clock)
    }

    // Accessors

    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    pub fn active_sheet_index(&self) -> usize {
        self.active_sheet
    }

    pub fn sheet(&self) -> &Sheet {
        &self.workbook.sheets()[self.active_sheet]
    }

    pub(crate) fn sheet_mut(&mut self) -> &mut Sheet {
        let index = self.active_sheet;
        &mut self.workbook.sheets_mut()[index]
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn history(&self) -> &History<Vec<Sheet>> {
        &self.history
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn clipboard_mut(&mut self) -> &mut C {
        &mut self.clipboard
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// The formula bar shows the edit buffer while editing, otherwise the
    /// raw value of the active cell.
    pub fn formula_bar(&self) -> String {
        if let Some(edit) = self.mode.edit() {
            return edit.buffer.clone();
        }
        let (row, col) = self.selection.active_cell();
        self.sheet().raw(row, col).to_string()
    }

    pub fn column_width(&self, col: usize) -> u32 {
        self.sheet()
            .col_width(col)
            .unwrap_or(self.settings.default_column_width)
    }

    pub fn row_height(&self, row: usize) -> u32 {
        self.sheet()
            .row_height(row)
            .unwrap_or(self.settings.default_row_height)
    }

    // History

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Push the current sheets as a new history entry. Nothing is recorded
    /// when the sheets equal the current entry.
    pub(crate) fn commit(&mut self) {
        let unchanged = self
            .history
            .current()
            .is_some_and(|current| current.as_slice() == self.workbook.sheets());
        if unchanged {
            return;
        }
        self.history.push(self.workbook.sheets().to_vec());
        log::debug!(
            "commit: history at {}/{}",
            self.history.index() + 1,
            self.history.len()
        );
        self.touch();
    }

    /// Mark the document dirty: restart the autosave countdown.
    pub(crate) fn touch(&mut self) {
        self.autosave.schedule(self.clock.now());
    }

    pub fn undo(&mut self) -> bool {
        self.finish_edit();
        // Pending silent changes (a drag-resize) become their own entry
        self.commit();
        match self.history.undo() {
            Some(sheets) => {
                self.restore(sheets);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.finish_edit();
        self.commit();
        match self.history.redo() {
            Some(sheets) => {
                self.restore(sheets);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, sheets: Vec<Sheet>) {
        self.workbook.replace_sheets(sheets);
        self.active_sheet = self.active_sheet.min(self.workbook.sheet_count().saturating_sub(1));
        self.gesture = Gesture::Idle;
        self.clamp_selection();
        self.touch();
    }

    pub(crate) fn clamp_selection(&mut self) {
        let (rows, cols) = (self.sheet().num_rows, self.sheet().num_cols);
        self.selection.clamp_to(rows, cols);
    }

    // Autosave

    pub fn autosave_pending(&self) -> bool {
        self.autosave.is_pending()
    }

    /// Drive the autosave timer. Saves and returns true when the debounce
    /// deadline has passed.
    pub fn maybe_save(&mut self) -> bool {
        if self.autosave.poll(self.clock.now()) {
            self.write_document();
            true
        } else {
            false
        }
    }

    /// Save right away if a save is pending (window close, navigation away).
    pub fn save_now(&mut self) {
        if self.autosave.is_pending() {
            self.autosave.cancel();
            self.write_document();
        }
    }

    fn write_document(&mut self) {
        let payload = match document::to_payload(&self.workbook) {
            Ok(payload) => payload,
            Err(e) => {
                log::warn!("could not encode document {}: {e}", self.doc_id);
                return;
            }
        };
        match self.store.save(&self.doc_id, &payload) {
            Ok(()) => log::info!("saved document {} ({} bytes)", self.doc_id, payload.len()),
            Err(e) => log::warn!("save failed for {}: {e}", self.doc_id),
        }
    }
}
