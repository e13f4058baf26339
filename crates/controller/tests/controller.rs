use std::collections::BTreeSet;
use std::time::Duration;

use sheetgrid_config::EditorSettings;
use sheetgrid_core::CellRange;
use sheetgrid_engine::{Axis, RenameOutcome, SortDirection, Workbook};
use sheetgrid_controller::{
    Gesture, Key, KeyEvent, KeyOutcome, ManualClock, MemoryClipboard, MemoryStore, Modifiers,
    SheetController,
};
use sheetgrid_io::document;

type Controller = SheetController<MemoryClipboard, MemoryStore, ManualClock>;

fn controller() -> (Controller, ManualClock) {
    let clock = ManualClock::new();
    let c = SheetController::new(
        "doc-1",
        Workbook::new(),
        EditorSettings::default(),
        MemoryClipboard::new(),
        MemoryStore::new(),
        clock.clone(),
    );
    (c, clock)
}

fn press(c: &mut Controller, key: Key) -> KeyOutcome {
    c.handle_key(KeyEvent::plain(key))
}

fn shortcut(c: &mut Controller, ch: char) -> KeyOutcome {
    c.handle_key(KeyEvent::new(Key::Char(ch), Modifiers::command()))
}

fn type_text(c: &mut Controller, text: &str) {
    for ch in text.chars() {
        press(c, Key::Char(ch));
    }
}

/// Select a cell, type a value and confirm it.
fn enter_value(c: &mut Controller, row: usize, col: usize, text: &str) {
    c.select_cell(row, col);
    c.set_edit_text(text);
    c.confirm_edit();
}

// Editing

#[test]
fn test_typing_is_silent_until_enter() {
    let (mut c, _) = controller();
    type_text(&mut c, "42");
    assert!(c.mode().is_editing());
    assert_eq!(c.sheet().raw(0, 0), "42");
    assert_eq!(c.history().len(), 1);

    assert_eq!(press(&mut c, Key::Enter), KeyOutcome::Consumed);
    assert!(!c.mode().is_editing());
    assert_eq!(c.history().len(), 2);
    assert_eq!(c.selection().active_cell(), (1, 0));
}

#[test]
fn test_printable_key_seeds_edit() {
    let (mut c, _) = controller();
    enter_value(&mut c, 0, 0, "old");
    c.select_cell(0, 0);
    press(&mut c, Key::Char('x'));
    assert_eq!(c.formula_bar(), "x");
    assert_eq!(c.mode().edit().map(|e| e.original.as_str()), Some("old"));
}

#[test]
fn test_escape_reverts_without_history() {
    let (mut c, _) = controller();
    enter_value(&mut c, 0, 0, "old");
    let len = c.history().len();

    c.select_cell(0, 0);
    type_text(&mut c, "new");
    assert_eq!(c.sheet().raw(0, 0), "new");
    press(&mut c, Key::Escape);

    assert_eq!(c.sheet().raw(0, 0), "old");
    assert_eq!(c.history().len(), len);
    assert!(!c.mode().is_editing());
    assert!(!c.can_redo());
}

#[test]
fn test_f2_edits_in_place() {
    let (mut c, _) = controller();
    enter_value(&mut c, 0, 0, "abc");
    c.select_cell(0, 0);
    press(&mut c, Key::F2);
    type_text(&mut c, "d");
    press(&mut c, Key::Backspace);
    type_text(&mut c, "e");
    press(&mut c, Key::Tab);
    assert_eq!(c.sheet().raw(0, 0), "abce");
    assert_eq!(c.selection().active_cell(), (0, 1));
}

#[test]
fn test_formula_bar_edit() {
    let (mut c, _) = controller();
    c.set_edit_text("=1+2");
    assert_eq!(c.formula_bar(), "=1+2");
    press(&mut c, Key::Enter);
    assert_eq!(c.sheet().display(0, 0), "3");
    c.select_cell(0, 0);
    assert_eq!(c.formula_bar(), "=1+2");
}

#[test]
fn test_click_elsewhere_commits_edit() {
    let (mut c, _) = controller();
    type_text(&mut c, "q");
    c.mouse_down(2, 2, false);
    assert!(!c.mode().is_editing());
    assert_eq!(c.sheet().raw(0, 0), "q");
    assert_eq!(c.history().len(), 2);
    c.mouse_up();
    assert_eq!(c.selection().active_cell(), (2, 2));
}

#[test]
fn test_blur_commits_edit() {
    let (mut c, _) = controller();
    type_text(&mut c, "z");
    c.blur();
    assert!(!c.mode().is_editing());
    assert_eq!(c.history().len(), 2);
}

#[test]
fn test_edit_of_merged_cell_goes_to_origin() {
    let (mut c, _) = controller();
    c.mouse_down(0, 0, false);
    c.mouse_enter(1, 1);
    c.mouse_up();
    c.merge_selection();
    assert_eq!(c.sheet().merged_cells, vec![CellRange::new(0, 0, 1, 1)]);

    c.select_cell(1, 1);
    type_text(&mut c, "m");
    press(&mut c, Key::Enter);
    assert_eq!(c.sheet().raw(0, 0), "m");
    assert_eq!(c.sheet().raw(1, 1), "");
}

// Navigation

#[test]
fn test_arrows_skip_hidden_rows_and_cols() {
    let (mut c, _) = controller();
    c.select_cell(1, 0);
    c.hide_rows();
    c.select_cell(0, 1);
    c.hide_cols();

    c.select_cell(0, 0);
    press(&mut c, Key::Down);
    assert_eq!(c.selection().active_cell(), (2, 0));
    press(&mut c, Key::Up);
    assert_eq!(c.selection().active_cell(), (0, 0));
    press(&mut c, Key::Right);
    assert_eq!(c.selection().active_cell(), (0, 2));
    press(&mut c, Key::Left);
    assert_eq!(c.selection().active_cell(), (0, 0));
}

#[test]
fn test_arrows_skip_filtered_rows() {
    let (mut c, _) = controller();
    for (row, v) in ["a", "b", "a", "b", "a"].iter().enumerate() {
        enter_value(&mut c, row, 0, v);
    }
    c.set_filter(0, BTreeSet::from(["a".to_string()]));

    c.select_cell(0, 0);
    press(&mut c, Key::Down);
    assert_eq!(c.selection().active_cell(), (2, 0));
    press(&mut c, Key::Down);
    assert_eq!(c.selection().active_cell(), (4, 0));
    // Everything below is blank and filtered out
    press(&mut c, Key::Down);
    assert_eq!(c.selection().active_cell(), (4, 0));
}

#[test]
fn test_arrows_stop_at_edges() {
    let (mut c, _) = controller();
    press(&mut c, Key::Up);
    press(&mut c, Key::Left);
    assert_eq!(c.selection().active_cell(), (0, 0));
    c.select_cell(49, 25);
    press(&mut c, Key::Down);
    press(&mut c, Key::Right);
    assert_eq!(c.selection().active_cell(), (49, 25));
}

#[test]
fn test_shift_arrows_extend() {
    let (mut c, _) = controller();
    c.select_cell(1, 1);
    c.handle_key(KeyEvent::new(Key::Down, Modifiers::shift()));
    c.handle_key(KeyEvent::new(Key::Down, Modifiers::shift()));
    c.handle_key(KeyEvent::new(Key::Right, Modifiers::shift()));
    assert_eq!(c.selection().range(), CellRange::new(1, 1, 3, 2));
    assert_eq!(c.selection().active_cell(), (1, 1));

    press(&mut c, Key::Escape);
    assert!(c.selection().is_single_cell());
}

#[test]
fn test_select_all() {
    let (mut c, _) = controller();
    assert_eq!(shortcut(&mut c, 'a'), KeyOutcome::Consumed);
    assert_eq!(c.selection().range(), CellRange::new(0, 0, 49, 25));
}

// Shortcuts and history

#[test]
fn test_undo_redo_shortcuts() {
    let (mut c, _) = controller();
    enter_value(&mut c, 0, 0, "x");

    shortcut(&mut c, 'z');
    assert_eq!(c.sheet().raw(0, 0), "");
    c.handle_key(KeyEvent::new(Key::Char('Z'), Modifiers::command_shift()));
    assert_eq!(c.sheet().raw(0, 0), "x");
    shortcut(&mut c, 'z');
    shortcut(&mut c, 'y');
    assert_eq!(c.sheet().raw(0, 0), "x");
    assert!(!c.can_redo());
}

#[test]
fn test_undo_shortcut_belongs_to_editor_while_editing() {
    let (mut c, _) = controller();
    type_text(&mut c, "ab");
    assert_eq!(shortcut(&mut c, 'z'), KeyOutcome::NotConsumed);
    assert!(c.mode().is_editing());
    assert_eq!(press(&mut c, Key::Down), KeyOutcome::NotConsumed);
}

#[test]
fn test_find_opens_external_panel() {
    let (mut c, _) = controller();
    assert_eq!(shortcut(&mut c, 'f'), KeyOutcome::OpenFindReplace);
    assert_eq!(shortcut(&mut c, 'h'), KeyOutcome::OpenFindReplace);
    assert_eq!(shortcut(&mut c, 'q'), KeyOutcome::NotConsumed);
}

#[test]
fn test_bold_shortcut_toggles_selection() {
    let (mut c, _) = controller();
    c.mouse_down(0, 0, false);
    c.mouse_enter(0, 1);
    c.mouse_up();
    shortcut(&mut c, 'b');
    assert!(c.sheet().cell(0, 0).bold);
    assert!(c.sheet().cell(0, 1).bold);
    assert_eq!(c.history().len(), 2);

    shortcut(&mut c, 'b');
    assert!(!c.sheet().cell(0, 0).bold);
    assert!(c.sheet().cells().is_empty());
}

#[test]
fn test_history_is_bounded() {
    let (mut c, _) = controller();
    for i in 1..=60 {
        enter_value(&mut c, 0, 0, &i.to_string());
    }
    assert_eq!(c.history().len(), 50);

    for _ in 0..50 {
        c.undo();
    }
    assert!(!c.can_undo());
    // Commits 1..=10 and the initial state were evicted
    assert_eq!(c.sheet().raw(0, 0), "11");
}

#[test]
fn test_no_op_command_records_nothing() {
    let (mut c, _) = controller();
    c.merge_selection();
    c.unmerge_active();
    c.clear_selection();
    assert_eq!(c.history().len(), 1);
    assert!(!c.autosave_pending());
}

// Clipboard

#[test]
fn test_copy_paste_displayed_values() {
    let (mut c, _) = controller();
    enter_value(&mut c, 0, 0, "1");
    enter_value(&mut c, 0, 1, "=A1*2");
    c.mouse_down(0, 0, false);
    c.mouse_enter(0, 1);
    c.mouse_up();
    shortcut(&mut c, 'c');
    assert_eq!(c.clipboard().text, "1\t2");

    c.select_cell(2, 0);
    shortcut(&mut c, 'v');
    assert_eq!(c.sheet().raw(2, 0), "1");
    assert_eq!(c.sheet().raw(2, 1), "2");
    assert_eq!(c.selection().range(), CellRange::new(2, 0, 2, 1));
}

#[test]
fn test_cut_clears_source() {
    let (mut c, _) = controller();
    enter_value(&mut c, 0, 0, "move me");
    c.select_cell(0, 0);
    shortcut(&mut c, 'x');
    assert_eq!(c.clipboard().text, "move me");
    assert_eq!(c.sheet().raw(0, 0), "");
}

#[test]
fn test_paste_grows_sheet() {
    let (mut c, _) = controller();
    c.clipboard_mut().text = "a\tb\nc\td".to_string();
    c.select_cell(49, 25);
    c.paste();
    assert_eq!((c.sheet().num_rows, c.sheet().num_cols), (51, 27));
    assert_eq!(c.sheet().raw(50, 26), "d");
}

#[test]
fn test_clipboard_failures_are_no_ops() {
    let clock = ManualClock::new();
    let mut c = SheetController::new(
        "doc-1",
        Workbook::new(),
        EditorSettings::default(),
        MemoryClipboard::denied(),
        MemoryStore::new(),
        clock,
    );
    enter_value(&mut c, 0, 0, "keep");
    let len = c.history().len();

    c.select_cell(0, 0);
    assert!(!c.copy());
    c.cut();
    c.paste();
    assert_eq!(c.sheet().raw(0, 0), "keep");
    assert_eq!(c.history().len(), len);
}

#[test]
fn test_delete_key_clears_values() {
    let (mut c, _) = controller();
    enter_value(&mut c, 0, 0, "a");
    enter_value(&mut c, 1, 0, "b");
    c.mouse_down(0, 0, false);
    c.mouse_enter(1, 0);
    c.mouse_up();
    press(&mut c, Key::Delete);
    assert!(c.sheet().cells().is_empty());
}

// Gestures

#[test]
fn test_drag_selection() {
    let (mut c, _) = controller();
    c.mouse_down(1, 1, false);
    assert_eq!(c.gesture(), Gesture::SelectingRange);
    c.mouse_enter(2, 1);
    c.mouse_enter(3, 2);
    c.mouse_up();
    assert_eq!(c.gesture(), Gesture::Idle);
    assert_eq!(c.selection().range(), CellRange::new(1, 1, 3, 2));

    // Moving after release does nothing
    c.mouse_enter(9, 9);
    assert_eq!(c.selection().range(), CellRange::new(1, 1, 3, 2));
    assert_eq!(c.history().len(), 1);
}

#[test]
fn test_autofill_numeric_series() {
    let (mut c, _) = controller();
    enter_value(&mut c, 0, 0, "5");
    let len = c.history().len();

    c.select_cell(0, 0);
    c.fill_handle_down();
    c.mouse_enter(1, 0);
    c.mouse_enter(3, 0);
    assert_eq!(c.sheet().raw(1, 0), "");
    c.mouse_up();

    assert_eq!(c.sheet().raw(1, 0), "6");
    assert_eq!(c.sheet().raw(2, 0), "7");
    assert_eq!(c.sheet().raw(3, 0), "8");
    assert_eq!(c.history().len(), len + 1);
    assert_eq!(c.selection().range(), CellRange::new(0, 0, 3, 0));

    c.undo();
    assert_eq!(c.sheet().raw(3, 0), "");
}

#[test]
fn test_autofill_formula_right() {
    let (mut c, _) = controller();
    enter_value(&mut c, 1, 1, "=A1");
    c.select_cell(1, 1);
    c.fill_handle_down();
    c.mouse_enter(1, 2);
    c.mouse_up();
    assert_eq!(c.sheet().raw(1, 2), "=B1");
}

#[test]
fn test_resize_is_silent_and_coalesced() {
    let (mut c, _) = controller();
    assert_eq!(c.column_width(0), 100);
    c.resize_handle_down(Axis::Col, 0);
    c.resize_drag(120);
    c.resize_drag(150);
    c.mouse_up();
    assert_eq!(c.column_width(0), 150);
    assert_eq!(c.history().len(), 1);
    assert!(c.autosave_pending());

    enter_value(&mut c, 0, 0, "x");
    assert_eq!(c.history().len(), 2);
    c.undo();
    assert_eq!(c.column_width(0), 100);
    assert_eq!(c.sheet().raw(0, 0), "");
}

#[test]
fn test_undo_after_resize_reverts_only_the_resize() {
    let (mut c, _) = controller();
    enter_value(&mut c, 0, 0, "x");
    c.resize_handle_down(Axis::Col, 0);
    c.resize_drag(150);
    c.mouse_up();

    assert!(c.undo());
    assert_eq!(c.column_width(0), 100);
    assert_eq!(c.sheet().raw(0, 0), "x");
    assert!(c.redo());
    assert_eq!(c.column_width(0), 150);
    assert_eq!(c.sheet().raw(0, 0), "x");
}

// Structure and view ops

#[test]
fn test_insert_and_delete_rows() {
    let (mut c, _) = controller();
    enter_value(&mut c, 0, 0, "top");
    c.select_cell(0, 0);
    c.insert_row_above();
    assert_eq!(c.sheet().raw(1, 0), "top");
    assert_eq!(c.sheet().num_rows, 51);

    c.select_cell(0, 0);
    c.delete_row();
    assert_eq!(c.sheet().raw(0, 0), "top");
    assert_eq!(c.sheet().num_rows, 50);
}

#[test]
fn test_delete_last_col_clamps_selection() {
    let (mut c, _) = controller();
    c.select_cell(0, 25);
    c.delete_col();
    assert_eq!(c.sheet().num_cols, 25);
    assert_eq!(c.selection().active_cell(), (0, 24));
}

#[test]
fn test_sort_and_undo() {
    let (mut c, _) = controller();
    for (row, v) in ["3", "1", "2"].iter().enumerate() {
        enter_value(&mut c, row, 0, v);
    }
    c.sort(0, SortDirection::Ascending);
    let col: Vec<&str> = (0..3).map(|r| c.sheet().raw(r, 0)).collect();
    assert_eq!(col, ["1", "2", "3"]);

    c.undo();
    let col: Vec<&str> = (0..3).map(|r| c.sheet().raw(r, 0)).collect();
    assert_eq!(col, ["3", "1", "2"]);
}

#[test]
fn test_freeze_at_selection() {
    let (mut c, _) = controller();
    c.select_cell(2, 1);
    c.freeze_at_selection();
    assert_eq!((c.sheet().freeze_row, c.sheet().freeze_col), (2, 1));
}

#[test]
fn test_autofit_column() {
    let (mut c, _) = controller();
    enter_value(&mut c, 0, 0, "a fairly long value");
    c.autofit_column(0);
    assert!(c.column_width(0) > 100);
}

// Sheets

#[test]
fn test_sheet_management() {
    let (mut c, _) = controller();
    assert_eq!(c.add_sheet(), 1);
    assert_eq!(c.active_sheet_index(), 1);
    assert_eq!(c.sheet().name, "Sheet2");

    assert_eq!(c.rename_sheet(1, "sheet1"), RenameOutcome::RenamedDuplicate);
    assert_eq!(c.rename_sheet(1, " "), RenameOutcome::Rejected);

    assert!(c.switch_sheet(0));
    assert!(!c.switch_sheet(5));
    assert!(c.delete_sheet(1));
    assert!(!c.delete_sheet(0));
    assert_eq!(c.workbook().sheet_count(), 1);
}

#[test]
fn test_undo_add_sheet_clamps_active() {
    let (mut c, _) = controller();
    c.add_sheet();
    let len = c.history().len();
    assert!(c.switch_sheet(1));
    assert_eq!(c.history().len(), len);

    c.undo();
    assert_eq!(c.workbook().sheet_count(), 1);
    assert_eq!(c.active_sheet_index(), 0);
}

// CSV

#[test]
fn test_csv_import_and_export() {
    let (mut c, _) = controller();
    c.import_csv("a,b\n1,\"x,y\"").unwrap();
    assert_eq!(c.sheet().raw(1, 1), "x,y");
    assert_eq!(c.selection().range(), CellRange::new(0, 0, 1, 1));
    assert_eq!(c.history().len(), 2);

    let csv = c.export_csv().unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some(format!("a,b{}", ",".repeat(24)).as_str()));
    assert_eq!(lines.next(), Some(format!("1,\"x,y\"{}", ",".repeat(24)).as_str()));

    c.set_title("Budget");
    assert_eq!(c.csv_file_name(), "Budget.csv");
}

#[test]
fn test_csv_file_import() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("in.csv");
    std::fs::write(&path, "n\n7\n").unwrap();

    let (mut c, _) = controller();
    c.import_csv_file(&path).unwrap();
    assert_eq!(c.sheet().raw(1, 0), "7");

    let out = dir.path().join("out.csv");
    c.export_csv_to(&out).unwrap();
    assert!(std::fs::read_to_string(&out).unwrap().starts_with("n,"));
}

// Persistence

#[test]
fn test_autosave_debounces() {
    let (mut c, clock) = controller();
    type_text(&mut c, "a");
    clock.advance(Duration::from_millis(1500));
    type_text(&mut c, "b");
    clock.advance(Duration::from_millis(1500));
    assert!(!c.maybe_save());
    assert_eq!(c.store().save_count, 0);

    clock.advance(Duration::from_millis(500));
    assert!(c.maybe_save());
    assert!(!c.maybe_save());
    assert_eq!(c.store().save_count, 1);

    let saved = document::parse_document(c.store().document("doc-1").unwrap()).unwrap();
    assert_eq!(saved.sheets()[0].raw(0, 0), "ab");
}

#[test]
fn test_navigation_does_not_schedule_save() {
    let (mut c, _) = controller();
    press(&mut c, Key::Down);
    c.mouse_down(3, 3, false);
    c.mouse_up();
    assert!(!c.autosave_pending());
}

#[test]
fn test_save_now_saves_pending_changes() {
    let (mut c, _) = controller();
    c.save_now();
    assert_eq!(c.store().save_count, 0);
    enter_value(&mut c, 0, 0, "now");
    c.save_now();
    assert_eq!(c.store().save_count, 1);
    assert!(!c.autosave_pending());
}

#[test]
fn test_save_failure_does_not_block_editing() {
    let (mut c, clock) = controller();
    c.store_mut().fail = true;
    enter_value(&mut c, 0, 0, "1");
    clock.advance(Duration::from_millis(2000));
    assert!(c.maybe_save());
    assert_eq!(c.store().save_count, 0);

    c.store_mut().fail = false;
    enter_value(&mut c, 0, 0, "2");
    clock.advance(Duration::from_millis(2000));
    assert!(c.maybe_save());
    assert_eq!(c.store().save_count, 1);
}

#[test]
fn test_open_existing_document() {
    let mut wb = Workbook::new();
    wb.sheet_mut(0).unwrap().set_value(0, 0, "hello");
    let payload = document::to_payload(&wb).unwrap();

    let c: Controller = SheetController::open(
        "doc-9",
        EditorSettings::default(),
        MemoryClipboard::new(),
        MemoryStore::with_document("doc-9", &payload),
        ManualClock::new(),
    );
    assert_eq!(c.sheet().raw(0, 0), "hello");
    assert!(!c.can_undo());
}

#[test]
fn test_open_missing_document_uses_settings() {
    let settings = EditorSettings {
        default_rows: 10,
        default_cols: 5,
        ..EditorSettings::default()
    };
    let c: Controller = SheetController::open(
        "nope",
        settings,
        MemoryClipboard::new(),
        MemoryStore::new(),
        ManualClock::new(),
    );
    assert_eq!((c.sheet().num_rows, c.sheet().num_cols), (10, 5));
    assert_eq!(c.sheet().name, "Sheet1");
}

#[test]
fn test_open_with_failing_store_falls_back() {
    let mut store = MemoryStore::with_document("doc", "{\"sheets\":[]}");
    store.fail = true;
    let c: Controller = SheetController::open(
        "doc",
        EditorSettings::default(),
        MemoryClipboard::new(),
        store,
        ManualClock::new(),
    );
    assert_eq!(c.workbook().sheet_count(), 1);
}

#[test]
fn test_open_document_with_zero_bounds() {
    let mut c: Controller = SheetController::open(
        "doc",
        EditorSettings::default(),
        MemoryClipboard::new(),
        MemoryStore::with_document("doc", r#"{"sheets":[{"name":"S","numRows":0,"numCols":0}]}"#),
        ManualClock::new(),
    );
    assert_eq!((c.sheet().num_rows, c.sheet().num_cols), (1, 1));
    c.select_cell(3, 3);
    c.mouse_down(2, 2, false);
    c.mouse_enter(5, 5);
    c.mouse_up();
    press(&mut c, Key::Down);
    assert_eq!(c.selection().active_cell(), (0, 0));
}
