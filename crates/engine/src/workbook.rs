use serde::{Deserialize, Serialize};

use crate::sheet::Sheet;

/// Outcome of renaming a sheet. Duplicate names are allowed; the caller
/// decides whether to warn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed,
    /// Renamed, but another sheet already uses the name (case-insensitive)
    RenamedDuplicate,
    /// Index out of range or name empty after trimming
    Rejected,
}

/// Ordered sheets; insertion order is display order. Serialized as the
/// document payload `{ "sheets": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

impl Workbook {
    /// One empty `Sheet1`.
    pub fn new() -> Self {
        Self {
            sheets: vec![Sheet::default()],
        }
    }

    /// Wrap existing sheets. An empty list becomes the default workbook.
    pub fn from_sheets(sheets: Vec<Sheet>) -> Self {
        if sheets.is_empty() {
            Self::new()
        } else {
            Self { sheets }
        }
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Sheets for in-place editing; the count can't change through this.
    pub fn sheets_mut(&mut self) -> &mut [Sheet] {
        &mut self.sheets
    }

    pub fn into_sheets(self) -> Vec<Sheet> {
        self.sheets
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    pub fn sheet_mut(&mut self, index: usize) -> Option<&mut Sheet> {
        self.sheets.get_mut(index)
    }

    /// Replace all sheets at once (undo/redo restore). Ignored if empty.
    pub fn replace_sheets(&mut self, sheets: Vec<Sheet>) {
        if !sheets.is_empty() {
            self.sheets = sheets;
        }
    }

    /// Check if a sheet name already exists (case-insensitive)
    pub fn sheet_name_exists(&self, name: &str) -> bool {
        let key = name.trim().to_lowercase();
        self.sheets.iter().any(|s| s.name.trim().to_lowercase() == key)
    }

    /// Append a sheet named `SheetN`, picking the first unused N.
    pub fn add_sheet(&mut self, num_rows: usize, num_cols: usize) -> usize {
        let mut n = self.sheets.len() + 1;
        let mut name = format!("Sheet{}", n);
        while self.sheet_name_exists(&name) {
            n += 1;
            name = format!("Sheet{}", n);
        }
        self.sheets.push(Sheet::with_size(name, num_rows, num_cols));
        self.sheets.len() - 1
    }

    pub fn rename_sheet(&mut self, index: usize, new_name: &str) -> RenameOutcome {
        let name = new_name.trim();
        if name.is_empty() || index >= self.sheets.len() {
            return RenameOutcome::Rejected;
        }
        let key = name.to_lowercase();
        let duplicate = self
            .sheets
            .iter()
            .enumerate()
            .any(|(i, s)| i != index && s.name.trim().to_lowercase() == key);
        self.sheets[index].name = name.to_string();
        if duplicate {
            RenameOutcome::RenamedDuplicate
        } else {
            RenameOutcome::Renamed
        }
    }

    /// Remove a sheet. The last remaining sheet can't be deleted.
    pub fn delete_sheet(&mut self, index: usize) -> bool {
        if self.sheets.len() <= 1 || index >= self.sheets.len() {
            return false;
        }
        self.sheets.remove(index);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_workbook() {
        let wb = Workbook::default();
        assert_eq!(wb.sheet_count(), 1);
        assert_eq!(wb.sheets()[0].name, "Sheet1");
        assert_eq!(Workbook::from_sheets(Vec::new()), wb);
    }

    #[test]
    fn test_add_sheet_unique_name() {
        let mut wb = Workbook::new();
        wb.rename_sheet(0, "Sheet2");
        let idx = wb.add_sheet(10, 5);
        assert_eq!(idx, 1);
        assert_eq!(wb.sheets()[1].name, "Sheet3");
        assert_eq!(wb.sheets()[1].num_rows, 10);
    }

    #[test]
    fn test_rename_warns_on_duplicate() {
        let mut wb = Workbook::new();
        wb.add_sheet(50, 26);
        assert_eq!(wb.rename_sheet(1, "  Data "), RenameOutcome::Renamed);
        assert_eq!(wb.sheets()[1].name, "Data");
        assert_eq!(wb.rename_sheet(0, "DATA"), RenameOutcome::RenamedDuplicate);
        assert_eq!(wb.sheets()[0].name, "DATA");
        assert_eq!(wb.rename_sheet(0, "   "), RenameOutcome::Rejected);
        assert_eq!(wb.rename_sheet(9, "x"), RenameOutcome::Rejected);
    }

    #[test]
    fn test_delete_never_removes_last() {
        let mut wb = Workbook::new();
        assert!(!wb.delete_sheet(0));
        wb.add_sheet(50, 26);
        assert!(wb.delete_sheet(0));
        assert_eq!(wb.sheets()[0].name, "Sheet2");
        assert!(!wb.delete_sheet(0));
    }

    #[test]
    fn test_payload_roundtrip() {
        let mut wb = Workbook::new();
        wb.sheet_mut(0).unwrap().set_value(0, 0, "hi");
        let json = serde_json::to_string(&wb).unwrap();
        assert!(json.starts_with(r#"{"sheets":[{"name":"Sheet1","#));
        let back: Workbook = serde_json::from_str(&json).unwrap();
        assert_eq!(back, wb);
    }
}
