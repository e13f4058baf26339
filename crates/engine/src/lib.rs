pub mod cell;
pub mod clipboard;
pub mod fill;
pub mod filter;
pub mod format;
pub mod formula;
pub mod history;
pub mod sheet;
pub mod sort;
pub mod store;
pub mod structure;
pub mod workbook;

pub use cell::{Alignment, Borders, CellData, CellFormat, TextStyle};
pub use fill::FillKind;
pub use formula::{CellError, FormulaError, Value};
pub use history::{History, DEFAULT_HISTORY_LIMIT};
pub use sheet::{Sheet, DEFAULT_COLS, DEFAULT_ROWS};
pub use sort::SortDirection;
pub use store::{CellKey, CellStore};
pub use structure::Axis;
pub use workbook::{RenameOutcome, Workbook};
