// Core grid types shared by the engine and the controller

pub mod a1;
pub mod grow;
pub mod range;
pub mod selection;

pub use a1::{cell_name, col_to_letters, letters_to_col, parse_cell_ref, parse_range, RangeParseError};
pub use grow::GrowPolicy;
pub use range::CellRange;
pub use selection::Selection;
