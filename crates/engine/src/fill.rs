// Drag-handle autofill

use sheetgrid_core::CellRange;

use crate::format::{format_general, parse_number};
use crate::formula::translate_formula;
use crate::sheet::Sheet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillKind {
    /// Same column
    Vertical,
    /// Same row
    Horizontal,
    /// Neither: plain copy over the bounding rectangle
    Diagonal,
}

/// How a drag from `origin` to `target` fills. None when they coincide.
pub fn classify(origin: (usize, usize), target: (usize, usize)) -> Option<FillKind> {
    if origin == target {
        None
    } else if origin.1 == target.1 {
        Some(FillKind::Vertical)
    } else if origin.0 == target.0 {
        Some(FillKind::Horizontal)
    } else {
        Some(FillKind::Diagonal)
    }
}

/// Value written `offset` steps from the source along the fill axis.
///
/// Numbers count up (or down when dragging backwards), formulas have their
/// references shifted, anything else is copied verbatim.
pub fn series_value(source: &str, offset: isize, kind: FillKind) -> String {
    if source.starts_with('=') {
        return match kind {
            FillKind::Vertical => translate_formula(source, offset, 0),
            FillKind::Horizontal => translate_formula(source, 0, offset),
            FillKind::Diagonal => source.to_string(),
        };
    }
    match parse_number(source) {
        Some(n) => format_general(n + offset as f64),
        None => source.to_string(),
    }
}

impl Sheet {
    /// Fill from `origin` to `target`. Returns false when nothing was filled.
    ///
    /// Axis fills write values only and leave the target cells' formatting
    /// alone; a diagonal fill copies the origin's whole cell, formatting
    /// included.
    pub fn autofill(&mut self, origin: (usize, usize), target: (usize, usize)) -> bool {
        let Some(kind) = classify(origin, target) else {
            return false;
        };
        let source = self.cell(origin.0, origin.1);

        match kind {
            FillKind::Vertical | FillKind::Horizontal => {
                let (from, to) = match kind {
                    FillKind::Vertical => (origin.0, target.0),
                    _ => (origin.1, target.1),
                };
                let step: isize = if to > from { 1 } else { -1 };
                let mut offset: isize = 0;
                let mut pos = from;
                while pos != to {
                    offset += step;
                    pos = pos.saturating_add_signed(step);
                    let value = series_value(&source.value, offset, kind);
                    let (row, col) = match kind {
                        FillKind::Vertical => (pos, origin.1),
                        _ => (origin.0, pos),
                    };
                    self.set_value(row, col, &value);
                }
            }
            FillKind::Diagonal => {
                let rect = CellRange::new(origin.0, origin.1, target.0, target.1);
                for (row, col) in rect.cells() {
                    if (row, col) != origin {
                        self.set_cell(row, col, source.clone());
                    }
                }
            }
        }
        true
    }
}
