//! Two-phase pointer gestures.
//!
//! Mouse-down arms a gesture, pointer movement updates it, and a
//! window-level mouse-up disarms it. Only the autofill gesture does work
//! on release.

use sheetgrid_engine::Axis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Dragging out a selection rectangle from its anchor
    SelectingRange,
    /// Dragging the fill handle; `target` is the last cell entered
    AutoFilling {
        origin: (usize, usize),
        target: (usize, usize),
    },
    /// Dragging a row or column border
    Resizing { axis: Axis, index: usize },
}

impl Gesture {
    pub fn is_active(&self) -> bool {
        !matches!(self, Gesture::Idle)
    }

    /// Record the cell under the pointer. Returns true if the gesture
    /// cares about pointer position.
    pub fn track(&mut self, row: usize, col: usize) -> bool {
        match self {
            Gesture::AutoFilling { target, .. } => {
                *target = (row, col);
                true
            }
            Gesture::SelectingRange => true,
            Gesture::Idle | Gesture::Resizing { .. } => false,
        }
    }
}
