/// Whether a cell is being edited.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    Editing(EditState),
}

/// An in-progress cell edit. Typing writes `buffer` straight into the cell;
/// `original` is what Escape restores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    pub sheet: usize,
    pub row: usize,
    pub col: usize,
    pub original: String,
    pub buffer: String,
}

impl Mode {
    pub fn is_editing(&self) -> bool {
        matches!(self, Mode::Editing(_))
    }

    pub fn edit(&self) -> Option<&EditState> {
        match self {
            Mode::Editing(state) => Some(state),
            Mode::Idle => None,
        }
    }

    pub fn edit_mut(&mut self) -> Option<&mut EditState> {
        match self {
            Mode::Editing(state) => Some(state),
            Mode::Idle => None,
        }
    }

    /// Leave edit mode, returning the edit that was in progress.
    pub fn take_edit(&mut self) -> Option<EditState> {
        match std::mem::take(self) {
            Mode::Editing(state) => Some(state),
            Mode::Idle => None,
        }
    }
}
