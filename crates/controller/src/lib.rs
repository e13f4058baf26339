//! Interactive layer over a workbook: selection, edit mode, gestures,
//! keyboard dispatch, clipboard and debounced persistence.

pub mod autosave;
pub mod clipboard;
mod commands;
pub mod controller;
mod editing;
pub mod gesture;
pub mod keys;
pub mod mode;
mod navigation;
pub mod persist;

pub use autosave::{Clock, Debouncer, ManualClock, RealClock};
pub use clipboard::{ClipboardError, ClipboardProvider, MemoryClipboard};
pub use controller::SheetController;
pub use gesture::Gesture;
pub use keys::{Key, KeyEvent, KeyOutcome, Modifiers};
pub use mode::{EditState, Mode};
pub use persist::{DocumentStore, MemoryStore, PersistError};
