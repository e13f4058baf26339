// Keyboard input as seen by the controller

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Escape,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    F2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub control: bool,
    pub alt: bool,
    pub shift: bool,
    pub platform: bool, // Cmd on macOS
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        control: false,
        alt: false,
        shift: false,
        platform: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn command() -> Self {
        Self {
            control: true,
            ..Self::NONE
        }
    }

    pub fn command_shift() -> Self {
        Self {
            control: true,
            shift: true,
            ..Self::NONE
        }
    }

    /// Ctrl or Cmd
    pub fn is_command(&self) -> bool {
        self.control || self.platform
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    /// Lowercased character for shortcut matching.
    pub fn shortcut_char(&self) -> Option<char> {
        match self.key {
            Key::Char(c) => Some(c.to_ascii_lowercase()),
            _ => None,
        }
    }
}

/// What the host should do after a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Event consumed by the grid
    Consumed,
    /// Not ours; let the focused text field or the host handle it
    NotConsumed,
    /// Ctrl/Cmd+F or +H: the host opens its find/replace panel
    OpenFindReplace,
}
