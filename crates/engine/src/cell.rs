use serde::{Deserialize, Serialize};

/// Display format applied to a cell's value
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CellFormat {
    #[default]
    Plain,
    Number,
    Currency,
    Percent,
    Date,
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Per-side border flags
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(default)]
pub struct Borders {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Borders {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Everything stored for one cell. The all-default value is an empty cell
/// and is never kept in a [`CellStore`](crate::store::CellStore).
///
/// `value` holds the raw user input; a leading `=` marks a formula.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct CellData {
    pub value: String,
    #[serde(skip_serializing_if = "is_plain")]
    pub format: CellFormat,
    #[serde(skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "is_left")]
    pub align: Alignment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(skip_serializing_if = "Borders::is_empty")]
    pub borders: Borders,
}

fn is_plain(f: &CellFormat) -> bool {
    *f == CellFormat::Plain
}

fn is_left(a: &Alignment) -> bool {
    *a == Alignment::Left
}

impl CellData {
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn is_formula(&self) -> bool {
        self.value.starts_with('=')
    }

    /// True when this cell carries nothing worth storing.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Copy of this cell with the value dropped and all styling kept.
    pub fn style_only(&self) -> Self {
        Self {
            value: String::new(),
            ..self.clone()
        }
    }
}

/// Boolean text styles toggled from the keyboard and toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Bold,
    Italic,
    Underline,
    Strikethrough,
}

impl TextStyle {
    pub fn get(self, cell: &CellData) -> bool {
        match self {
            TextStyle::Bold => cell.bold,
            TextStyle::Italic => cell.italic,
            TextStyle::Underline => cell.underline,
            TextStyle::Strikethrough => cell.strikethrough,
        }
    }

    pub fn set(self, cell: &mut CellData, on: bool) {
        match self {
            TextStyle::Bold => cell.bold = on,
            TextStyle::Italic => cell.italic = on,
            TextStyle::Underline => cell.underline = on,
            TextStyle::Strikethrough => cell.strikethrough = on,
        }
    }
}
