// Formula parsing, evaluation, and reference translation

pub mod eval;
pub mod functions;
pub mod parser;
pub mod refs;

use std::fmt;

pub use eval::{evaluate, evaluate_cell, CellLookup, Evaluator, FnLookup};
pub use parser::{parse, Expr, Op};
pub use refs::translate_formula;

/// Error sentinels shown in place of a value. Never propagated as a Rust error
/// out of a mutation; they are ordinary values at the display boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellError {
    /// Formula text could not be parsed
    Parse,
    DivZero,
    /// Evaluation reached a cell that is already being evaluated
    Circular,
    /// Reference chain deeper than the evaluator allows
    Ref,
    Value,
    Name,
    Num,
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CellError::Parse => "#ERR",
            CellError::DivZero => "#DIV/0!",
            CellError::Circular => "#CIRC",
            CellError::Ref => "#REF!",
            CellError::Value => "#VALUE!",
            CellError::Name => "#NAME?",
            CellError::Num => "#NUM!",
        };
        f.write_str(s)
    }
}

/// Result of evaluating a raw cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Empty,
    Number(f64),
    Text(String),
    Error(CellError),
}

impl Value {
    /// Interpret a literal (non-formula) raw value.
    pub fn from_literal(raw: &str) -> Self {
        if raw.is_empty() {
            return Value::Empty;
        }
        match crate::format::parse_number(raw) {
            Some(n) => Value::Number(n),
            None => Value::Text(raw.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }
}

/// Parse failure with a human-readable reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaError {
    pub message: String,
}

impl FormulaError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "formula error: {}", self.message)
    }
}

impl std::error::Error for FormulaError {}
