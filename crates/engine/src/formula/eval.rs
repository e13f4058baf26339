// Formula evaluator - resolves references through a CellLookup, never mutates

use std::borrow::Cow;

use rustc_hash::FxHashSet;

use super::functions;
use super::parser::{parse, Expr, Op};
use super::{CellError, Value};
use crate::format::{format_general, parse_number};

/// Reference chains longer than this evaluate to `#REF!` instead of
/// exhausting the stack.
const MAX_DEPTH: usize = 256;

/// Read access to raw cell input. Implemented by `Sheet`; tests and callers
/// without a sheet can wrap a closure in [`FnLookup`].
pub trait CellLookup {
    fn raw_value(&self, row: usize, col: usize) -> Cow<'_, str>;
}

/// Adapts a `(row, col) -> raw` closure into a [`CellLookup`].
pub struct FnLookup<F>(pub F);

impl<F: Fn(usize, usize) -> String> CellLookup for FnLookup<F> {
    fn raw_value(&self, row: usize, col: usize) -> Cow<'_, str> {
        Cow::Owned((self.0)(row, col))
    }
}

/// Evaluate a raw value that does not live at a known cell.
pub fn evaluate<L: CellLookup + ?Sized>(raw: &str, lookup: &L) -> Value {
    Evaluator::new(lookup).eval_raw(raw)
}

/// Evaluate the cell at `(row, col)`. A formula that reaches its own cell
/// evaluates to `#CIRC`.
pub fn evaluate_cell<L: CellLookup + ?Sized>(row: usize, col: usize, lookup: &L) -> Value {
    Evaluator::new(lookup).cell_value(row, col)
}

/// One evaluation pass. Tracks the cells currently being evaluated so a
/// reference cycle is detected instead of recursing forever.
pub struct Evaluator<'a, L: CellLookup + ?Sized> {
    lookup: &'a L,
    in_progress: FxHashSet<(usize, usize)>,
}

impl<'a, L: CellLookup + ?Sized> Evaluator<'a, L> {
    pub fn new(lookup: &'a L) -> Self {
        Self {
            lookup,
            in_progress: FxHashSet::default(),
        }
    }

    pub fn eval_raw(&mut self, raw: &str) -> Value {
        if !raw.starts_with('=') {
            return Value::from_literal(raw);
        }
        match parse(raw) {
            Ok(expr) => finish(self.eval(&expr)),
            Err(_) => Value::Error(CellError::Parse),
        }
    }

    pub fn cell_value(&mut self, row: usize, col: usize) -> Value {
        if self.in_progress.contains(&(row, col)) {
            return Value::Error(CellError::Circular);
        }
        if self.in_progress.len() >= MAX_DEPTH {
            return Value::Error(CellError::Ref);
        }
        let lookup = self.lookup;
        let raw = lookup.raw_value(row, col);
        if !raw.starts_with('=') {
            return Value::from_literal(&raw);
        }
        self.in_progress.insert((row, col));
        let value = self.eval_raw(&raw);
        self.in_progress.remove(&(row, col));
        value
    }

    fn eval(&mut self, expr: &Expr) -> Value {
        match expr {
            Expr::Number(n) => Value::Number(*n),
            Expr::Text(s) => Value::Text(s.clone()),
            Expr::CellRef { row, col } => self.cell_value(*row, *col),
            // A bare range only makes sense as a function argument
            Expr::Range { .. } => Value::Error(CellError::Value),
            Expr::Neg(inner) => match to_number(&self.eval(inner)) {
                Ok(n) => Value::Number(-n),
                Err(e) => Value::Error(e),
            },
            Expr::BinaryOp { op, left, right } => {
                let l = self.eval(left);
                let r = self.eval(right);
                binary(*op, &l, &r)
            }
            Expr::Function { name, args } => {
                let mut evaluated = Vec::with_capacity(args.len());
                for arg in args {
                    evaluated.push(self.eval_arg(arg));
                }
                functions::call(name, &evaluated)
            }
        }
    }

    fn eval_arg(&mut self, expr: &Expr) -> Arg {
        match expr {
            Expr::Range { start_row, start_col, end_row, end_col } => {
                let mut values = Vec::new();
                for r in *start_row..=*end_row {
                    for c in *start_col..=*end_col {
                        values.push(self.cell_value(r, c));
                    }
                }
                Arg::Range(values)
            }
            other => Arg::Single(self.eval(other)),
        }
    }
}

/// A function argument: a single value, or every cell of a range in
/// row-major order.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Single(Value),
    Range(Vec<Value>),
}

/// Coerce for arithmetic: empty is 0, numeric text parses, other text is `#VALUE!`.
pub(crate) fn to_number(value: &Value) -> Result<f64, CellError> {
    match value {
        Value::Empty => Ok(0.0),
        Value::Number(n) => Ok(*n),
        Value::Text(s) => parse_number(s).ok_or(CellError::Value),
        Value::Error(e) => Err(*e),
    }
}

fn to_text(value: &Value) -> Result<String, CellError> {
    match value {
        Value::Empty => Ok(String::new()),
        Value::Number(n) => Ok(format_general(*n)),
        Value::Text(s) => Ok(s.clone()),
        Value::Error(e) => Err(*e),
    }
}

fn binary(op: Op, left: &Value, right: &Value) -> Value {
    let apply: fn(f64, f64) -> Value = match op {
        Op::Concat => {
            return match (to_text(left), to_text(right)) {
                (Ok(l), Ok(r)) => Value::Text(l + &r),
                (Err(e), _) | (_, Err(e)) => Value::Error(e),
            };
        }
        Op::Add => |l, r| Value::Number(l + r),
        Op::Sub => |l, r| Value::Number(l - r),
        Op::Mul => |l, r| Value::Number(l * r),
        Op::Div => |l, r| {
            if r == 0.0 {
                Value::Error(CellError::DivZero)
            } else {
                Value::Number(l / r)
            }
        },
        Op::Pow => |l, r| Value::Number(l.powf(r)),
    };
    match (to_number(left), to_number(right)) {
        (Ok(l), Ok(r)) => apply(l, r),
        (Err(e), _) | (_, Err(e)) => Value::Error(e),
    }
}

fn finish(value: Value) -> Value {
    match value {
        Value::Number(n) if !n.is_finite() => Value::Error(CellError::Num),
        other => other,
    }
}
