// Built-in spreadsheet functions

use super::eval::{to_number, Arg};
use super::{CellError, Value};

pub fn call(name: &str, args: &[Arg]) -> Value {
    let result = match name {
        "SUM" => collect_numbers(args).map(|vals| vals.iter().sum()),
        "AVERAGE" | "AVG" => collect_numbers(args).and_then(|vals| {
            if vals.is_empty() {
                Err(CellError::DivZero)
            } else {
                Ok(vals.iter().sum::<f64>() / vals.len() as f64)
            }
        }),
        "MIN" => collect_numbers(args)
            .map(|vals| vals.into_iter().reduce(f64::min).unwrap_or(0.0)),
        "MAX" => collect_numbers(args)
            .map(|vals| vals.into_iter().reduce(f64::max).unwrap_or(0.0)),
        "COUNT" => Ok(count_numbers(args) as f64),
        "ABS" => single_number(args).map(f64::abs),
        "ROUND" => round(args),
        _ => Err(CellError::Name),
    };
    match result {
        Ok(n) => Value::Number(n),
        Err(e) => Value::Error(e),
    }
}

/// Numbers from every argument. Inside ranges, text and empty cells are
/// skipped; a direct text argument must parse as a number.
fn collect_numbers(args: &[Arg]) -> Result<Vec<f64>, CellError> {
    let mut out = Vec::new();
    for arg in args {
        match arg {
            Arg::Single(Value::Empty) => {}
            Arg::Single(v) => out.push(to_number(v)?),
            Arg::Range(values) => {
                for v in values {
                    match v {
                        Value::Number(n) => out.push(*n),
                        Value::Error(e) => return Err(*e),
                        Value::Empty | Value::Text(_) => {}
                    }
                }
            }
        }
    }
    Ok(out)
}

fn count_numbers(args: &[Arg]) -> usize {
    args.iter()
        .map(|arg| match arg {
            Arg::Single(v) => usize::from(matches!(v, Value::Number(_))),
            Arg::Range(values) => values
                .iter()
                .filter(|v| matches!(v, Value::Number(_)))
                .count(),
        })
        .sum()
}

fn scalar(arg: &Arg) -> Result<f64, CellError> {
    match arg {
        Arg::Single(v) => to_number(v),
        Arg::Range(_) => Err(CellError::Value),
    }
}

fn single_number(args: &[Arg]) -> Result<f64, CellError> {
    match args {
        [arg] => scalar(arg),
        _ => Err(CellError::Value),
    }
}

fn round(args: &[Arg]) -> Result<f64, CellError> {
    let (value, digits) = match args {
        [v] => (scalar(v)?, 0.0),
        [v, d] => (scalar(v)?, scalar(d)?.trunc()),
        _ => return Err(CellError::Value),
    };
    let factor = 10f64.powi(digits as i32);
    Ok((value * factor).round() / factor)
}
