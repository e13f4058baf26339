// Formula parser - converts formula strings into AST
// Supports: numbers, "text", cell refs (A1, $A$1), ranges (A1:B5), functions (SUM),
// arithmetic (+, -, *, /, ^), concatenation (&), unary minus, parentheses

use super::FormulaError;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Text(String),
    CellRef { row: usize, col: usize },
    Range {
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
    },
    Function {
        name: String,
        args: Vec<Expr>,
    },
    Neg(Box<Expr>),
    BinaryOp {
        op: Op,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Concat,
}

/// Parse a formula. The leading `=` is required.
pub fn parse(formula: &str) -> Result<Expr, FormulaError> {
    let formula = formula.trim();
    let input = formula
        .strip_prefix('=')
        .ok_or_else(|| FormulaError::new("formula must start with ="))?;
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(FormulaError::new("empty formula"));
    }
    let (expr, pos) = parse_concat(&tokens, 0)?;
    if pos != tokens.len() {
        return Err(FormulaError::new(format!("unexpected token at position {}", pos)));
    }
    Ok(expr)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Text(String),
    CellRef { row: usize, col: usize },
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Amp,
    LParen,
    RParen,
    Colon,
    Comma,
}

fn tokenize(input: &str) -> Result<Vec<Token>, FormulaError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => { chars.next(); }
            '+' => { tokens.push(Token::Plus); chars.next(); }
            '-' => { tokens.push(Token::Minus); chars.next(); }
            '*' => { tokens.push(Token::Star); chars.next(); }
            '/' => { tokens.push(Token::Slash); chars.next(); }
            '^' => { tokens.push(Token::Caret); chars.next(); }
            '&' => { tokens.push(Token::Amp); chars.next(); }
            '(' => { tokens.push(Token::LParen); chars.next(); }
            ')' => { tokens.push(Token::RParen); chars.next(); }
            ':' => { tokens.push(Token::Colon); chars.next(); }
            ',' => { tokens.push(Token::Comma); chars.next(); }
            '"' => {
                chars.next();
                let mut text = String::new();
                let mut closed = false;
                while let Some(ch) = chars.next() {
                    if ch == '"' {
                        // "" inside a string is an escaped quote
                        if chars.peek() == Some(&'"') {
                            text.push('"');
                            chars.next();
                        } else {
                            closed = true;
                            break;
                        }
                    } else {
                        text.push(ch);
                    }
                }
                if !closed {
                    return Err(FormulaError::new("unterminated string"));
                }
                tokens.push(Token::Text(text));
            }
            'A'..='Z' | 'a'..='z' | '$' => {
                // Could be cell reference (A1, $B$2) or function name (SUM)
                let mut word = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_ascii_alphanumeric() || ch == '$' || ch == '_' || ch == '.' {
                        word.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }

                if let Some((row, col)) = parse_ref_word(&word) {
                    tokens.push(Token::CellRef { row, col });
                } else if word.contains('$') {
                    return Err(FormulaError::new(format!("invalid reference: {}", word)));
                } else {
                    tokens.push(Token::Ident(word.to_uppercase()));
                }
            }
            '0'..='9' | '.' => {
                let mut num_str = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        num_str.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                // Exponent part: 1e5, 2.5E-3
                if matches!(chars.peek(), Some('e') | Some('E')) {
                    let mut lookahead = chars.clone();
                    lookahead.next();
                    let mut exp = String::from("e");
                    if let Some(&sign) = lookahead.peek() {
                        if sign == '+' || sign == '-' {
                            exp.push(sign);
                            lookahead.next();
                        }
                    }
                    if lookahead.peek().is_some_and(|d| d.is_ascii_digit()) {
                        while let Some(&d) = lookahead.peek() {
                            if !d.is_ascii_digit() {
                                break;
                            }
                            exp.push(d);
                            lookahead.next();
                        }
                        num_str.push_str(&exp);
                        chars = lookahead;
                    }
                }
                let num: f64 = num_str
                    .parse()
                    .map_err(|_| FormulaError::new(format!("invalid number: {}", num_str)))?;
                tokens.push(Token::Number(num));
            }
            _ => return Err(FormulaError::new(format!("unexpected character: {}", c))),
        }
    }

    Ok(tokens)
}

/// `B7`, `$B7`, `B$7`, `$B$7` -> (row, col), 0-based
fn parse_ref_word(word: &str) -> Option<(usize, usize)> {
    let body = word.strip_prefix('$').unwrap_or(word);
    let split = body.find(|c: char| !c.is_ascii_alphabetic())?;
    let (letters, rest) = body.split_at(split);
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }
    let digits = rest.strip_prefix('$').unwrap_or(rest);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let col = sheetgrid_core::letters_to_col(letters)?;
    let row: usize = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row - 1, col))
}

fn parse_concat(tokens: &[Token], pos: usize) -> Result<(Expr, usize), FormulaError> {
    let (mut left, mut pos) = parse_add_sub(tokens, pos)?;

    while let Some(Token::Amp) = tokens.get(pos) {
        let (right, new_pos) = parse_add_sub(tokens, pos + 1)?;
        left = Expr::BinaryOp {
            op: Op::Concat,
            left: Box::new(left),
            right: Box::new(right),
        };
        pos = new_pos;
    }

    Ok((left, pos))
}

fn parse_add_sub(tokens: &[Token], pos: usize) -> Result<(Expr, usize), FormulaError> {
    let (mut left, mut pos) = parse_mul_div(tokens, pos)?;

    while pos < tokens.len() {
        let op = match &tokens[pos] {
            Token::Plus => Op::Add,
            Token::Minus => Op::Sub,
            _ => break,
        };
        let (right, new_pos) = parse_mul_div(tokens, pos + 1)?;
        left = Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        };
        pos = new_pos;
    }

    Ok((left, pos))
}

fn parse_mul_div(tokens: &[Token], pos: usize) -> Result<(Expr, usize), FormulaError> {
    let (mut left, mut pos) = parse_power(tokens, pos)?;

    while pos < tokens.len() {
        let op = match &tokens[pos] {
            Token::Star => Op::Mul,
            Token::Slash => Op::Div,
            _ => break,
        };
        let (right, new_pos) = parse_power(tokens, pos + 1)?;
        left = Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        };
        pos = new_pos;
    }

    Ok((left, pos))
}

fn parse_power(tokens: &[Token], pos: usize) -> Result<(Expr, usize), FormulaError> {
    let (mut left, mut pos) = parse_unary(tokens, pos)?;

    while let Some(Token::Caret) = tokens.get(pos) {
        let (right, new_pos) = parse_unary(tokens, pos + 1)?;
        left = Expr::BinaryOp {
            op: Op::Pow,
            left: Box::new(left),
            right: Box::new(right),
        };
        pos = new_pos;
    }

    Ok((left, pos))
}

fn parse_unary(tokens: &[Token], pos: usize) -> Result<(Expr, usize), FormulaError> {
    match tokens.get(pos) {
        Some(Token::Minus) => {
            let (expr, pos) = parse_unary(tokens, pos + 1)?;
            Ok((Expr::Neg(Box::new(expr)), pos))
        }
        Some(Token::Plus) => parse_unary(tokens, pos + 1),
        _ => parse_primary(tokens, pos),
    }
}

fn parse_primary(tokens: &[Token], pos: usize) -> Result<(Expr, usize), FormulaError> {
    let Some(token) = tokens.get(pos) else {
        return Err(FormulaError::new("unexpected end of expression"));
    };

    match token {
        Token::Number(n) => Ok((Expr::Number(*n), pos + 1)),
        Token::Text(s) => Ok((Expr::Text(s.clone()), pos + 1)),
        Token::CellRef { row, col } => {
            // Check if this is a range (A1:B5)
            if let (Some(Token::Colon), Some(Token::CellRef { row: end_row, col: end_col })) =
                (tokens.get(pos + 1), tokens.get(pos + 2))
            {
                return Ok((
                    Expr::Range {
                        start_row: (*row).min(*end_row),
                        start_col: (*col).min(*end_col),
                        end_row: (*row).max(*end_row),
                        end_col: (*col).max(*end_col),
                    },
                    pos + 3,
                ));
            }
            Ok((Expr::CellRef { row: *row, col: *col }, pos + 1))
        }
        Token::Ident(name) => {
            if let Some(Token::LParen) = tokens.get(pos + 1) {
                let (args, new_pos) = parse_function_args(tokens, pos + 2)?;
                return Ok((
                    Expr::Function {
                        name: name.clone(),
                        args,
                    },
                    new_pos,
                ));
            }
            Err(FormulaError::new(format!("unknown identifier: {}", name)))
        }
        Token::LParen => {
            let (expr, pos) = parse_concat(tokens, pos + 1)?;
            match tokens.get(pos) {
                Some(Token::RParen) => Ok((expr, pos + 1)),
                Some(_) => Err(FormulaError::new("expected closing parenthesis")),
                None => Err(FormulaError::new("missing closing parenthesis")),
            }
        }
        _ => Err(FormulaError::new(format!("unexpected token at position {}", pos))),
    }
}

fn parse_function_args(tokens: &[Token], pos: usize) -> Result<(Vec<Expr>, usize), FormulaError> {
    let mut args = Vec::new();
    let mut pos = pos;

    // Handle empty function call SUM()
    if let Some(Token::RParen) = tokens.get(pos) {
        return Ok((args, pos + 1));
    }

    loop {
        let (arg, new_pos) = parse_concat(tokens, pos)?;
        args.push(arg);
        pos = new_pos;

        match tokens.get(pos) {
            Some(Token::RParen) => return Ok((args, pos + 1)),
            Some(Token::Comma) => pos += 1,
            Some(_) => return Err(FormulaError::new("expected comma or closing parenthesis")),
            None => return Err(FormulaError::new("missing closing parenthesis in function call")),
        }
    }
}
