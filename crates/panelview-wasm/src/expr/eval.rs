//! Arithmetic evaluator for coordinate formulas.
//!
//! Input is normalised (decimal comma, negated literals, `L`/`W` substitution,
//! sanitising) and then parsed by a small recursive-descent parser that only
//! understands numbers, `+ - * /` and parentheses.

use crate::error::ExprError;

const MAX_NESTING: u32 = 200;

/// Evaluates a coordinate formula against the panel length and width.
///
/// Never fails: empty input, garbage, malformed formulas and division by
/// zero all evaluate to `0.0`.
pub fn evaluate(expr: &str, length: f64, width: f64) -> f64 {
    try_evaluate(expr, length, width).unwrap_or(0.0)
}

/// Evaluates a coordinate formula, reporting why it could not be evaluated.
///
/// Empty (or whitespace-only) input is `Ok(0.0)`.
///
/// # Errors
///
/// Returns an [`ExprError`] for malformed expressions and division by zero.
pub fn try_evaluate(expr: &str, length: f64, width: f64) -> Result<f64, ExprError> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Ok(0.0);
    }

    let normalized = normalize(expr, length, width);
    let tokens = tokenize(&normalized)?;
    let (value, rest) = parse_additive(&tokens, 0)?;
    if rest.is_empty() {
        Ok(value)
    } else if matches!(rest.first(), Some(Token::RParen)) {
        Err(ExprError::UnbalancedParentheses)
    } else {
        Err(ExprError::TrailingInput)
    }
}

/// Rewrites raw field text into an arithmetic-only string.
fn normalize(expr: &str, length: f64, width: f64) -> String {
    let dotted = expr.replace(',', ".");
    let unwrapped = unwrap_negated_literals(&dotted);
    let substituted = unwrapped
        .replace('L', &length.to_string())
        .replace('W', &width.to_string());
    substituted
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | '*' | '/' | '(' | ')' | ' '))
        .collect()
}

/// Turns `-(12.5)` (with optional spaces after the minus) into `- 12.5`.
///
/// Must run before symbol substitution so a parenthesised literal is not
/// mistaken for part of a formula.
fn unwrap_negated_literals(expr: &str) -> String {
    let mut out = String::with_capacity(expr.len());
    let mut rest = expr;

    while let Some(pos) = rest.find('-') {
        let (head, tail) = rest.split_at(pos);
        out.push_str(head);
        let after_minus = tail.strip_prefix('-').unwrap_or(tail);

        if let Some((literal, remainder)) = parenthesised_literal(after_minus) {
            out.push_str("- ");
            out.push_str(literal);
            rest = remainder;
        } else {
            out.push('-');
            rest = after_minus;
        }
    }

    out.push_str(rest);
    out
}

/// Matches `\s*(<digits and dots>)` at the start of `text`.
fn parenthesised_literal(text: &str) -> Option<(&str, &str)> {
    let body = text.trim_start().strip_prefix('(')?;
    let len = body
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(body.len());
    if len == 0 {
        return None;
    }
    let (literal, after) = body.split_at(len);
    let remainder = after.strip_prefix(')')?;
    Some((literal, remainder))
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Op(char),
    LParen,
    RParen,
}

fn tokenize(expr: &str) -> Result<Vec<Token>, ExprError> {
    let mut tokens = Vec::new();
    let mut chars = expr.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ' ' => {}
            '+' | '-' | '*' | '/' => tokens.push(Token::Op(c)),
            '(' => tokens.push(Token::LParen),
            ')' => tokens.push(Token::RParen),
            '0'..='9' | '.' => {
                let mut num = String::from(c);
                while let Some(&p) = chars.peek() {
                    if p.is_ascii_digit() || p == '.' {
                        chars.next();
                        num.push(p);
                    } else {
                        break;
                    }
                }
                let v: f64 = num
                    .parse()
                    .map_err(|_| ExprError::InvalidNumber(num.clone()))?;
                tokens.push(Token::Number(v));
            }
            _ => return Err(ExprError::UnexpectedCharacter(c)),
        }
    }

    Ok(tokens)
}

fn parse_additive(tokens: &[Token], depth: u32) -> Result<(f64, &[Token]), ExprError> {
    let (mut left, mut rest) = parse_multiplicative(tokens, depth)?;

    while let Some((op, tail)) = match rest.first() {
        Some(Token::Op(op @ ('+' | '-'))) => rest.get(1..).map(|t| (*op, t)),
        _ => None,
    } {
        let (right, new_rest) = parse_multiplicative(tail, depth)?;
        left = if op == '+' { left + right } else { left - right };
        rest = new_rest;
    }

    Ok((left, rest))
}

fn parse_multiplicative(tokens: &[Token], depth: u32) -> Result<(f64, &[Token]), ExprError> {
    let (mut left, mut rest) = parse_unary(tokens, depth)?;

    while let Some((op, tail)) = match rest.first() {
        Some(Token::Op(op @ ('*' | '/'))) => rest.get(1..).map(|t| (*op, t)),
        _ => None,
    } {
        let (right, new_rest) = parse_unary(tail, depth)?;
        left = if op == '*' {
            left * right
        } else if right == 0.0 {
            return Err(ExprError::DivisionByZero);
        } else {
            left / right
        };
        rest = new_rest;
    }

    Ok((left, rest))
}

/// Every sign and every `(` counts as one level of nesting.
fn deeper(depth: u32) -> Result<u32, ExprError> {
    let depth = depth + 1;
    if depth > MAX_NESTING {
        Err(ExprError::NestingTooDeep(MAX_NESTING))
    } else {
        Ok(depth)
    }
}

fn parse_unary(tokens: &[Token], depth: u32) -> Result<(f64, &[Token]), ExprError> {
    let tail = tokens.get(1..).unwrap_or_default();
    match tokens.first() {
        Some(Token::Op(sign @ ('+' | '-'))) => {
            let (v, rest) = parse_unary(tail, deeper(depth)?)?;
            Ok((if *sign == '-' { -v } else { v }, rest))
        }
        Some(Token::LParen) => {
            let (v, rest) = parse_additive(tail, deeper(depth)?)?;
            match rest.first() {
                Some(Token::RParen) => Ok((v, rest.get(1..).unwrap_or_default())),
                _ => Err(ExprError::UnbalancedParentheses),
            }
        }
        Some(Token::Number(n)) => Ok((*n, tail)),
        Some(Token::Op(c)) => Err(ExprError::UnexpectedCharacter(*c)),
        Some(Token::RParen) => Err(ExprError::UnbalancedParentheses),
        None => Err(ExprError::UnexpectedEnd),
    }
}
