//! Canonical text form of expression trees.
//!
//! The output parses back to an equal tree: strings are re-escaped and
//! integral doubles keep a `.0` so they are not read back as integers.

use std::fmt;

use crate::parser::{Expression, FunctionCall};

/// Escape a string so the lexer reads it back unchanged.
pub fn escape_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len() + 2);
    escaped.push('"');
    for c in s.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped.push('"');
    escaped
}

pub fn format_double(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::FunctionCall(call) => write!(f, "{call}"),
            Expression::Identifier(name) => f.write_str(name),
            Expression::String(text) => f.write_str(&escape_string(text)),
            Expression::Integer(value) => write!(f, "{value}"),
            Expression::Double(value) => f.write_str(&format_double(*value)),
        }
    }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.function.name)?;
        for argument in &self.arguments {
            write!(f, " {argument}")?;
        }
        write!(f, ")")
    }
}
