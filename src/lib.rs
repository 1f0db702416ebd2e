//! Parse and evaluate small symbolic expressions.
//!
//! Input is read from one or more named sources that are lexed as a single
//! stream. Expressions are literals (identifiers, strings, integers,
//! doubles) or calls of the form `(name arg...)`, where each function in the
//! [`FunctionTable`] declares the argument types it accepts:
//!
//! ```rust
//! use sexpr_eval::evaluate;
//!
//! assert_eq!(evaluate("example", "(+ 1.0 2.5)").unwrap(), "3.500000");
//! assert_eq!(evaluate("example", "-5").unwrap(), "-5");
//! ```

pub mod error;
pub mod eval;
pub mod functions;
pub mod lexer;
pub mod parser;
pub mod request;
pub mod source;
pub mod textify;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export commonly used types for easier access
pub use error::Error;
pub use functions::{Function, FunctionTable, FunctionType, Quantity};
pub use lexer::{LexError, Lexer, Token, TokenKind};
pub use parser::{Expression, ExpressionType, ParseError, Parser};
pub use source::{Location, Source};

/// Parse a single expression from inline text.
///
/// The whole input must be one expression; anything after it is an error.
/// `name` is the source name used in error locations.
///
/// # Example
/// ```rust
/// use sexpr_eval::{parse, Expression};
///
/// let expr = parse("input", "(+ 1.0 2.0)").unwrap();
/// assert!(matches!(expr, Expression::FunctionCall(_)));
///
/// let err = parse("input", "(foo 1)").unwrap_err();
/// assert_eq!(err.to_string(), "input:1:2: Unknown function 'foo'");
/// ```
pub fn parse(name: &str, input: &str) -> Result<Expression, ParseError> {
    Parser::new(Lexer::from_named(name, input)).parse_all()
}

/// Parse a single expression from inline text and evaluate it.
pub fn evaluate(name: &str, input: &str) -> Result<String, ParseError> {
    parse(name, input).map(|expr| expr.eval())
}
