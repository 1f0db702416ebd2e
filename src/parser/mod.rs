//! Recursive-descent parser for the expression language.
//!
//! ```text
//! expr := identifier | string | integer | double | call
//! call := '(' identifier expr* ')'
//! ```
//!
//! Every parse is speculative: [`Parser::parse_expression`] restores the
//! cursor to where it started whenever it fails, so callers can try another
//! production on the same input.

mod ast;

use std::fmt;

use log::{debug, trace};
use thiserror::Error;

pub use ast::{Expression, ExpressionType, FunctionCall};

use crate::functions::{FunctionTable, FunctionType, Quantity};
use crate::lexer::{LexError, Lexer, SpannedToken, Token, TokenKind};
use crate::source::{Cursor, Location};

/// How deeply calls may nest before parsing fails with
/// [`ParseErrorKind::TooDeep`].
pub const MAX_DEPTH: usize = 128;

/// Broad classification of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Lexical,
    Syntax,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Lexical => write!(f, "lexical"),
            ErrorCategory::Syntax => write!(f, "syntax"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("{0}")]
    Lexical(#[from] LexError),
    #[error("no token found")]
    NoToken,
    #[error("Expected {expected}, got {}", found_text(.found))]
    Expected {
        expected: TokenKind,
        found: Option<TokenKind>,
    },
    #[error("Unknown function '{0}'")]
    UnknownFunction(String),
    #[error("unclosed parens")]
    UnclosedParens,
    #[error("invalid types, unexpected {0}")]
    UnexpectedArgument(ExpressionType),
    #[error("{0} quantity is not yet supported")]
    UnsupportedQuantity(Quantity),
    #[error("Expected end of input, got {0}")]
    TrailingInput(TokenKind),
    #[error("calls nested more than {0} deep")]
    TooDeep(usize),
}

fn found_text(found: &Option<TokenKind>) -> String {
    match found {
        Some(kind) => kind.to_string(),
        None => "nothing".to_string(),
    }
}

/// A parse failure and the location of the token that caused it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{location}: {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub location: Location,
}

impl ParseError {
    pub fn category(&self) -> ErrorCategory {
        match self.kind {
            ParseErrorKind::Lexical(_) => ErrorCategory::Lexical,
            _ => ErrorCategory::Syntax,
        }
    }
}

/// Parses expressions from a [`Lexer`], checking calls against a
/// [`FunctionTable`].
pub struct Parser<'t> {
    lexer: Lexer,
    functions: &'t FunctionTable,
    /// Calls currently open.
    depth: usize,
}

impl Parser<'static> {
    /// A parser using the built-in functions.
    pub fn new(lexer: Lexer) -> Self {
        Self::with_functions(lexer, FunctionTable::builtin())
    }
}

impl<'t> Parser<'t> {
    pub fn with_functions(lexer: Lexer, functions: &'t FunctionTable) -> Self {
        Self {
            lexer,
            functions,
            depth: 0,
        }
    }

    pub fn lexer(&self) -> &Lexer {
        &self.lexer
    }

    pub fn into_lexer(self) -> Lexer {
        self.lexer
    }

    fn error_at(&self, cursor: Cursor, kind: ParseErrorKind) -> ParseError {
        ParseError {
            kind,
            location: self.lexer.location(cursor),
        }
    }

    fn error_here(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            kind,
            location: self.lexer.here(),
        }
    }

    /// Parse one expression.
    ///
    /// On failure the cursor is back where it was on entry.
    pub fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        let saved = self.lexer.save();
        let result = self.expression();
        if let Err(e) = &result {
            debug!("Parse failed, rolling back: {e}");
            self.lexer.restore(saved);
        }
        result
    }

    /// Require that nothing but whitespace remains.
    pub fn expect_end(&mut self) -> Result<(), ParseError> {
        match self.lexer.peek_token() {
            None => Ok(()),
            Some(SpannedToken { token, start }) => {
                Err(self.error_at(start, ParseErrorKind::TrailingInput(token.kind())))
            }
        }
    }

    /// Parse one expression that must make up the whole input.
    pub fn parse_all(&mut self) -> Result<Expression, ParseError> {
        let expression = self.parse_expression()?;
        self.expect_end()?;
        Ok(expression)
    }

    fn expression(&mut self) -> Result<Expression, ParseError> {
        let Some(SpannedToken { token, start }) = self.lexer.next_token() else {
            return Err(self.error_here(ParseErrorKind::NoToken));
        };
        match token {
            Token::Identifier(name) => return Ok(Expression::Identifier(name)),
            Token::String(text) => return Ok(Expression::String(text)),
            Token::Integer(value) => return Ok(Expression::Integer(value)),
            Token::Double(value) => return Ok(Expression::Double(value)),
            Token::OpenParen => {}
            Token::Error(e) => return Err(self.error_at(start, e.into())),
            other => {
                return Err(self.error_at(
                    start,
                    ParseErrorKind::Expected {
                        expected: TokenKind::OpenParen,
                        found: Some(other.kind()),
                    },
                ));
            }
        }

        if self.depth >= MAX_DEPTH {
            return Err(self.error_at(start, ParseErrorKind::TooDeep(MAX_DEPTH)));
        }
        self.depth += 1;
        let result = self.call();
        self.depth -= 1;
        result
    }

    /// The rest of a call, after its `(`.
    fn call(&mut self) -> Result<Expression, ParseError> {
        let (name, name_start) = match self.lexer.next_token() {
            Some(SpannedToken {
                token: Token::Identifier(name),
                start,
            }) => (name, start),
            Some(SpannedToken {
                token: Token::Error(e),
                start,
            }) => return Err(self.error_at(start, e.into())),
            Some(SpannedToken { token, start }) => {
                return Err(self.error_at(
                    start,
                    ParseErrorKind::Expected {
                        expected: TokenKind::Identifier,
                        found: Some(token.kind()),
                    },
                ));
            }
            None => {
                return Err(self.error_here(ParseErrorKind::Expected {
                    expected: TokenKind::Identifier,
                    found: None,
                }));
            }
        };

        let Some(function) = self.functions.lookup(&name).copied() else {
            return Err(self.error_at(name_start, ParseErrorKind::UnknownFunction(name)));
        };

        let mut arguments = Vec::new();
        for entry in function.profile {
            match entry.quantity {
                Quantity::AnyCount => self.any_count(entry, &mut arguments)?,
                quantity @ (Quantity::Exact | Quantity::Range { .. }) => {
                    return Err(
                        self.error_at(name_start, ParseErrorKind::UnsupportedQuantity(quantity))
                    );
                }
            }
        }

        self.close_paren()?;
        Ok(Expression::FunctionCall(FunctionCall {
            function,
            arguments,
        }))
    }

    /// Collect arguments of the entry's type until `)` or the first argument
    /// of another type, which is left unconsumed.
    fn any_count(
        &mut self,
        entry: &FunctionType,
        arguments: &mut Vec<Expression>,
    ) -> Result<(), ParseError> {
        loop {
            match self.lexer.peek_token() {
                None => return Err(self.error_here(ParseErrorKind::UnclosedParens)),
                Some(SpannedToken { token, .. }) if !may_start_expression(&token) => {
                    return Ok(());
                }
                Some(_) => {}
            }
            let before = self.lexer.save();
            let argument = self.parse_expression()?;
            if argument.expression_type() != entry.expected {
                trace!(
                    "{}: {} does not match {}, rolling back",
                    self.lexer.location(before),
                    argument.expression_type(),
                    entry.expected
                );
                self.lexer.restore(before);
                return Ok(());
            }
            arguments.push(argument);
        }
    }

    fn close_paren(&mut self) -> Result<(), ParseError> {
        let Some(SpannedToken { token, start }) = self.lexer.peek_token() else {
            return Err(self.error_here(ParseErrorKind::UnclosedParens));
        };
        match token {
            Token::CloseParen => {
                self.lexer.next_token();
                Ok(())
            }
            Token::Error(e) => Err(self.error_at(start, e.into())),
            token if may_start_expression(&token) => {
                // An argument no profile entry accepted.
                let argument = self.parse_expression()?;
                Err(self.error_at(
                    start,
                    ParseErrorKind::UnexpectedArgument(argument.expression_type()),
                ))
            }
            other => Err(self.error_at(
                start,
                ParseErrorKind::Expected {
                    expected: TokenKind::CloseParen,
                    found: Some(other.kind()),
                },
            )),
        }
    }
}

/// Tokens worth a speculative sub-expression parse. Error tokens are
/// included so that the lexical error is reported.
fn may_start_expression(token: &Token) -> bool {
    matches!(
        token,
        Token::Identifier(_)
            | Token::String(_)
            | Token::Integer(_)
            | Token::Double(_)
            | Token::OpenParen
            | Token::Error(_)
    )
}
