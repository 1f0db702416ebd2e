use std::fmt;
use std::num::ParseIntError;

use thiserror::Error;

use super::chars::describe_char;
use crate::source::Cursor;

/// Lexical errors, carried by [`Token::Error`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("{} unknown escape character", describe(.0))]
    UnknownEscape(char),
    #[error("unclosed string literal")]
    UnclosedString,
    #[error("{} does not start any known token", describe(.0))]
    UnknownToken(char),
    #[error("{0}")]
    InvalidInteger(#[from] ParseIntError),
    #[error("{0}: value out of range")]
    DoubleOutOfRange(String),
}

fn describe(ch: &char) -> String {
    describe_char(*ch, false).0
}

/// A single classified token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Identifier(String),
    String(String),
    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,
    OpenBracket,
    CloseBracket,
    Comma,
    Integer(i64),
    Double(f64),
    Error(LexError),
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Identifier(_) => TokenKind::Identifier,
            Token::String(_) => TokenKind::String,
            Token::OpenParen => TokenKind::OpenParen,
            Token::CloseParen => TokenKind::CloseParen,
            Token::OpenCurly => TokenKind::OpenCurly,
            Token::CloseCurly => TokenKind::CloseCurly,
            Token::OpenBracket => TokenKind::OpenBracket,
            Token::CloseBracket => TokenKind::CloseBracket,
            Token::Comma => TokenKind::Comma,
            Token::Integer(_) => TokenKind::Integer,
            Token::Double(_) => TokenKind::Double,
            Token::Error(_) => TokenKind::Error,
        }
    }
}

/// The tag of a [`Token`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    String,
    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,
    OpenBracket,
    CloseBracket,
    Comma,
    Integer,
    Double,
    Error,
}

impl TokenKind {
    /// The closing bracket matching an opening one.
    pub fn closer(self) -> Option<TokenKind> {
        match self {
            TokenKind::OpenParen => Some(TokenKind::CloseParen),
            TokenKind::OpenCurly => Some(TokenKind::CloseCurly),
            TokenKind::OpenBracket => Some(TokenKind::CloseBracket),
            _ => None,
        }
    }

    /// The opening bracket matching a closing one.
    pub fn opener(self) -> Option<TokenKind> {
        match self {
            TokenKind::CloseParen => Some(TokenKind::OpenParen),
            TokenKind::CloseCurly => Some(TokenKind::OpenCurly),
            TokenKind::CloseBracket => Some(TokenKind::OpenBracket),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Identifier => "id",
            TokenKind::String => "str",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenCurly => "{",
            TokenKind::CloseCurly => "}",
            TokenKind::OpenBracket => "[",
            TokenKind::CloseBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::Integer => "int",
            TokenKind::Double => "double",
            TokenKind::Error => "error",
        };
        f.write_str(s)
    }
}

/// A token together with the position where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub start: Cursor,
}
