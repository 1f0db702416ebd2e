//! Token stream rendering with bracket-balance checking.
//!
//! Brackets and commas are written inline; every other token starts a new
//! line indented by the number of open brackets:
//!
//! ```text
//! (
//!   Id(+)
//!   Double(1.000000)
//!   Double(2.000000))
//! ```

use std::fmt;

use log::info;
use thiserror::Error;

use crate::lexer::chars::printable;
use crate::lexer::{LexError, Lexer, Token, TokenKind};
use crate::source::{Cursor, Location};

#[derive(Debug, Error)]
pub enum TokenStreamError {
    #[error("{location}: {error}")]
    Lexical { location: Location, error: LexError },
    #[error("{0}: unmatched paren")]
    Unmatched(Location),
    #[error("{0}: unclosed paren")]
    Unclosed(Location),
    #[error("Error writing token stream")]
    Fmt(#[from] fmt::Error),
}

/// Options for [`write_tokens`].
#[derive(Debug, Clone)]
pub struct TokenStreamOptions {
    /// Indent per open bracket.
    pub indent: String,
}

impl Default for TokenStreamOptions {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
        }
    }
}

/// Render a single token. Brackets and commas render as themselves.
pub fn token_text(token: &Token) -> String {
    match token {
        Token::Identifier(name) => format!("Id({name})"),
        Token::String(text) => format!("String(\"{}\")", printable(text)),
        Token::Integer(value) => format!("Int({value})"),
        Token::Double(value) => format!("Double({value:.6})"),
        Token::Error(e) => format!("Error({e})"),
        other => other.kind().to_string(),
    }
}

/// Write every remaining token of `lexer` to `w`.
///
/// Fails on the first lexical error, on a closing bracket that does not
/// match the innermost open one, and on brackets left open at the end of
/// input. Returns the number of tokens written.
pub fn write_tokens<W: fmt::Write>(
    lexer: &mut Lexer,
    w: &mut W,
    options: &TokenStreamOptions,
) -> Result<usize, TokenStreamError> {
    let mut open: Vec<(TokenKind, Cursor)> = Vec::new();
    let mut count = 0;

    while let Some(spanned) = lexer.next_token() {
        let kind = spanned.token.kind();
        match &spanned.token {
            Token::Error(error) => {
                return Err(TokenStreamError::Lexical {
                    location: lexer.location(spanned.start),
                    error: error.clone(),
                });
            }
            Token::OpenParen | Token::OpenCurly | Token::OpenBracket => {
                open.push((kind, spanned.start));
                write!(w, "{kind}")?;
            }
            Token::CloseParen | Token::CloseCurly | Token::CloseBracket => {
                match open.pop() {
                    Some((opener, _)) if Some(opener) == kind.opener() => {}
                    _ => {
                        return Err(TokenStreamError::Unmatched(
                            lexer.location(spanned.start),
                        ));
                    }
                }
                write!(w, "{kind}")?;
            }
            Token::Comma => write!(w, "{kind}")?,
            token => {
                if count > 0 {
                    writeln!(w)?;
                }
                for _ in 0..open.len() {
                    w.write_str(&options.indent)?;
                }
                w.write_str(&token_text(token))?;
            }
        }
        count += 1;
    }

    if let Some((_, start)) = open.last() {
        return Err(TokenStreamError::Unclosed(lexer.location(*start)));
    }
    if count > 0 {
        writeln!(w)?;
    }
    info!("Read {count} tokens");
    Ok(count)
}
