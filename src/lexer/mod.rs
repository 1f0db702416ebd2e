//! Tokenizer over a [`SourceMap`].
//!
//! [`Lexer::next_token`] produces one classified token per call. Numbers and
//! identifiers are recognized speculatively: each recognizer snapshots the
//! cursor and restores it when it declines, so the next recognizer sees the
//! same input.

pub mod chars;
mod token;

use std::path::Path;

use log::trace;

pub use token::{LexError, SpannedToken, Token, TokenKind};

use self::chars::{is_identifier_continue, is_identifier_start};
use crate::Error;
use crate::source::{Cursor, Location, Source, SourceMap};

#[derive(Debug, Clone, Default)]
pub struct Lexer {
    sources: SourceMap,
}

impl Lexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A lexer over a single inline source.
    pub fn from_named(name: impl Into<String>, content: &str) -> Self {
        let mut lexer = Self::new();
        lexer.add_named(name, content);
        lexer
    }

    pub fn add_source(&mut self, source: Source) {
        self.sources.add_source(source);
    }

    pub fn add_named(&mut self, name: impl Into<String>, content: &str) {
        self.sources.add_named(name, content);
    }

    pub fn add_file(&mut self, path: impl AsRef<Path>) -> Result<(), Error> {
        self.sources.add_file(path)
    }

    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    pub fn save(&self) -> Cursor {
        self.sources.save()
    }

    pub fn restore(&mut self, cursor: Cursor) {
        self.sources.restore(cursor);
    }

    pub fn location(&self, cursor: Cursor) -> Location {
        self.sources.location(cursor)
    }

    /// The location of the live cursor.
    pub fn here(&self) -> Location {
        self.sources.here()
    }

    /// Skip whitespace. Returns `false` if nothing but whitespace remains.
    pub fn skip_whitespace(&mut self) -> bool {
        while let Some(ch) = self.sources.peek() {
            if !ch.is_whitespace() {
                return true;
            }
            self.sources.advance();
        }
        false
    }

    /// Produce the next token and advance past it.
    ///
    /// Returns `None` only at the end of all input. Malformed input yields
    /// [`Token::Error`] rather than `None`, with the cursor moved past the
    /// offending characters.
    pub fn next_token(&mut self) -> Option<SpannedToken> {
        if !self.skip_whitespace() {
            return None;
        }
        let start = self.sources.save();
        let ch = self.sources.peek()?;
        let token = match ch {
            '(' => self.single(Token::OpenParen),
            ')' => self.single(Token::CloseParen),
            '{' => self.single(Token::OpenCurly),
            '}' => self.single(Token::CloseCurly),
            '[' => self.single(Token::OpenBracket),
            ']' => self.single(Token::CloseBracket),
            ',' => self.single(Token::Comma),
            '"' => self.string_literal(),
            _ => {
                if let Some(number) = self.number() {
                    number
                } else if let Some(identifier) = self.identifier() {
                    identifier
                } else {
                    self.sources.advance();
                    Token::Error(LexError::UnknownToken(ch))
                }
            }
        };
        trace!("{}: {:?}", self.location(start), token);
        Some(SpannedToken { token, start })
    }

    /// Look at the next token without consuming it.
    pub fn peek_token(&mut self) -> Option<SpannedToken> {
        let saved = self.save();
        let token = self.next_token();
        self.restore(saved);
        token
    }

    fn single(&mut self, token: Token) -> Token {
        self.sources.advance();
        token
    }

    /// Read a string literal; the cursor is on the opening quote.
    ///
    /// A literal must close within the source it starts in, and on the same
    /// line.
    fn string_literal(&mut self) -> Token {
        if self.sources.advance() {
            return Token::Error(LexError::UnclosedString);
        }
        let mut text = String::new();
        let mut escaping = false;
        loop {
            let Some(ch) = self.sources.peek() else {
                return Token::Error(LexError::UnclosedString);
            };
            let crossed = self.sources.advance();
            if !escaping && ch == '"' {
                break;
            }
            if ch == '\n' || crossed {
                return Token::Error(LexError::UnclosedString);
            }
            if escaping {
                let unescaped = match ch {
                    '"' | '\\' => ch,
                    'r' => '\r',
                    'n' => '\n',
                    other => return Token::Error(LexError::UnknownEscape(other)),
                };
                text.push(unescaped);
                escaping = false;
            } else if ch == '\\' {
                escaping = true;
            } else {
                text.push(ch);
            }
        }
        Token::String(text)
    }

    /// Recognize `-?digits*(.digits*)?` with at least one digit.
    ///
    /// A second `.` ends the literal without being consumed. Declines, with
    /// the cursor restored, when no digit is present so that `-` and `.` can
    /// be read as identifiers.
    fn number(&mut self) -> Option<Token> {
        let saved = self.save();
        let first = self.sources.peek()?;

        let mut negative = false;
        let mut floating = false;
        let mut integral = String::new();
        let mut fraction = String::new();
        match first {
            '-' => negative = true,
            '.' => floating = true,
            c if c.is_ascii_digit() => integral.push(c),
            _ => return None,
        }

        let mut crossed = self.sources.advance();
        while !crossed {
            let Some(ch) = self.sources.peek() else {
                break;
            };
            if ch == '.' {
                if floating {
                    break;
                }
                floating = true;
            } else if ch.is_ascii_digit() {
                if floating {
                    fraction.push(ch);
                } else {
                    integral.push(ch);
                }
            } else {
                break;
            }
            crossed = self.sources.advance();
        }

        if integral.is_empty() && fraction.is_empty() {
            trace!("{}: not a number, rolling back", self.location(saved));
            self.restore(saved);
            return None;
        }

        let mut text = String::new();
        if negative {
            text.push('-');
        }
        text.push_str(if integral.is_empty() { "0" } else { integral.as_str() });
        if !floating {
            return Some(match text.parse::<i64>() {
                Ok(value) => Token::Integer(value),
                Err(e) => Token::Error(e.into()),
            });
        }
        text.push('.');
        text.push_str(if fraction.is_empty() { "0" } else { fraction.as_str() });
        Some(match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Token::Double(value),
            _ => Token::Error(LexError::DoubleOutOfRange(text)),
        })
    }

    fn identifier(&mut self) -> Option<Token> {
        let first = self.sources.peek()?;
        if !is_identifier_start(first) {
            return None;
        }
        let mut text = String::new();
        while let Some(ch) = self.sources.peek() {
            if !is_identifier_continue(ch) {
                break;
            }
            text.push(ch);
            if self.sources.advance() {
                break;
            }
        }
        Some(Token::Identifier(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(lexer: &mut Lexer) -> Vec<Token> {
        std::iter::from_fn(|| lexer.next_token())
            .map(|t| t.token)
            .collect()
    }

    fn lex(input: &str) -> Vec<Token> {
        tokens(&mut Lexer::from_named("test", input))
    }

    fn id(s: &str) -> Token {
        Token::Identifier(s.to_string())
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            lex("( ) { } [ ] ,"),
            vec![
                Token::OpenParen,
                Token::CloseParen,
                Token::OpenCurly,
                Token::CloseCurly,
                Token::OpenBracket,
                Token::CloseBracket,
                Token::Comma,
            ]
        );
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert_eq!(lex(""), vec![]);
        assert_eq!(lex(" \t\r\n  "), vec![]);
        assert_eq!(Lexer::new().next_token(), None);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(lex("42"), vec![Token::Integer(42)]);
        assert_eq!(lex("-5"), vec![Token::Integer(-5)]);
        assert_eq!(lex("3.25"), vec![Token::Double(3.25)]);
        assert_eq!(lex(".5"), vec![Token::Double(0.5)]);
        assert_eq!(lex("3."), vec![Token::Double(3.0)]);
        assert_eq!(lex("-.5"), vec![Token::Double(-0.5)]);
        assert_eq!(lex("-0"), vec![Token::Integer(0)]);
    }

    #[test]
    fn test_second_dot_ends_number() {
        assert_eq!(lex("1.2.3"), vec![Token::Double(1.2), Token::Double(0.3)]);
    }

    #[test]
    fn test_sign_or_dot_alone_is_identifier() {
        assert_eq!(lex("-"), vec![id("-")]);
        assert_eq!(lex("."), vec![id(".")]);
        assert_eq!(lex("-."), vec![id("-.")]);
        assert_eq!(lex("-abc"), vec![id("-abc")]);
        assert_eq!(lex("..."), vec![id("...")]);
    }

    #[test]
    fn test_integer_overflow_is_error() {
        let toks = lex("99999999999999999999");
        assert_eq!(toks.len(), 1);
        match &toks[0] {
            Token::Error(LexError::InvalidInteger(e)) => {
                assert!(e.to_string().contains("too large"))
            }
            other => panic!("expected integer error, got {other:?}"),
        }
    }

    #[test]
    fn test_double_out_of_range_is_error() {
        let text = format!("{}.0", "9".repeat(400));
        let mut lexer = Lexer::from_named("t", &text);
        let spanned = lexer.next_token().unwrap();
        assert_eq!(
            spanned.token,
            Token::Error(LexError::DoubleOutOfRange(text.clone()))
        );
        assert_eq!(lexer.location(spanned.start).to_string(), "t:1:1");
        assert_eq!(
            LexError::DoubleOutOfRange(text.clone()).to_string(),
            format!("{text}: value out of range")
        );
        assert_eq!(lexer.next_token(), None);
    }

    #[test]
    fn test_identifier_stops_at_non_ascii_digit() {
        assert_eq!(
            lex("x²"),
            vec![id("x"), Token::Error(LexError::UnknownToken('²'))]
        );
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(
            lex("+ foo_bar x1 <= && a:b ünï"),
            vec![
                id("+"),
                id("foo_bar"),
                id("x1"),
                id("<="),
                id("&&"),
                id("a:b"),
                id("ünï")
            ]
        );
        // A number followed by letters splits into two tokens.
        assert_eq!(lex("12ab"), vec![Token::Integer(12), id("ab")]);
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            lex(r#""a\nb\"c\\d\re""#),
            vec![Token::String("a\nb\"c\\d\re".to_string())]
        );
        assert_eq!(lex(r#""""#), vec![Token::String(String::new())]);
    }

    #[test]
    fn test_unknown_escape() {
        let toks = lex(r#""a\tb""#);
        assert_eq!(toks[0], Token::Error(LexError::UnknownEscape('t')));
        assert_eq!(
            LexError::UnknownEscape('t').to_string(),
            "t unknown escape character"
        );
    }

    #[test]
    fn test_unclosed_strings() {
        assert_eq!(lex("\"abc"), vec![Token::Error(LexError::UnclosedString)]);
        assert_eq!(lex("\""), vec![Token::Error(LexError::UnclosedString)]);
        assert_eq!(
            lex("\"ab\ncd\"")[0],
            Token::Error(LexError::UnclosedString)
        );
    }

    #[test]
    fn test_unknown_token() {
        let mut lexer = Lexer::from_named("t", "# x");
        let first = lexer.next_token().unwrap();
        assert_eq!(first.token, Token::Error(LexError::UnknownToken('#')));
        assert_eq!(lexer.next_token().unwrap().token, id("x"));

        let err = LexError::UnknownToken('\u{7}');
        assert_eq!(err.to_string(), "<BEL> does not start any known token");
    }

    #[test]
    fn test_token_locations() {
        let mut lexer = Lexer::from_named("loc", "(foo\n  \"s\")");
        let mut starts = Vec::new();
        while let Some(t) = lexer.next_token() {
            starts.push(lexer.location(t.start).to_string());
        }
        assert_eq!(starts, vec!["loc:1:1", "loc:1:2", "loc:2:3", "loc:2:6"]);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut lexer = Lexer::from_named("t", "a b");
        assert_eq!(lexer.peek_token().unwrap().token, id("a"));
        assert_eq!(lexer.peek_token().unwrap().token, id("a"));
        assert_eq!(lexer.next_token().unwrap().token, id("a"));
        assert_eq!(lexer.next_token().unwrap().token, id("b"));
        assert_eq!(lexer.peek_token(), None);
    }

    #[test]
    fn test_tokens_are_split_at_source_boundaries() {
        let mut lexer = Lexer::new();
        lexer.add_named("one", "ab");
        lexer.add_named("two", "cd");
        lexer.add_named("three", "12");
        lexer.add_named("four", "34");
        assert_eq!(
            tokens(&mut lexer),
            vec![id("ab"), id("cd"), Token::Integer(12), Token::Integer(34)]
        );
    }

    #[test]
    fn test_sign_at_end_of_source() {
        let mut lexer = Lexer::new();
        lexer.add_named("one", "-");
        lexer.add_named("two", "5");
        assert_eq!(tokens(&mut lexer), vec![id("-"), Token::Integer(5)]);
    }

    #[test]
    fn test_string_cannot_span_sources() {
        let mut lexer = Lexer::new();
        lexer.add_named("one", "\"ab");
        lexer.add_named("two", "c\"");
        let toks = tokens(&mut lexer);
        assert_eq!(toks[0], Token::Error(LexError::UnclosedString));

        // The closing quote may be the last character of its source.
        let mut lexer = Lexer::new();
        lexer.add_named("one", "\"ab\"");
        lexer.add_named("two", "x");
        assert_eq!(
            tokens(&mut lexer),
            vec![Token::String("ab".to_string()), id("x")]
        );
    }

    #[test]
    fn test_split_sources_match_single_source() {
        let mut split = Lexer::new();
        split.add_named("first", "(+ ");
        split.add_named("second", "1.0 2.0)");
        let mut whole = Lexer::from_named("whole", "(+ 1.0 2.0)");
        assert_eq!(tokens(&mut split), tokens(&mut whole));
    }
}
