//! Common test utilities for parsing and evaluating expressions

use sexpr_eval::lexer::Token;
use sexpr_eval::parser::{ErrorCategory, ParseError};
use sexpr_eval::{Lexer, evaluate};

/// Evaluate `input` and verify the result text.
pub fn eval_ok(input: &str, expected: &str) {
    match evaluate("test", input) {
        Ok(actual) => assert_eq!(
            actual, expected,
            "Input:\n---\n{input}\n---\nExpected: {expected}\nActual: {actual}"
        ),
        Err(e) => {
            println!("Error evaluating:\n{input}");
            panic!("{}", e);
        }
    }
}

/// Evaluate `input`, expecting it to fail with an error of the given
/// category. Returns the error for further checks.
pub fn eval_err(input: &str, category: ErrorCategory) -> ParseError {
    match evaluate("test", input) {
        Ok(actual) => panic!("Expected {category} error for {input:?}, got {actual:?}"),
        Err(e) => {
            assert_eq!(e.category(), category, "Unexpected error: {e}");
            e
        }
    }
}

/// Drain all tokens from the lexer.
pub fn tokens(mut lexer: Lexer) -> Vec<Token> {
    let mut tokens = Vec::new();
    while let Some(spanned) = lexer.next_token() {
        tokens.push(spanned.token);
    }
    tokens
}

/// Build a lexer over several named sources.
pub fn lexer_over(sources: &[(&str, &str)]) -> Lexer {
    let mut lexer = Lexer::new();
    for (name, content) in sources {
        lexer.add_named(*name, content);
    }
    lexer
}
