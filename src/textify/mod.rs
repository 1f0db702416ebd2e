//! Output tokens and expressions in text format.

pub mod expressions;
pub mod tokens;

pub use expressions::{escape_string, format_double};
pub use tokens::{TokenStreamError, TokenStreamOptions, token_text, write_tokens};
