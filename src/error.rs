use std::io;

use thiserror::Error;

use crate::parser::ParseError;

/// Errors from loading sources or parsing them.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Couldn't read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
}
