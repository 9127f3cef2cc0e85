//! Error types for reqwire-core

use crate::buffer::Field;
use thiserror::Error;

/// Result type alias for reqwire operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the request assembler
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed input reported by the tokenizer
    #[error("Protocol error: {reason}")]
    Protocol { reason: String },

    /// An accumulated token grew past its configured cap
    #[error("Limit exceeded: {field} is {size}, limit is {limit}")]
    LimitExceeded {
        field: Field,
        size: usize,
        limit: usize,
    },

    /// Request record could not be converted into another type
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// Size string could not be parsed
    #[error("Invalid size: {0}")]
    InvalidSize(String),
}

impl Error {
    /// Whether this error came from a configured limit
    pub fn is_limit_exceeded(&self) -> bool {
        matches!(self, Error::LimitExceeded { .. })
    }
}

impl From<reqwire_tokenizer::Error<Error>> for Error {
    fn from(e: reqwire_tokenizer::Error<Error>) -> Self {
        match e {
            reqwire_tokenizer::Error::Protocol(p) => Error::Protocol {
                reason: p.to_string(),
            },
            reqwire_tokenizer::Error::Handler(inner) => inner,
        }
    }
}
