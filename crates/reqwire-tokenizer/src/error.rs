//! Error types for reqwire-tokenizer

use thiserror::Error;

/// Grammar violation found in the input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("invalid character in method")]
    InvalidMethod,

    #[error("invalid character in request target")]
    InvalidUrl,

    #[error("invalid HTTP version")]
    InvalidVersion,

    #[error("expected LF after CR")]
    LfExpected,

    #[error("invalid character in header name")]
    InvalidHeaderToken,

    #[error("invalid character in header value")]
    InvalidHeaderValue,

    #[error("obsolete line folding is not supported")]
    ObsoleteLineFolding,

    #[error("invalid Content-Length value")]
    InvalidContentLength,

    #[error("conflicting Content-Length values")]
    DuplicateContentLength,

    #[error("unsupported Transfer-Encoding")]
    UnsupportedTransferEncoding,

    #[error("Content-Length together with Transfer-Encoding")]
    ContentLengthWithTransferEncoding,

    #[error("invalid chunk size")]
    InvalidChunkSize,

    #[error("whitespace run in header value is too long")]
    WhitespaceRunTooLong,

    #[error("callback aborted parsing")]
    Aborted,
}

/// Error returned by [`Tokenizer::execute`](crate::Tokenizer::execute)
#[derive(Debug, Error)]
pub enum Error<E> {
    /// Malformed input
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A handler callback returned an error
    #[error("handler error")]
    Handler(E),
}

impl<E> Error<E> {
    /// Human readable reason
    pub fn reason(&self) -> String {
        match self {
            Error::Protocol(e) => e.to_string(),
            Error::Handler(_) => ProtocolError::Aborted.to_string(),
        }
    }
}
