//! reqwire-tokenizer: event-emitting HTTP/1.x request tokenizer
//!
//! Recognizes the request grammar byte by byte and reports each token to a
//! [`Handler`] as it arrives. Tokens split across inputs are delivered as
//! several fragments followed by a single `*_complete` event.
//!
//! ## Supported
//! - Request line `METHOD SP target SP HTTP/version`
//! - Header fields (obsolete line folding rejected)
//! - `Content-Length` and `chunked` bodies (trailer fields are skipped)
//! - Stray line breaks between pipelined messages
//!
//! ## Event order
//! method* → method-complete → url* → url-complete → version* →
//! version-complete → (field* → field-complete → value* → value-complete)* →
//! headers-complete → body* → message-complete

#![forbid(unsafe_code)]
#![warn(clippy::all)]

mod error;
mod handler;
mod tokenizer;

pub use error::{Error, ProtocolError};
pub use handler::Handler;
pub use tokenizer::{Progress, Tokenizer};
