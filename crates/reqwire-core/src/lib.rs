//! reqwire-core: incremental HTTP request assembler
//!
//! Turns tokenizer events, delivered as network bytes arrive, into complete
//! request records with the query string split off and repeated headers
//! preserved.
//!
//! ## Features
//! - `http` (default) - conversion into `http::Request<Bytes>`
//!
//! ## Example
//! ```
//! use reqwire_core::{create_parser, Method, Status};
//!
//! let mut parser = create_parser();
//! assert_eq!(parser.feed(b"GET /search?q=rust HTTP/1.1\r\nHo").unwrap(), Status::NeedsMore);
//! assert_eq!(parser.feed(b"st: example.com\r\n\r\n").unwrap(), Status::Complete);
//!
//! let request = parser.take_request().unwrap();
//! assert_eq!(request.method, Some(Method::Get));
//! assert_eq!(request.path.as_deref(), Some("/search"));
//! assert_eq!(request.search.as_deref(), Some("q=rust"));
//! assert_eq!(request.first_header("Host"), Some("example.com"));
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod assembler;
pub mod buffer;
pub mod config;
pub mod error;
pub mod headers;
pub mod parser;
pub mod request;

#[cfg(feature = "http")]
mod interop;

// Re-exports
pub use assembler::Assembler;
pub use buffer::Field;
pub use config::{Limits, ParserConfig};
pub use error::{Error, Result};
pub use headers::{Header, Headers, MatchMode};
pub use parser::{Parser, Status};
pub use request::{Method, Request, RequestBuilder, Version};
pub use reqwire_tokenizer::Handler;

/// Create a parser with default configuration
pub fn create_parser() -> Parser {
    Parser::new()
}
