//! HTTP Request record

mod method;
mod version;

pub use method::Method;
pub use version::Version;

use crate::headers::{Headers, MatchMode};
use bytes::Bytes;

/// HTTP Request
///
/// Fields fill in as the assembler finalizes tokens. A request handed out by
/// [`Parser::take_request`](crate::Parser::take_request) is complete:
/// `path` and `search` are always `Some`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    /// HTTP method, `None` if the method token was not recognized
    pub method: Option<Method>,
    /// HTTP version
    pub version: Version,
    /// Request path (without query string)
    pub path: Option<String>,
    /// Query string (without leading ?), empty when the URL had none
    pub search: Option<String>,
    /// Request headers in arrival order
    pub headers: Headers,
    /// Request body
    pub body: Bytes,
}

impl Request {
    /// Create an empty request record
    pub fn new() -> Self {
        Self::default()
    }

    /// First header whose key equals `key` (case-sensitive)
    pub fn first_header(&self, key: &str) -> Option<&str> {
        self.headers.first(key)
    }

    /// All header values whose key equals `key` (case-sensitive), in order
    pub fn all_headers(&self, key: &str) -> Vec<&str> {
        self.headers.all(key)
    }

    /// Get content-type header
    pub fn content_type(&self) -> Option<&str> {
        self.headers.first_by("content-type", MatchMode::IgnoreAsciiCase)
    }

    /// Get content-length header
    pub fn content_length(&self) -> Option<usize> {
        self.headers
            .first_by("content-length", MatchMode::IgnoreAsciiCase)
            .and_then(|v| v.trim().parse().ok())
    }

    /// Rebuild the request target; a bare trailing `?` is not restored
    pub fn url(&self) -> Option<String> {
        let path = self.path.as_deref()?;
        match self.search.as_deref() {
            Some(search) if !search.is_empty() => Some(format!("{path}?{search}")),
            _ => Some(path.to_string()),
        }
    }

    /// Parse the query string into decoded key-value pairs, in order
    pub fn search_params(&self) -> Vec<(String, String)> {
        let Some(search) = self.search.as_deref() else {
            return Vec::new();
        };
        search
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (urlencoding_decode(key), urlencoding_decode(value))
            })
            .collect()
    }
}

/// Builder for constructing complete requests
pub struct RequestBuilder {
    request: Request,
}

impl RequestBuilder {
    /// Create a new builder
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            request: Request {
                method: Some(method),
                version: Version::Http11,
                path: Some(path.into()),
                search: Some(String::new()),
                ..Request::default()
            },
        }
    }

    pub fn version(mut self, version: Version) -> Self {
        self.request.version = version;
        self
    }

    /// Set query string
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.request.search = Some(search.into());
        self
    }

    /// Add a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.headers.push(name, value);
        self
    }

    /// Set body
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.request.body = body.into();
        self
    }

    /// Build the request
    pub fn build(self) -> Request {
        self.request
    }
}

/// Percent and `+` decoding for query components
fn urlencoding_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let decoded = bytes
                    .get(i + 1..i + 3)
                    .filter(|hex| hex.iter().all(u8::is_ascii_hexdigit))
                    .and_then(|hex| std::str::from_utf8(hex).ok())
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok());
                match decoded {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                        continue;
                    }
                    None => out.push(b'%'),
                }
            }
            b'+' => out.push(b' '),
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
