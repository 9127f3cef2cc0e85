//! Accumulation buffers
//!
//! One growable buffer per in-flight token kind. A buffer collects fragments
//! until the token completes, then is cleared in place for the next token.

use crate::config::Limits;
use crate::{Error, Result};
use bytes::{Bytes, BytesMut};

/// Token kind an accumulation buffer (or a limit) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Method,
    Version,
    Url,
    Search,
    HeaderKey,
    HeaderValue,
    Body,
    HeaderCount,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Method => "method",
            Field::Version => "version",
            Field::Url => "url",
            Field::Search => "search",
            Field::HeaderKey => "header key",
            Field::HeaderValue => "header value",
            Field::Body => "body",
            Field::HeaderCount => "header count",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only byte buffer with a size cap
#[derive(Debug)]
pub(crate) struct Accumulator {
    field: Field,
    buf: BytesMut,
    limit: usize,
}

impl Accumulator {
    pub(crate) fn new(field: Field, limit: usize) -> Self {
        Self {
            field,
            buf: BytesMut::new(),
            limit,
        }
    }

    pub(crate) fn append(&mut self, fragment: &[u8]) -> Result<()> {
        let size = self.buf.len().saturating_add(fragment.len());
        if size > self.limit {
            return Err(Error::LimitExceeded {
                field: self.field,
                size,
                limit: self.limit,
            });
        }
        self.buf.extend_from_slice(fragment);
        Ok(())
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Truncate to empty, keeping the allocation
    pub(crate) fn clear(&mut self) {
        self.buf.clear();
    }

    /// Decode as text (lossy) and clear
    pub(crate) fn take_string(&mut self) -> String {
        let text = String::from_utf8_lossy(&self.buf).into_owned();
        self.buf.clear();
        text
    }

    /// Hand the accumulated bytes out without copying; leaves the buffer empty
    pub(crate) fn take_bytes(&mut self) -> Bytes {
        self.buf.split().freeze()
    }
}

/// Every accumulation buffer the assembler owns
#[derive(Debug)]
pub(crate) struct Buffers {
    pub(crate) method: Accumulator,
    pub(crate) version: Accumulator,
    pub(crate) url: Accumulator,
    pub(crate) search: Accumulator,
    pub(crate) header_key: Accumulator,
    pub(crate) header_value: Accumulator,
    pub(crate) body: Accumulator,
}

impl Buffers {
    pub(crate) fn new(limits: &Limits) -> Self {
        Self {
            method: Accumulator::new(Field::Method, limits.max_method_len),
            version: Accumulator::new(Field::Version, limits.max_version_len),
            url: Accumulator::new(Field::Url, limits.max_url_len),
            search: Accumulator::new(Field::Search, limits.max_url_len),
            header_key: Accumulator::new(Field::HeaderKey, limits.max_header_key_len),
            header_value: Accumulator::new(Field::HeaderValue, limits.max_header_value_len),
            body: Accumulator::new(Field::Body, limits.max_body_len),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.method.clear();
        self.version.clear();
        self.url.clear();
        self.search.clear();
        self.header_key.clear();
        self.header_value.clear();
        self.body.clear();
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.method.is_empty()
            && self.version.is_empty()
            && self.url.is_empty()
            && self.search.is_empty()
            && self.header_key.is_empty()
            && self.header_value.is_empty()
            && self.body.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_take() {
        let mut acc = Accumulator::new(Field::Url, 16);
        acc.append(b"/some").unwrap();
        acc.append(b"path").unwrap();
        assert_eq!(acc.as_bytes(), b"/somepath");
        assert_eq!(acc.take_string(), "/somepath");
        assert!(acc.is_empty());
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut acc = Accumulator::new(Field::HeaderKey, 1024);
        acc.append(b"Content-Type").unwrap();
        let _ = acc.take_string();
        assert!(acc.buf.capacity() >= "Content-Type".len());
    }

    #[test]
    fn test_limit_exceeded() {
        let mut acc = Accumulator::new(Field::Body, 4);
        acc.append(b"te").unwrap();
        acc.append(b"st").unwrap();
        assert_eq!(
            acc.append(b"!"),
            Err(Error::LimitExceeded {
                field: Field::Body,
                size: 5,
                limit: 4,
            })
        );
        assert_eq!(acc.as_bytes(), b"test");
    }

    #[test]
    fn test_lossy_text() {
        let mut acc = Accumulator::new(Field::HeaderValue, 16);
        acc.append(b"a\xffb").unwrap();
        assert_eq!(acc.take_string(), "a\u{fffd}b");
    }

    #[test]
    fn test_take_bytes() {
        let mut acc = Accumulator::new(Field::Body, 16);
        acc.append(b"payload").unwrap();
        assert_eq!(&acc.take_bytes()[..], b"payload");
        assert!(acc.is_empty());
    }

    #[test]
    fn test_buffers_clear() {
        let mut buffers = Buffers::new(&Limits::default());
        buffers.method.append(b"GET").unwrap();
        buffers.body.append(b"x").unwrap();
        assert!(!buffers.is_empty());
        buffers.clear();
        assert!(buffers.is_empty());
    }
}
