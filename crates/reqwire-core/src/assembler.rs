//! Event assembler
//!
//! Consumes tokenizer events and builds a [`Request`]. Each token's fragments
//! collect in their accumulation buffer; the matching complete event moves
//! the buffer's content into the record and clears the buffer for reuse.
//!
//! The assembler trusts the tokenizer's event order. It only refuses input
//! that would grow a buffer (or the header list) past the configured limits.

use crate::buffer::{Buffers, Field};
use crate::config::ParserConfig;
use crate::request::{Method, Request, Version};
use crate::{Error, Result};
use reqwire_tokenizer::Handler;

/// Builds one request at a time from tokenizer events
#[derive(Debug)]
pub struct Assembler {
    buffers: Buffers,
    request: Request,
    /// A `?` has been seen in the current URL
    search_started: bool,
    complete: bool,
    max_headers: usize,
    log_events: bool,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new(&ParserConfig::default())
    }
}

impl Assembler {
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            buffers: Buffers::new(&config.limits),
            request: Request::new(),
            search_started: false,
            complete: false,
            max_headers: config.limits.max_headers,
            log_events: config.log_events,
        }
    }

    /// Whether message-complete fired for the current record
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// The record being assembled
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Move the completed record out and start a fresh one
    pub fn take_request(&mut self) -> Option<Request> {
        if !self.complete {
            return None;
        }
        self.complete = false;
        self.search_started = false;
        Some(std::mem::take(&mut self.request))
    }

    /// Drop the in-progress record and every buffered fragment
    pub fn reset(&mut self) {
        self.buffers.clear();
        self.request = Request::new();
        self.search_started = false;
        self.complete = false;
    }

    pub(crate) fn buffers_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}

impl Handler for Assembler {
    type Error = Error;

    fn on_method(&mut self, fragment: &[u8]) -> Result<()> {
        self.buffers.method.append(fragment)
    }

    fn on_method_complete(&mut self) -> Result<()> {
        let token = self.buffers.method.as_bytes();
        self.request.method = Method::parse(token);
        if self.log_events {
            match self.request.method {
                Some(method) => log::trace!("method {method}"),
                None => log::trace!("unrecognized method {:?}", String::from_utf8_lossy(token)),
            }
        }
        self.buffers.method.clear();
        Ok(())
    }

    fn on_url(&mut self, fragment: &[u8]) -> Result<()> {
        if self.search_started {
            return self.buffers.search.append(fragment);
        }
        // Only the new fragment is scanned; earlier ones had no `?`
        match memchr::memchr(b'?', fragment) {
            Some(pos) => {
                self.buffers.url.append(&fragment[..pos])?;
                self.buffers.search.append(&fragment[pos + 1..])?;
                self.search_started = true;
            }
            None => self.buffers.url.append(fragment)?,
        }
        Ok(())
    }

    fn on_url_complete(&mut self) -> Result<()> {
        let path = self.buffers.url.take_string();
        let search = self.buffers.search.take_string();
        if self.log_events {
            log::trace!("path {path:?} search {search:?}");
        }
        self.request.path = Some(path);
        self.request.search = Some(search);
        self.search_started = false;
        Ok(())
    }

    fn on_version(&mut self, fragment: &[u8]) -> Result<()> {
        self.buffers.version.append(fragment)
    }

    fn on_version_complete(&mut self) -> Result<()> {
        self.request.version = Version::parse(self.buffers.version.as_bytes());
        if self.log_events {
            log::trace!("version {}", self.request.version);
        }
        self.buffers.version.clear();
        Ok(())
    }

    fn on_header_field(&mut self, fragment: &[u8]) -> Result<()> {
        self.buffers.header_key.append(fragment)
    }

    fn on_header_field_complete(&mut self) -> Result<()> {
        let count = self.request.headers.len() + 1;
        if count > self.max_headers {
            return Err(Error::LimitExceeded {
                field: Field::HeaderCount,
                size: count,
                limit: self.max_headers,
            });
        }
        let key = self.buffers.header_key.take_string();
        if self.log_events {
            log::trace!("header key {key:?}");
        }
        self.request.headers.push_key(key);
        Ok(())
    }

    fn on_header_value(&mut self, fragment: &[u8]) -> Result<()> {
        self.buffers.header_value.append(fragment)
    }

    fn on_header_value_complete(&mut self) -> Result<()> {
        let value = self.buffers.header_value.take_string();
        if self.log_events {
            log::trace!("header value {value:?}");
        }
        let attached = self.request.headers.set_last_value(value);
        debug_assert!(attached, "header value completed before any header field");
        Ok(())
    }

    fn on_headers_complete(&mut self) -> Result<()> {
        if self.log_events {
            log::trace!("headers complete ({} fields)", self.request.headers.len());
        }
        Ok(())
    }

    fn on_body(&mut self, fragment: &[u8]) -> Result<()> {
        self.buffers.body.append(fragment)
    }

    fn on_message_complete(&mut self) -> Result<()> {
        self.request.body = self.buffers.body.take_bytes();
        self.complete = true;
        if self.log_events {
            log::debug!(
                "request complete: {} {} ({} body bytes)",
                self.request.method.map_or("-", |m| m.as_str()),
                self.request.path.as_deref().unwrap_or(""),
                self.request.body.len()
            );
        }
        Ok(())
    }
}
