//! Tokenizer adapter
//!
//! [`Parser`] owns a tokenizer and an assembler for one connection. Raw
//! bytes go in through [`Parser::feed`]; finished requests come out through
//! [`Parser::take_request`].
//!
//! `feed` has three outcomes: `Ok(Status::NeedsMore)`, `Ok(Status::Complete)`
//! and `Err(_)`. After an error the in-progress request is gone and the
//! parser keeps returning that error until [`Parser::reset`].

use crate::assembler::Assembler;
use crate::config::ParserConfig;
use crate::request::Request;
use crate::{Error, Result};
use bytes::BytesMut;
use reqwire_tokenizer::{Progress, Tokenizer};

/// Outcome of a successful [`Parser::feed`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Supply more bytes
    NeedsMore,
    /// A full request is ready for [`Parser::take_request`]
    Complete,
}

/// Incremental request parser for a single connection
#[derive(Debug)]
pub struct Parser {
    tokenizer: Tokenizer,
    assembler: Assembler,
    /// Bytes received after the end of a completed message
    backlog: BytesMut,
    failure: Option<Error>,
    log_errors: bool,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Parser with default limits
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            assembler: Assembler::new(&config),
            backlog: BytesMut::new(),
            failure: None,
            log_errors: config.log_errors,
        }
    }

    /// Process incoming bytes.
    ///
    /// Parsing stops at the end of a message. Bytes past that point are kept
    /// and processed by the first `feed` after [`Parser::take_request`];
    /// an empty `input` is enough to resume them.
    pub fn feed(&mut self, input: &[u8]) -> Result<Status> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }

        if self.assembler.is_complete() {
            self.backlog.extend_from_slice(input);
            return Ok(Status::Complete);
        }

        if self.backlog.is_empty() {
            return self.execute(input);
        }

        self.backlog.extend_from_slice(input);
        let pending = self.backlog.split();
        self.execute(&pending)
    }

    fn execute(&mut self, input: &[u8]) -> Result<Status> {
        match self.tokenizer.execute(input, &mut self.assembler) {
            Ok(Progress::NeedsMore) => Ok(Status::NeedsMore),
            Ok(Progress::Complete { consumed }) => {
                self.backlog.extend_from_slice(&input[consumed..]);
                Ok(Status::Complete)
            }
            Err(e) => {
                let error = Error::from(e);
                if self.log_errors {
                    log::warn!("discarding request: {error}");
                }
                self.assembler.reset();
                debug_assert!(self.assembler.buffers_empty());
                self.backlog.clear();
                self.failure = Some(error.clone());
                Err(error)
            }
        }
    }

    /// Take the finished request, or `None` while the message is incomplete
    pub fn take_request(&mut self) -> Option<Request> {
        self.assembler.take_request()
    }

    /// Whether a finished request is waiting to be taken
    pub fn is_complete(&self) -> bool {
        self.assembler.is_complete()
    }

    /// Number of bytes held back after a completed message
    pub fn buffered(&self) -> usize {
        self.backlog.len()
    }

    /// Discard all state, including a failure, and start over
    pub fn reset(&mut self) {
        self.tokenizer.reset();
        self.assembler.reset();
        self.backlog.clear();
        self.failure = None;
    }
}
