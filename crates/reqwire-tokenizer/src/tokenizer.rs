//! Incremental HTTP/1.x request tokenizer
//!
//! The tokenizer is a byte-level state machine. Token bytes are never copied:
//! each call to [`Tokenizer::execute`] reports the slice of the current input
//! that belongs to the open token, so a token split across inputs arrives as
//! several fragments. Only the few bytes needed for body framing
//! (`Content-Length`, `Transfer-Encoding`) are retained internally.

use crate::error::{Error, ProtocolError};
use crate::handler::Handler;

const VERSION_PREFIX: &[u8] = b"HTTP/";

/// Longest header name the tokenizer inspects for framing purposes
const MAX_TRACKED_NAME: usize = 32;

/// Longest whitespace run held back inside a header value
const MAX_PENDING_WS: usize = 1024;

macro_rules! call {
    ($e:expr) => {
        $e.map_err(Error::Handler)?
    };
}

macro_rules! emit {
    ($handler:ident . $cb:ident, $input:expr, $mark:ident, $end:expr) => {
        if let Some(start) = $mark.take() {
            if start < $end {
                call!($handler.$cb(&$input[start..$end]));
            }
        }
    };
}

/// Outcome of a successful [`Tokenizer::execute`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// All input was consumed and the message is not finished yet
    NeedsMore,
    /// A message ended after `consumed` bytes of the input
    Complete { consumed: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    MessageStart,
    Method,
    UrlStart,
    Url,
    VersionPrefix(usize),
    VersionStart,
    Version,
    RequestLineLf,
    HeaderLineStart,
    HeaderField,
    ValueStart,
    HeaderValue,
    HeaderValueLf,
    HeadersLf,
    Body { remaining: u64 },
    ChunkSize,
    ChunkExtension,
    ChunkSizeLf,
    ChunkData { remaining: u64 },
    ChunkDataCr,
    ChunkDataLf,
    TrailerLineStart,
    TrailerLine,
    TrailerLineLf,
    TrailersLf,
}

/// Header whose value decides body framing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tracked {
    None,
    ContentLength,
    TransferEncoding,
}

/// HTTP/1.x request tokenizer
///
/// ```
/// use reqwire_tokenizer::{Handler, Progress, Tokenizer};
///
/// #[derive(Default)]
/// struct Urls(Vec<u8>);
///
/// impl Handler for Urls {
///     type Error = ();
///
///     fn on_url(&mut self, fragment: &[u8]) -> Result<(), ()> {
///         self.0.extend_from_slice(fragment);
///         Ok(())
///     }
/// }
///
/// let mut tokenizer = Tokenizer::new();
/// let mut urls = Urls::default();
/// assert_eq!(tokenizer.execute(b"GET /in", &mut urls).unwrap(), Progress::NeedsMore);
/// let progress = tokenizer.execute(b"dex HTTP/1.1\r\n\r\n", &mut urls).unwrap();
/// assert_eq!(progress, Progress::Complete { consumed: 16 });
/// assert_eq!(urls.0, b"/index");
/// ```
#[derive(Debug)]
pub struct Tokenizer {
    state: State,
    failure: Option<ProtocolError>,
    name: Vec<u8>,
    name_overflow: bool,
    tracked: Tracked,
    value: Vec<u8>,
    pending_ws: Vec<u8>,
    content_length: Option<u64>,
    chunked: bool,
    chunk_size: u64,
    chunk_digits: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            state: State::MessageStart,
            failure: None,
            name: Vec::new(),
            name_overflow: false,
            tracked: Tracked::None,
            value: Vec::new(),
            pending_ws: Vec::new(),
            content_length: None,
            chunked: false,
            chunk_size: 0,
            chunk_digits: false,
        }
    }

    /// Whether an earlier call failed; cleared by [`Tokenizer::reset`]
    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    /// Forget the failure and any partially tokenized message
    pub fn reset(&mut self) {
        self.failure = None;
        self.reset_message();
    }

    /// Tokenize `input`, reporting events to `handler`.
    ///
    /// Stops right after the first message that ends inside `input`; the
    /// caller re-submits the bytes after `consumed` for the next message.
    /// Once an error is returned every further call returns it again until
    /// [`Tokenizer::reset`].
    pub fn execute<H: Handler>(
        &mut self,
        input: &[u8],
        handler: &mut H,
    ) -> Result<Progress, Error<H::Error>> {
        if let Some(failure) = &self.failure {
            return Err(Error::Protocol(failure.clone()));
        }

        let result = self.run(input, handler);
        if let Err(e) = &result {
            self.failure = Some(match e {
                Error::Protocol(p) => p.clone(),
                Error::Handler(_) => ProtocolError::Aborted,
            });
        }
        result
    }

    fn run<H: Handler>(
        &mut self,
        input: &[u8],
        handler: &mut H,
    ) -> Result<Progress, Error<H::Error>> {
        // Start of the open token inside `input`
        let mut mark = match self.state {
            State::Method | State::Url | State::Version | State::HeaderField => Some(0),
            _ => None,
        };

        let mut i = 0;
        while i < input.len() {
            // Bulk states consume more than one byte per step
            match self.state {
                State::Url => {
                    let end = memchr::memchr(b' ', &input[i..]).map_or(input.len(), |p| i + p);
                    if !input[i..end].iter().all(|&b| is_url_byte(b)) {
                        return Err(ProtocolError::InvalidUrl.into());
                    }
                    if end == input.len() {
                        i = end;
                        continue;
                    }
                    emit!(handler.on_url, input, mark, end);
                    call!(handler.on_url_complete());
                    self.state = State::VersionPrefix(0);
                    i = end + 1;
                    continue;
                }
                State::Body { remaining } => {
                    let take = remaining.min((input.len() - i) as u64) as usize;
                    call!(handler.on_body(&input[i..i + take]));
                    i += take;
                    let remaining = remaining - take as u64;
                    if remaining == 0 {
                        return self.complete_message(handler, i);
                    }
                    self.state = State::Body { remaining };
                    continue;
                }
                State::ChunkData { remaining } => {
                    let take = remaining.min((input.len() - i) as u64) as usize;
                    call!(handler.on_body(&input[i..i + take]));
                    i += take;
                    let remaining = remaining - take as u64;
                    self.state = if remaining == 0 {
                        State::ChunkDataCr
                    } else {
                        State::ChunkData { remaining }
                    };
                    continue;
                }
                _ => {}
            }

            let byte = input[i];
            match self.state {
                State::MessageStart => match byte {
                    // Stray line breaks between pipelined messages
                    b'\r' | b'\n' => {}
                    b if is_token(b) => {
                        mark = Some(i);
                        self.state = State::Method;
                    }
                    _ => return Err(ProtocolError::InvalidMethod.into()),
                },
                State::Method => match byte {
                    b' ' => {
                        emit!(handler.on_method, input, mark, i);
                        call!(handler.on_method_complete());
                        self.state = State::UrlStart;
                    }
                    b if is_token(b) => {}
                    _ => return Err(ProtocolError::InvalidMethod.into()),
                },
                State::UrlStart => {
                    if !is_url_byte(byte) {
                        return Err(ProtocolError::InvalidUrl.into());
                    }
                    mark = Some(i);
                    self.state = State::Url;
                }
                State::VersionPrefix(n) => {
                    if byte != VERSION_PREFIX[n] {
                        return Err(ProtocolError::InvalidVersion.into());
                    }
                    self.state = if n + 1 == VERSION_PREFIX.len() {
                        State::VersionStart
                    } else {
                        State::VersionPrefix(n + 1)
                    };
                }
                State::VersionStart => {
                    if !is_version_byte(byte) {
                        return Err(ProtocolError::InvalidVersion.into());
                    }
                    mark = Some(i);
                    self.state = State::Version;
                }
                State::Version => match byte {
                    b'\r' | b'\n' => {
                        emit!(handler.on_version, input, mark, i);
                        call!(handler.on_version_complete());
                        self.state = if byte == b'\r' {
                            State::RequestLineLf
                        } else {
                            State::HeaderLineStart
                        };
                    }
                    b if is_version_byte(b) => {}
                    _ => return Err(ProtocolError::InvalidVersion.into()),
                },
                State::RequestLineLf | State::HeaderValueLf => {
                    if byte != b'\n' {
                        return Err(ProtocolError::LfExpected.into());
                    }
                    self.state = State::HeaderLineStart;
                }
                State::HeaderLineStart => match byte {
                    b'\r' => self.state = State::HeadersLf,
                    b'\n' => {
                        if let Some(progress) = self.end_headers(handler, i + 1)? {
                            return Ok(progress);
                        }
                    }
                    b' ' | b'\t' => return Err(ProtocolError::ObsoleteLineFolding.into()),
                    b if is_token(b) => {
                        mark = Some(i);
                        self.state = State::HeaderField;
                    }
                    _ => return Err(ProtocolError::InvalidHeaderToken.into()),
                },
                State::HeadersLf => {
                    if byte != b'\n' {
                        return Err(ProtocolError::LfExpected.into());
                    }
                    if let Some(progress) = self.end_headers(handler, i + 1)? {
                        return Ok(progress);
                    }
                }
                State::HeaderField => match byte {
                    b':' => {
                        if let Some(start) = mark.take() {
                            if start < i {
                                self.field_fragment(&input[start..i], handler)?;
                            }
                        }
                        self.complete_field(handler)?;
                        self.state = State::ValueStart;
                    }
                    b if is_token(b) => {}
                    _ => return Err(ProtocolError::InvalidHeaderToken.into()),
                },
                State::ValueStart => match byte {
                    b' ' | b'\t' => {}
                    b'\r' | b'\n' => {
                        self.complete_value(handler)?;
                        self.state = if byte == b'\r' {
                            State::HeaderValueLf
                        } else {
                            State::HeaderLineStart
                        };
                    }
                    b if is_value_byte(b) => {
                        mark = Some(i);
                        self.state = State::HeaderValue;
                    }
                    _ => return Err(ProtocolError::InvalidHeaderValue.into()),
                },
                State::HeaderValue => match byte {
                    b' ' | b'\t' => {
                        if let Some(start) = mark.take() {
                            self.value_fragment(&input[start..i], handler)?;
                        }
                        // Held back until a non-blank byte proves it is not trailing
                        if self.pending_ws.len() >= MAX_PENDING_WS {
                            return Err(ProtocolError::WhitespaceRunTooLong.into());
                        }
                        self.pending_ws.push(byte);
                    }
                    b'\r' | b'\n' => {
                        if let Some(start) = mark.take() {
                            self.value_fragment(&input[start..i], handler)?;
                        }
                        self.pending_ws.clear();
                        self.complete_value(handler)?;
                        self.state = if byte == b'\r' {
                            State::HeaderValueLf
                        } else {
                            State::HeaderLineStart
                        };
                    }
                    b if is_value_byte(b) => {
                        if !self.pending_ws.is_empty() {
                            self.flush_pending_ws(handler)?;
                        }
                        if mark.is_none() {
                            mark = Some(i);
                        }
                    }
                    _ => return Err(ProtocolError::InvalidHeaderValue.into()),
                },
                State::ChunkSize => match byte {
                    b if b.is_ascii_hexdigit() => {
                        self.chunk_size = self
                            .chunk_size
                            .checked_mul(16)
                            .and_then(|size| size.checked_add(hex_value(b)))
                            .ok_or(ProtocolError::InvalidChunkSize)?;
                        self.chunk_digits = true;
                    }
                    b';' | b' ' | b'\t' if self.chunk_digits => {
                        self.state = State::ChunkExtension;
                    }
                    b'\r' if self.chunk_digits => self.state = State::ChunkSizeLf,
                    b'\n' if self.chunk_digits => self.end_chunk_size(),
                    _ => return Err(ProtocolError::InvalidChunkSize.into()),
                },
                State::ChunkExtension => match byte {
                    b'\r' => self.state = State::ChunkSizeLf,
                    b'\n' => self.end_chunk_size(),
                    _ => {}
                },
                State::ChunkSizeLf => {
                    if byte != b'\n' {
                        return Err(ProtocolError::LfExpected.into());
                    }
                    self.end_chunk_size();
                }
                State::ChunkDataCr => match byte {
                    b'\r' => self.state = State::ChunkDataLf,
                    b'\n' => self.state = State::ChunkSize,
                    _ => return Err(ProtocolError::InvalidChunkSize.into()),
                },
                State::ChunkDataLf => {
                    if byte != b'\n' {
                        return Err(ProtocolError::LfExpected.into());
                    }
                    self.state = State::ChunkSize;
                }
                State::TrailerLineStart => match byte {
                    b'\r' => self.state = State::TrailersLf,
                    b'\n' => return self.complete_message(handler, i + 1),
                    _ => self.state = State::TrailerLine,
                },
                State::TrailerLine => match byte {
                    b'\r' => self.state = State::TrailerLineLf,
                    b'\n' => self.state = State::TrailerLineStart,
                    _ => {}
                },
                State::TrailerLineLf => {
                    if byte != b'\n' {
                        return Err(ProtocolError::LfExpected.into());
                    }
                    self.state = State::TrailerLineStart;
                }
                State::TrailersLf => {
                    if byte != b'\n' {
                        return Err(ProtocolError::LfExpected.into());
                    }
                    return self.complete_message(handler, i + 1);
                }
                State::Url | State::Body { .. } | State::ChunkData { .. } => {
                    unreachable!("bulk states are handled above")
                }
            }
            i += 1;
        }

        // Report whatever part of the open token arrived in this input
        let end = input.len();
        match self.state {
            State::Method => emit!(handler.on_method, input, mark, end),
            State::Url => emit!(handler.on_url, input, mark, end),
            State::Version => emit!(handler.on_version, input, mark, end),
            State::HeaderField => {
                if let Some(start) = mark.take() {
                    if start < end {
                        self.field_fragment(&input[start..], handler)?;
                    }
                }
            }
            State::HeaderValue => {
                if let Some(start) = mark.take() {
                    self.value_fragment(&input[start..], handler)?;
                }
            }
            _ => {}
        }

        Ok(Progress::NeedsMore)
    }

    fn field_fragment<H: Handler>(
        &mut self,
        fragment: &[u8],
        handler: &mut H,
    ) -> Result<(), Error<H::Error>> {
        if self.name.len() + fragment.len() > MAX_TRACKED_NAME {
            self.name_overflow = true;
        } else {
            self.name.extend_from_slice(fragment);
        }
        call!(handler.on_header_field(fragment));
        Ok(())
    }

    fn complete_field<H: Handler>(&mut self, handler: &mut H) -> Result<(), Error<H::Error>> {
        call!(handler.on_header_field_complete());
        self.tracked = if self.name_overflow {
            Tracked::None
        } else if self.name.eq_ignore_ascii_case(b"content-length") {
            Tracked::ContentLength
        } else if self.name.eq_ignore_ascii_case(b"transfer-encoding") {
            Tracked::TransferEncoding
        } else {
            Tracked::None
        };
        self.name.clear();
        self.name_overflow = false;
        Ok(())
    }

    fn value_fragment<H: Handler>(
        &mut self,
        fragment: &[u8],
        handler: &mut H,
    ) -> Result<(), Error<H::Error>> {
        if fragment.is_empty() {
            return Ok(());
        }
        if self.tracked != Tracked::None {
            self.value.extend_from_slice(fragment);
        }
        call!(handler.on_header_value(fragment));
        Ok(())
    }

    fn flush_pending_ws<H: Handler>(&mut self, handler: &mut H) -> Result<(), Error<H::Error>> {
        let mut ws = std::mem::take(&mut self.pending_ws);
        let result = self.value_fragment(&ws, handler);
        ws.clear();
        self.pending_ws = ws;
        result
    }

    fn complete_value<H: Handler>(&mut self, handler: &mut H) -> Result<(), Error<H::Error>> {
        call!(handler.on_header_value_complete());
        match self.tracked {
            Tracked::ContentLength => {
                let length = parse_content_length(&self.value)?;
                match self.content_length {
                    Some(previous) if previous != length => {
                        return Err(ProtocolError::DuplicateContentLength.into());
                    }
                    _ => self.content_length = Some(length),
                }
            }
            Tracked::TransferEncoding => {
                let last = self
                    .value
                    .rsplit(|&b| b == b',')
                    .next()
                    .unwrap_or_default()
                    .trim_ascii();
                if !last.eq_ignore_ascii_case(b"chunked") {
                    return Err(ProtocolError::UnsupportedTransferEncoding.into());
                }
                self.chunked = true;
            }
            Tracked::None => {}
        }
        self.tracked = Tracked::None;
        self.value.clear();
        Ok(())
    }

    fn end_headers<H: Handler>(
        &mut self,
        handler: &mut H,
        consumed: usize,
    ) -> Result<Option<Progress>, Error<H::Error>> {
        call!(handler.on_headers_complete());

        if self.chunked {
            if self.content_length.is_some() {
                return Err(ProtocolError::ContentLengthWithTransferEncoding.into());
            }
            self.state = State::ChunkSize;
            return Ok(None);
        }

        match self.content_length {
            Some(remaining) if remaining > 0 => {
                self.state = State::Body { remaining };
                Ok(None)
            }
            // Requests without framing headers carry no body
            _ => self.complete_message(handler, consumed).map(Some),
        }
    }

    fn end_chunk_size(&mut self) {
        self.state = if self.chunk_size == 0 {
            State::TrailerLineStart
        } else {
            State::ChunkData { remaining: self.chunk_size }
        };
        self.chunk_size = 0;
        self.chunk_digits = false;
    }

    fn complete_message<H: Handler>(
        &mut self,
        handler: &mut H,
        consumed: usize,
    ) -> Result<Progress, Error<H::Error>> {
        call!(handler.on_message_complete());
        self.reset_message();
        Ok(Progress::Complete { consumed })
    }

    fn reset_message(&mut self) {
        self.state = State::MessageStart;
        self.name.clear();
        self.name_overflow = false;
        self.tracked = Tracked::None;
        self.value.clear();
        self.pending_ws.clear();
        self.content_length = None;
        self.chunked = false;
        self.chunk_size = 0;
        self.chunk_digits = false;
    }
}

fn parse_content_length(value: &[u8]) -> Result<u64, ProtocolError> {
    if value.is_empty() {
        return Err(ProtocolError::InvalidContentLength);
    }
    value
        .iter()
        .try_fold(0u64, |acc, &b| {
            if !b.is_ascii_digit() {
                return None;
            }
            acc.checked_mul(10)?.checked_add(u64::from(b - b'0'))
        })
        .ok_or(ProtocolError::InvalidContentLength)
}

#[inline]
fn hex_value(b: u8) -> u64 {
    match b {
        b'0'..=b'9' => u64::from(b - b'0'),
        b'a'..=b'f' => u64::from(b - b'a' + 10),
        b'A'..=b'F' => u64::from(b - b'A' + 10),
        _ => 0,
    }
}

/// RFC 9110 `tchar`
#[inline]
fn is_token(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_'
                | b'`' | b'|' | b'~'
        )
}

#[inline]
fn is_url_byte(b: u8) -> bool {
    b > b' ' && b != 0x7f
}

#[inline]
fn is_version_byte(b: u8) -> bool {
    b.is_ascii_digit() || b == b'.'
}

#[inline]
fn is_value_byte(b: u8) -> bool {
    b == b'\t' || (b >= b' ' && b != 0x7f)
}
