//! Event sink for the tokenizer
//!
//! One method per lexical event. Fragment methods may be called any number
//! of times (including zero) before the matching `*_complete` method; each
//! call carries the bytes of the token that arrived in the current input.

/// Receives tokenizer events in wire order.
///
/// Every method has a no-op default so a handler only implements the events
/// it cares about. Returning `Err` aborts the current `execute` call and
/// leaves the tokenizer failed.
pub trait Handler {
    /// Error a callback may abort with
    type Error;

    fn on_method(&mut self, fragment: &[u8]) -> Result<(), Self::Error> {
        let _ = fragment;
        Ok(())
    }

    fn on_method_complete(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn on_url(&mut self, fragment: &[u8]) -> Result<(), Self::Error> {
        let _ = fragment;
        Ok(())
    }

    fn on_url_complete(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Version text after `HTTP/`, e.g. `1.1`
    fn on_version(&mut self, fragment: &[u8]) -> Result<(), Self::Error> {
        let _ = fragment;
        Ok(())
    }

    fn on_version_complete(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn on_header_field(&mut self, fragment: &[u8]) -> Result<(), Self::Error> {
        let _ = fragment;
        Ok(())
    }

    fn on_header_field_complete(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Header value bytes, leading and trailing whitespace excluded
    fn on_header_value(&mut self, fragment: &[u8]) -> Result<(), Self::Error> {
        let _ = fragment;
        Ok(())
    }

    fn on_header_value_complete(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn on_headers_complete(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Decoded body bytes (chunk framing already removed)
    fn on_body(&mut self, fragment: &[u8]) -> Result<(), Self::Error> {
        let _ = fragment;
        Ok(())
    }

    fn on_message_complete(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
