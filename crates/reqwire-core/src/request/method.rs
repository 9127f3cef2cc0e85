//! HTTP Method enum
//!
//! Only the methods the assembler recognizes. Any other method token leaves
//! the request's method unset.

use crate::{Error, Result};
use std::str::FromStr;

/// HTTP Method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Method {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
    Head = 4,
    Options = 5,
}

impl Method {
    /// Map a method token, exact and case-sensitive
    #[inline]
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        // Fast path: check first byte
        match bytes.first()? {
            b'G' if bytes == b"GET" => Some(Method::Get),
            b'P' => match bytes {
                b"POST" => Some(Method::Post),
                b"PUT" => Some(Method::Put),
                _ => None,
            },
            b'D' if bytes == b"DELETE" => Some(Method::Delete),
            b'H' if bytes == b"HEAD" => Some(Method::Head),
            b'O' if bytes == b"OPTIONS" => Some(Method::Options),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }
}

impl FromStr for Method {
    type Err = Error;

    /// Parse from string (case-insensitive)
    fn from_str(s: &str) -> Result<Self> {
        Method::parse(s.to_ascii_uppercase().as_bytes())
            .ok_or_else(|| Error::Conversion(format!("unrecognized method: {s}")))
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse_bytes() {
        assert_eq!(Method::parse(b"GET"), Some(Method::Get));
        assert_eq!(Method::parse(b"POST"), Some(Method::Post));
        assert_eq!(Method::parse(b"PUT"), Some(Method::Put));
        assert_eq!(Method::parse(b"DELETE"), Some(Method::Delete));
        assert_eq!(Method::parse(b"HEAD"), Some(Method::Head));
        assert_eq!(Method::parse(b"OPTIONS"), Some(Method::Options));
        assert_eq!(Method::parse(b"PATCH"), None);
        assert_eq!(Method::parse(b"get"), None);
        assert_eq!(Method::parse(b"GETX"), None);
        assert_eq!(Method::parse(b""), None);
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!("GET".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("options".parse::<Method>().unwrap(), Method::Options);
        assert!("TRACE".parse::<Method>().is_err());
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Delete.to_string(), "DELETE");
        assert_eq!(Method::Head.as_str(), "HEAD");
    }
}
