//! HTTP version of a request line

/// HTTP version, from the text after `HTTP/`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Version {
    #[default]
    Unknown,
    Http11,
    Http2,
    Http3,
}

impl Version {
    /// Map a version token such as `1.1`; anything unrecognized is `Unknown`
    #[inline]
    pub fn parse(bytes: &[u8]) -> Self {
        match bytes {
            b"1.1" => Version::Http11,
            b"2" => Version::Http2,
            b"3" => Version::Http3,
            _ => Version::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Version::Unknown => "UNKNOWN",
            Version::Http11 => "HTTP/1.1",
            Version::Http2 => "HTTP/2",
            Version::Http3 => "HTTP/3",
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        assert_eq!(Version::parse(b"1.1"), Version::Http11);
        assert_eq!(Version::parse(b"2"), Version::Http2);
        assert_eq!(Version::parse(b"3"), Version::Http3);
        assert_eq!(Version::parse(b"1.0"), Version::Unknown);
        assert_eq!(Version::parse(b"2.0"), Version::Unknown);
        assert_eq!(Version::parse(b""), Version::Unknown);
    }

    #[test]
    fn test_version_default() {
        assert_eq!(Version::default(), Version::Unknown);
        assert_eq!(Version::Http11.to_string(), "HTTP/1.1");
    }
}
