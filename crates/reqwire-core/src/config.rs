//! Parser configuration
//!
//! Limits on accumulated tokens and logging switches, passed explicitly at
//! parser construction.

use crate::{Error, Result};

/// Caps on accumulated token sizes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum method token length (default: 32)
    pub max_method_len: usize,
    /// Maximum version token length (default: 16)
    pub max_version_len: usize,
    /// Maximum path length and, separately, search length (default: 8KB)
    pub max_url_len: usize,
    /// Maximum header key length (default: 8KB)
    pub max_header_key_len: usize,
    /// Maximum header value length (default: 8KB)
    pub max_header_value_len: usize,
    /// Maximum number of headers (default: 100)
    pub max_headers: usize,
    /// Maximum body size (default: 10MB)
    pub max_body_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_method_len: 32,
            max_version_len: 16,
            max_url_len: 8 * 1024,
            max_header_key_len: 8 * 1024,
            max_header_value_len: 8 * 1024,
            max_headers: 100,
            max_body_len: 10 * 1024 * 1024,
        }
    }
}

impl Limits {
    /// No caps at all
    pub fn unlimited() -> Self {
        Self {
            max_method_len: usize::MAX,
            max_version_len: usize::MAX,
            max_url_len: usize::MAX,
            max_header_key_len: usize::MAX,
            max_header_value_len: usize::MAX,
            max_headers: usize::MAX,
            max_body_len: usize::MAX,
        }
    }

    pub fn max_method_len(mut self, len: usize) -> Self {
        self.max_method_len = len;
        self
    }

    pub fn max_version_len(mut self, len: usize) -> Self {
        self.max_version_len = len;
        self
    }

    pub fn max_url_len(mut self, len: usize) -> Self {
        self.max_url_len = len;
        self
    }

    /// Set the header key and value caps together
    pub fn max_header_len(mut self, len: usize) -> Self {
        self.max_header_key_len = len;
        self.max_header_value_len = len;
        self
    }

    pub fn max_header_key_len(mut self, len: usize) -> Self {
        self.max_header_key_len = len;
        self
    }

    pub fn max_header_value_len(mut self, len: usize) -> Self {
        self.max_header_value_len = len;
        self
    }

    pub fn max_headers(mut self, count: usize) -> Self {
        self.max_headers = count;
        self
    }

    pub fn max_body_len(mut self, len: usize) -> Self {
        self.max_body_len = len;
        self
    }

    /// Parse size from string (e.g., "10mb", "1gb", "500kb")
    pub fn parse_size(s: &str) -> Result<usize> {
        let lower = s.trim().to_lowercase();

        let (num_str, multiplier) = if let Some(n) = lower.strip_suffix("gb") {
            (n, 1024 * 1024 * 1024)
        } else if let Some(n) = lower.strip_suffix("mb") {
            (n, 1024 * 1024)
        } else if let Some(n) = lower.strip_suffix("kb") {
            (n, 1024)
        } else if let Some(n) = lower.strip_suffix('b') {
            (n, 1)
        } else {
            (lower.as_str(), 1)
        };

        num_str
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|num| num.checked_mul(multiplier))
            .ok_or_else(|| Error::InvalidSize(s.to_string()))
    }
}

/// Parser configuration
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Token size caps
    pub limits: Limits,
    /// Log every tokenizer event at trace level
    pub log_events: bool,
    /// Log protocol errors and limit violations at warn level
    pub log_errors: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            log_events: false,
            log_errors: true,
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn log_events(mut self) -> Self {
        self.log_events = true;
        self
    }

    pub fn quiet(mut self) -> Self {
        self.log_events = false;
        self.log_errors = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_headers, 100);
        assert_eq!(limits.max_body_len, 10 * 1024 * 1024);
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(Limits::parse_size("10mb").unwrap(), 10 * 1024 * 1024);
        assert_eq!(Limits::parse_size("500KB").unwrap(), 500 * 1024);
        assert_eq!(Limits::parse_size("1gb").unwrap(), 1024 * 1024 * 1024);
        assert_eq!(Limits::parse_size("100b").unwrap(), 100);
        assert_eq!(Limits::parse_size(" 100 ").unwrap(), 100);
        assert_eq!(
            Limits::parse_size("lots"),
            Err(Error::InvalidSize("lots".to_string()))
        );
    }

    #[test]
    fn test_config_builder() {
        let config = ParserConfig::new()
            .limits(Limits::default().max_headers(4).max_body_len(16))
            .log_events();
        assert!(config.log_events);
        assert!(config.log_errors);
        assert_eq!(config.limits.max_headers, 4);
        assert_eq!(config.limits.max_body_len, 16);

        let quiet = config.quiet();
        assert!(!quiet.log_events && !quiet.log_errors);
    }

    #[test]
    fn test_token_limit_setters() {
        let limits = Limits::unlimited()
            .max_method_len(8)
            .max_version_len(4)
            .max_header_key_len(64)
            .max_header_value_len(256);
        assert_eq!(limits.max_method_len, 8);
        assert_eq!(limits.max_version_len, 4);
        assert_eq!(limits.max_header_key_len, 64);
        assert_eq!(limits.max_header_value_len, 256);
        assert_eq!(limits.max_url_len, usize::MAX);

        let both = Limits::default().max_header_len(10);
        assert_eq!((both.max_header_key_len, both.max_header_value_len), (10, 10));
    }
}
