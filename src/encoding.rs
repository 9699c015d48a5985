//! Character counting for the length rules
//!
//! Rust strings are always UTF-8, so the configured encoding does not
//! decode anything. It only decides what a "character" is when counting:
//! multi-byte encodings count Unicode scalar values, single-byte encodings
//! count bytes.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// How length rules count characters.
///
/// # Example
///
/// ```rust
/// use sluice::Encoding;
///
/// let utf8: Encoding = "UTF-8".parse().unwrap();
/// assert_eq!(utf8.count("héllo"), 5);
///
/// let bytes: Encoding = "8bit".parse().unwrap();
/// assert_eq!(bytes.count("héllo"), 6);
///
/// assert!("ebcdic".parse::<Encoding>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// UTF-8/16/32: one character per Unicode scalar value.
    #[default]
    Unicode,
    /// 8bit, ASCII, Latin-1: one character per byte.
    SingleByte,
}

impl Encoding {
    /// Count the characters of `s` under this encoding.
    #[inline]
    pub fn count(self, s: &str) -> usize {
        match self {
            Encoding::Unicode => s.chars().count(),
            Encoding::SingleByte => s.len(),
        }
    }
}

impl FromStr for Encoding {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let normalized = name.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "utf-8" | "utf8" | "utf-16" | "utf16" | "utf-32" | "utf32" | "ucs-2" | "ucs-4" => {
                Ok(Encoding::Unicode)
            }
            "8bit" | "binary" | "ascii" | "us-ascii" | "latin1" | "latin-1" | "iso-8859-1" => {
                Ok(Encoding::SingleByte)
            }
            _ => Err(ConfigError::UnknownEncoding(name.to_string())),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Unicode => f.write_str("UTF-8"),
            Encoding::SingleByte => f.write_str("8bit"),
        }
    }
}
