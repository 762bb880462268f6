//! Content hashes used as registry keys.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

/// A 64-bit xxHash3 digest, written as 16 lowercase hex digits.
///
/// Serialized as a string so it can be used as a JSON map key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ContentHash(u64);

impl ContentHash {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    /// Hash raw bytes.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(xxh3_64(bytes))
    }

    /// Hash a name, e.g. to derive the key of a combination.
    pub fn of_name(name: &str) -> Self {
        Self::of_bytes(name.as_bytes())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:016x})", self.0)
    }
}

/// Returned when a string is not exactly 16 hex digits.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid content hash '{0}': expected 16 hex digits")]
pub struct ParseContentHashError(String);

impl FromStr for ContentHash {
    type Err = ParseContentHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 16 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseContentHashError(s.to_string()));
        }
        u64::from_str_radix(s, 16)
            .map(Self)
            .map_err(|_| ParseContentHashError(s.to_string()))
    }
}

impl Serialize for ContentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContentHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_display_is_padded_hex() {
        assert_eq!(ContentHash::new(0xabc).to_string(), "0000000000000abc");
    }

    #[test]
    fn test_parse() {
        let hash: ContentHash = "0123456789abcdef".parse().unwrap();
        assert_eq!(hash.value(), 0x0123456789abcdef);

        assert!("0123".parse::<ContentHash>().is_err());
        assert!("0x23456789abcdef".parse::<ContentHash>().is_err());
        assert!("0123456789abcdeg".parse::<ContentHash>().is_err());
    }

    #[test]
    fn test_of_name_deterministic() {
        assert_eq!(ContentHash::of_name("base-A"), ContentHash::of_name("base-A"));
        assert_ne!(ContentHash::of_name("base-A"), ContentHash::of_name("base-B"));
    }

    #[test]
    fn test_json_map_key() {
        let mut map = BTreeMap::new();
        map.insert(ContentHash::new(1), "one");

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"0000000000000001":"one"}"#);

        let loaded: BTreeMap<ContentHash, String> = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded[&ContentHash::new(1)], "one");
    }
}
