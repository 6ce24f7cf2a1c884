//! Opaque file identifiers

use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Random identifier for a stored file.
///
/// 128 bits drawn from the operating system CSPRNG, rendered as 32
/// lowercase hex characters. Independent of the file's content.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct FileId([u8; 16]);

impl FileId {
    /// Length of the rendered identifier.
    pub const LEN: usize = 32;

    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Parse a rendered identifier.
    ///
    /// Accepts exactly 32 lowercase hex characters; anything else, including
    /// uppercase hex, is rejected so each file has a single spelling.
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() != Self::LEN || !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return None;
        }
        let mut bytes = [0u8; 16];
        hex::decode_to_slice(s, &mut bytes).ok()?;
        Some(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self)
    }
}

impl FromStr for FileId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| Error::invalid("expected 32 lowercase hex characters"))
    }
}

impl From<FileId> for String {
    fn from(id: FileId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for FileId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_are_32_lowercase_hex() {
        let id = FileId::generate().to_string();
        assert_eq!(id.len(), FileId::LEN);
        assert!(id.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
    }

    #[test]
    fn generated_ids_do_not_repeat() {
        let ids: HashSet<FileId> = (0..1000).map(|_| FileId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn parse_round_trips_display() {
        let id = FileId::generate();
        assert_eq!(FileId::parse(&id.to_string()), Some(id));
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(FileId::parse("").is_none());
        assert!(FileId::parse("0123456789abcdef").is_none());
        assert!(FileId::parse("0123456789ABCDEF0123456789abcdef").is_none());
        assert!(FileId::parse("0123456789abcdef0123456789abcdeg").is_none());
        assert!(FileId::parse("0123456789abcdef0123456789abcdef0").is_none());
    }

    #[test]
    fn from_str_reports_invalid_identifier() {
        let err = "nope".parse::<FileId>().unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier { .. }));
    }

    #[test]
    fn serde_uses_string_form() {
        let id = FileId::parse("00112233445566778899aabbccddeeff").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00112233445566778899aabbccddeeff\"");
        let back: FileId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
