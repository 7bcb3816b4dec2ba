//! 12-byte object identifiers, rendered as 24 hex characters.
//!
//! Layout (big-endian):
//!
//! | bytes | content                               |
//! |-------|---------------------------------------|
//! | 0..4  | seconds since the Unix epoch          |
//! | 4..9  | per-process value, fixed at first use |
//! | 9..12 | wrapping counter                      |

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

/// Number of hex characters in a rendered identifier.
pub const HEX_LEN: usize = 24;

const HEX_ALPHABET: &[u8; 16] = b"0123456789abcdef";

/// Counter values wrap at 24 bits.
const COUNTER_MASK: u32 = 0x00FF_FFFF;

/// Error returned when parsing an identifier from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("identifier must be {HEX_LEN} hex characters (got {0})")]
    InvalidLength(usize),

    #[error("identifier contains non-hex character {0:?}")]
    InvalidCharacter(char),
}

/// A store-generated identifier for issues and projects.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Generates a fresh identifier stamped with the current time.
    pub fn new() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        // Truncation is intended: the timestamp field is 32 bits wide.
        Self::with_seconds(secs as u32)
    }

    /// Generates an identifier with an explicit timestamp component.
    pub fn with_seconds(secs: u32) -> Self {
        let seed = process_seed();
        let count = next_count();

        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&seed.unique);
        bytes[9..12].copy_from_slice(&count.to_be_bytes()[1..4]);
        Self(bytes)
    }

    /// Renders the identifier as 24 lowercase hex characters.
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(HEX_LEN);
        for byte in self.0 {
            out.push(HEX_ALPHABET[(byte >> 4) as usize] as char);
            out.push(HEX_ALPHABET[(byte & 0x0F) as usize] as char);
        }
        out
    }

    /// Parses a 24-character hex string (either case).
    pub fn parse_str(s: &str) -> Result<Self, IdError> {
        if s.len() != HEX_LEN {
            return Err(IdError::InvalidLength(s.chars().count()));
        }

        let mut bytes = [0u8; 12];
        let raw = s.as_bytes();
        for (i, byte) in bytes.iter_mut().enumerate() {
            let hi = hex_value(raw[i * 2])?;
            let lo = hex_value(raw[i * 2 + 1])?;
            *byte = (hi << 4) | lo;
        }
        Ok(Self(bytes))
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_str(&s).map_err(serde::de::Error::custom)
    }
}

fn hex_value(c: u8) -> Result<u8, IdError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        other => Err(IdError::InvalidCharacter(other as char)),
    }
}

// ---------------------------------------------------------------------------
// Process-wide generator state
// ---------------------------------------------------------------------------

struct ProcessSeed {
    unique: [u8; 5],
    counter: AtomicU32,
}

fn process_seed() -> &'static ProcessSeed {
    static SEED: OnceLock<ProcessSeed> = OnceLock::new();
    SEED.get_or_init(|| {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let content = format!(
            "{}|{}|{:?}",
            std::process::id(),
            nanos,
            std::thread::current().id()
        );
        let hash = Sha256::digest(content.as_bytes());

        let mut unique = [0u8; 5];
        unique.copy_from_slice(&hash[..5]);
        let start = u32::from_be_bytes([0, hash[5], hash[6], hash[7]]);

        ProcessSeed {
            unique,
            counter: AtomicU32::new(start),
        }
    })
}

fn next_count() -> u32 {
    process_seed().counter.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK
}
