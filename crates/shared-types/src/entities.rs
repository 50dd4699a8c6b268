//! # Core Ledger Entities
//!
//! Primitive types shared by the range ledger and its collaborators.
//!
//! ## Clusters
//!
//! - **Token space**: `TokenId`, `Timestamp`
//! - **Ownership**: `Identity`
//! - **Classification**: `Tag`

use serde::{Deserialize, Serialize};
use std::fmt;

/// A token ID. The minted space is `[1, total_supply]`; `0` is never a valid ID.
pub type TokenId = u64;

/// Unix epoch seconds.
pub type Timestamp = u64;

/// Lock time meaning "not locked".
pub const UNLOCKED: Timestamp = 0;

/// A 20-byte holder identity.
///
/// Resolution from network addresses to identities is performed by the
/// identity registrar; the ledger only ever sees the resolved value.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Identity(pub [u8; 20]);

impl Identity {
    /// Create an identity from raw bytes.
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Identity whose every byte is `byte`. Handy for fixtures.
    pub const fn repeat(byte: u8) -> Self {
        Self([byte; 20])
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl From<[u8; 20]> for Identity {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Opaque classification blob attached to a range.
///
/// Tags carry no meaning for the ledger; they are compared for equality only.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag(Vec<u8>);

impl Tag {
    /// Create a tag from bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Parse a hex string, with or without a leading `0x`.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        hex::decode(digits).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[u8]> for Tag {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for Tag {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes.to_vec())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}
