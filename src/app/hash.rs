//! Fixed-size SHA-256 digest type
//!
//! Digests are stored as their raw 32 bytes rather than hex strings, so
//! comparisons never depend on the letter case of the configured value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Error returned for a malformed hex digest
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid hash format: {hash}. Expected SHA-256 hex string")]
pub struct InvalidHash {
    pub hash: String,
}

/// SHA-256 digest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Hash([u8; 32]);

impl Sha256Hash {
    /// Parse a 64-character hex string (case insensitive)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use marker_fetcher::app::Sha256Hash;
    ///
    /// let lower = Sha256Hash::from_hex(
    ///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
    /// )?;
    /// let upper = Sha256Hash::from_hex(
    ///     "E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855",
    /// )?;
    /// assert_eq!(lower, upper);
    /// # Ok::<(), marker_fetcher::app::hash::InvalidHash>(())
    /// ```
    pub fn from_hex(hex_str: &str) -> Result<Self, InvalidHash> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(hex_str, &mut bytes).map_err(|_| InvalidHash {
            hash: hex_str.to_string(),
        })?;
        Ok(Sha256Hash(bytes))
    }

    /// Digest of the given content
    pub fn digest(content: &[u8]) -> Self {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&Sha256::digest(content));
        Sha256Hash(bytes)
    }

    /// Lowercase 64-character hex representation
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Sha256Hash {
    type Err = InvalidHash;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

// Serialize as hex string for JSON compatibility
impl Serialize for Sha256Hash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Sha256Hash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let hex_string = String::deserialize(deserializer)?;
        Self::from_hex(&hex_string).map_err(serde::de::Error::custom)
    }
}
