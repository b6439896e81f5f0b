//! AES-256 archive keys

use std::fmt;
use std::str::FromStr;

use crate::error::{KeyError, Result};

/// Size of an archive key in bytes
pub const KEY_SIZE: usize = 32;

/// A 256-bit AES key used to open one or more archives
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AesKey([u8; KEY_SIZE]);

impl AesKey {
    /// Create a key from raw bytes
    pub const fn new(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Parse a key from hex, with or without a leading `0x`
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.trim();
        let hex = hex
            .strip_prefix("0x")
            .or_else(|| hex.strip_prefix("0X"))
            .unwrap_or(hex);

        let bytes = hex::decode(hex)
            .map_err(|e| KeyError::InvalidKeyFormat(format!("invalid hex: {e}")))?;

        if bytes.len() != KEY_SIZE {
            return Err(KeyError::InvalidKeySize {
                expected: KEY_SIZE,
                actual: bytes.len(),
            });
        }

        let mut key = [0u8; KEY_SIZE];
        key.copy_from_slice(&bytes);
        Ok(Self(key))
    }

    /// Raw key bytes
    pub const fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    /// Upper-case hex with a `0x` prefix, the form decoders usually accept
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode_upper(self.0))
    }
}

impl FromStr for AesKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for AesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// Keys end up in logs via `{:?}` on larger structs, so only show a prefix.
impl fmt::Debug for AesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AesKey({}..)", hex::encode_upper(&self.0[..4]))
    }
}
