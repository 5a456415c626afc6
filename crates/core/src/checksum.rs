//! Checksums recorded for stored objects
//!
//! Both digests are rendered as upper-case hex. CRC32 is zero-padded to
//! 8 digits, SHA256 is always 64 digits.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Supported checksum algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashMethod {
    /// 32-bit cyclic redundancy check
    Crc32,
    /// SHA-256
    Sha256,
}

impl HashMethod {
    /// All methods, in the order they are recorded
    pub const ALL: [HashMethod; 2] = [HashMethod::Crc32, HashMethod::Sha256];

    /// Canonical upper-case name (`CRC32` or `SHA256`)
    pub fn name(&self) -> &'static str {
        match self {
            HashMethod::Crc32 => "CRC32",
            HashMethod::Sha256 => "SHA256",
        }
    }

    /// Key used for this method in result records (`crc32` or `sha256`)
    pub fn key(&self) -> &'static str {
        match self {
            HashMethod::Crc32 => "crc32",
            HashMethod::Sha256 => "sha256",
        }
    }

    /// Length of the hex digest
    pub fn digest_len(&self) -> usize {
        match self {
            HashMethod::Crc32 => 8,
            HashMethod::Sha256 => 64,
        }
    }

    /// Method whose digest has the given hex length
    pub fn for_digest_len(len: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.digest_len() == len)
    }

    /// Hex digest of `bytes`
    pub fn digest(&self, bytes: &[u8]) -> String {
        match self {
            HashMethod::Crc32 => crc32_hex(bytes),
            HashMethod::Sha256 => sha256_hex(bytes),
        }
    }
}

impl fmt::Display for HashMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CRC32" => Ok(HashMethod::Crc32),
            "SHA256" => Ok(HashMethod::Sha256),
            other => Err(format!("unknown hash method '{}'", other)),
        }
    }
}

/// Upper-case, zero-padded CRC32 of `bytes`
pub fn crc32_hex(bytes: &[u8]) -> String {
    format!("{:08X}", crc32fast::hash(bytes))
}

/// Upper-case SHA256 of `bytes`
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:X}", Sha256::digest(bytes))
}

/// Checksum pair of one object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksums {
    /// CRC32 hex digest
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crc32: Option<String>,
    /// SHA256 hex digest
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

impl Checksums {
    /// Both digests of `bytes`
    pub fn of(bytes: &[u8]) -> Self {
        Self {
            crc32: Some(crc32_hex(bytes)),
            sha256: Some(sha256_hex(bytes)),
        }
    }

    /// A record carrying a single digest under the method's key
    pub fn single(method: HashMethod, digest: impl Into<String>) -> Self {
        let digest = Some(digest.into());
        match method {
            HashMethod::Crc32 => Self {
                crc32: digest,
                sha256: None,
            },
            HashMethod::Sha256 => Self {
                crc32: None,
                sha256: digest,
            },
        }
    }

    /// Digest recorded for `method`
    pub fn get(&self, method: HashMethod) -> Option<&str> {
        match method {
            HashMethod::Crc32 => self.crc32.as_deref(),
            HashMethod::Sha256 => self.sha256.as_deref(),
        }
    }

    /// The digest shown in short stamps: CRC32, else SHA256
    pub fn short(&self) -> Option<&str> {
        self.crc32.as_deref().or(self.sha256.as_deref())
    }

    /// True if neither digest is recorded
    pub fn is_empty(&self) -> bool {
        self.crc32.is_none() && self.sha256.is_none()
    }
}
