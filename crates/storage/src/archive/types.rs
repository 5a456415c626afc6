//! Archive core types
//!
//! Types for the vault archive format (`.vault`, a zstd-compressed tar)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use vault_core::Checksums;

/// Current archive format version
pub const VAULT_FORMAT_VERSION: u32 = 1;

/// PBKDF2 rounds used when a new archive is encrypted
pub const DEFAULT_KDF_ITERATIONS: u32 = 100_000;

/// Archive paths
pub mod paths {
    /// Manifest file
    pub const MANIFEST: &str = "vault/MANIFEST.json";
    /// Prefix of stored objects
    pub const DATA_PREFIX: &str = "vault/data/";

    /// Tar entry name of a stored object
    pub fn data(member: &str) -> String {
        format!("{}{}", DATA_PREFIX, member)
    }
}

// =============================================================================
// MANIFEST.json
// =============================================================================

/// Archive manifest: format metadata, key derivation and member checksums
///
/// The manifest is always stored in clear text; only member payloads are
/// encrypted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Manifest {
    /// Format version (currently 1)
    pub format_version: u32,

    /// Version of the crate that last wrote the archive
    pub writer_version: String,

    /// Key derivation parameters, present once anything was encrypted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kdf: Option<KdfHeader>,

    /// One entry per stored object, keyed by vault path
    #[serde(default)]
    pub members: BTreeMap<String, MemberEntry>,
}

impl Manifest {
    /// Create an empty manifest
    pub fn new() -> Self {
        Self {
            format_version: VAULT_FORMAT_VERSION,
            writer_version: env!("CARGO_PKG_VERSION").to_string(),
            kdf: None,
            members: BTreeMap::new(),
        }
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new()
    }
}

/// PBKDF2-HMAC-SHA256 parameters shared by every encrypted member
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KdfHeader {
    /// Random salt
    pub salt: Vec<u8>,
    /// Iteration count
    pub iterations: u32,
}

/// Manifest entry of one stored object
///
/// Size and checksums always describe the plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemberEntry {
    /// Plaintext size in bytes
    pub size: u64,
    /// Upper-case CRC32 hex
    pub crc32: String,
    /// Upper-case SHA256 hex
    pub sha256: String,
    /// Whether the payload is sealed with AES-256-GCM
    pub encrypted: bool,
}

impl MemberEntry {
    /// Describe `plaintext`
    pub fn describe(plaintext: &[u8], encrypted: bool) -> Self {
        let sums = Checksums::of(plaintext);
        Self {
            size: plaintext.len() as u64,
            crc32: sums.crc32.unwrap_or_default(),
            sha256: sums.sha256.unwrap_or_default(),
            encrypted,
        }
    }

    /// Both recorded checksums
    pub fn checksums(&self) -> Checksums {
        Checksums {
            crc32: Some(self.crc32.clone()),
            sha256: Some(self.sha256.clone()),
        }
    }
}
