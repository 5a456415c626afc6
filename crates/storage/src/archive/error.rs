//! Archive error types

use std::io;
use thiserror::Error;

/// Errors that can occur while reading or rewriting a vault archive
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// No member stored under the given path
    #[error("Member not found: {0}")]
    MemberNotFound(String),

    /// Invalid archive structure
    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    /// Member bytes do not match the manifest
    #[error("Checksum mismatch for {member}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Member that failed verification
        member: String,
        /// CRC32 recorded in the manifest
        expected: String,
        /// CRC32 of the bytes read
        actual: String,
    },

    /// Unsupported archive format version
    #[error("Unsupported format version: {version}. Supported: 1")]
    UnsupportedVersion {
        /// The unsupported version number
        version: u32,
    },

    /// Encrypted member read without a password
    #[error("Member is encrypted, password required: {0}")]
    PasswordRequired(String),

    /// Authentication of an encrypted member failed
    #[error("Cannot decrypt member: {0}")]
    Decryption(String),

    /// Key derivation, sealing or random generation failed
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Tar operation failed
    #[error("Archive error: {0}")]
    Archive(String),

    /// Compression/decompression failed
    #[error("Compression error: {0}")]
    Compression(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ArchiveError {
    /// Create an archive error
    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive(msg.into())
    }

    /// Create a compression error
    pub fn compression(msg: impl Into<String>) -> Self {
        Self::Compression(msg.into())
    }

    /// Create a crypto error
    pub fn crypto(msg: impl Into<String>) -> Self {
        Self::Crypto(msg.into())
    }

    /// Create an invalid archive error
    pub fn invalid_archive(msg: impl Into<String>) -> Self {
        Self::InvalidArchive(msg.into())
    }

    /// Create a member not found error
    pub fn member_not_found(path: impl Into<String>) -> Self {
        Self::MemberNotFound(path.into())
    }
}

/// Result type for archive operations
pub type ArchiveResult<T> = Result<T, ArchiveError>;

impl From<ArchiveError> for vault_core::Error {
    fn from(e: ArchiveError) -> Self {
        use vault_core::Error;
        match e {
            ArchiveError::MemberNotFound(path) => Error::NotFound { path },
            ArchiveError::ChecksumMismatch {
                member,
                expected,
                actual,
            } => Error::Integrity {
                path: member,
                expected,
                actual,
            },
            ArchiveError::PasswordRequired(path) => Error::PasswordRequired { path },
            ArchiveError::Decryption(path) => Error::Decryption { path },
            ArchiveError::Io(e) => Error::Io(e),
            ArchiveError::Json(e) => Error::Serialization {
                reason: e.to_string(),
            },
            other => Error::Archive {
                reason: other.to_string(),
            },
        }
    }
}
