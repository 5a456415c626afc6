//! Error types for the vault core
//!
//! Errors raised by storage backends, codecs and namespace resolution.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use std::io;
use thiserror::Error;

/// Result type alias for vault core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types shared by the storage collaborators
#[derive(Debug, Error)]
pub enum Error {
    /// No object stored under the given path
    #[error("There is no item named '{path}' in the archive")]
    NotFound {
        /// Path inside the archive
        path: String,
    },

    /// Name absent from the namespace
    #[error("'{name}' is not defined")]
    NameNotFound {
        /// The (possibly dotted) name that was looked up
        name: String,
    },

    /// Attribute access on a resolved binding failed
    #[error("'{object}' has no attribute '{attribute}'")]
    AttributeNotFound {
        /// The dotted prefix that resolved
        object: String,
        /// The attribute that was missing
        attribute: String,
    },

    /// Stored bytes do not match the recorded checksum
    #[error("integrity check failed for '{path}': expected CRC32 {expected}, got {actual}")]
    Integrity {
        /// Path inside the archive
        path: String,
        /// Checksum recorded in the manifest
        expected: String,
        /// Checksum of the bytes actually read
        actual: String,
    },

    /// Member is encrypted but the session has no password
    #[error("File '{path}' is encrypted, password required for extraction")]
    PasswordRequired {
        /// Path inside the archive
        path: String,
    },

    /// Member could not be decrypted with the configured password
    #[error("cannot decrypt '{path}': wrong password or corrupted data")]
    Decryption {
        /// Path inside the archive
        path: String,
    },

    /// Frame shape is inconsistent
    #[error("invalid frame: {reason}")]
    InvalidFrame {
        /// What is wrong with the frame
        reason: String,
    },

    /// Exporter or importer failed
    #[error("codec error: {reason}")]
    Codec {
        /// Failure reported by the codec
        reason: String,
    },

    /// Archive container is unreadable or could not be written
    #[error("archive error: {reason}")]
    Archive {
        /// Underlying failure
        reason: String,
    },

    /// Serialization/deserialization error
    #[error("serialization error: {reason}")]
    Serialization {
        /// Underlying failure
        reason: String,
    },

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create a codec error
    pub fn codec(reason: impl Into<String>) -> Self {
        Self::Codec {
            reason: reason.into(),
        }
    }

    /// Create an invalid frame error
    pub fn invalid_frame(reason: impl Into<String>) -> Self {
        Self::InvalidFrame {
            reason: reason.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization {
            reason: e.to_string(),
        }
    }
}
