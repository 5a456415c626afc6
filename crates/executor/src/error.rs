//! Error types for command execution.
//!
//! All errors surfaced by the dispatcher are represented by the [`Error`]
//! enum. Messages carry the concrete detail a user needs to fix the
//! command: the offending keyword, the expected parameter kind, or a ranked
//! list of the syntaxes the command was closest to.
//!
//! # Categories
//!
//! | Category | Variants | Description |
//! |----------|----------|-------------|
//! | Setup | `Configuration` | No session, bad settings, missing secrets |
//! | Grammar | `NoHandlerMatched`, `MalformedCommand` | Command does not parse or match |
//! | Parameters | `Validation`, `InvalidIdentifier`, `NameNotFound`, `NotCallable` | Bad argument values |
//! | Integrity | `ChecksumMismatch` | `assert` failed |
//! | Storage | `Storage` | Archive, codec and I/O failures |

/// Command execution errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // ==================== Setup ====================
    /// Session missing or settings unusable
    #[error("{reason}")]
    Configuration {
        /// What is wrong
        reason: String,
    },

    // ==================== Grammar ====================
    /// No syntax of the action reached full required concordance
    #[error("No command matched. Did you mean:{suggestions}")]
    NoHandlerMatched {
        /// Main keyword of the action
        action: String,
        /// Ranked syntaxes, each with its misses
        suggestions: String,
    },

    /// Tokens do not form a command
    #[error("malformed command: {reason}")]
    MalformedCommand {
        /// What is wrong
        reason: String,
    },

    // ==================== Parameters ====================
    /// A value failed its validator, or a disallowed keyword was given
    #[error("{reason}")]
    Validation {
        /// What is wrong
        reason: String,
    },

    /// Syntactically invalid identifier
    #[error("'{name}' is not a valid {kind} name")]
    InvalidIdentifier {
        /// `variable`, `function` or `identifier`
        kind: String,
        /// The offending value
        name: String,
    },

    /// Valid identifier absent from the namespace
    #[error("{kind} '{name}' is not defined in the global namespace")]
    NameNotFound {
        /// `variable` or `function`
        kind: String,
        /// The (possibly dotted) name
        name: String,
    },

    /// A `with` target that cannot be invoked
    #[error("'{name}' is not a function")]
    NotCallable {
        /// The resolved name
        name: String,
    },

    // ==================== Integrity ====================
    /// Stored checksum differs from the asserted one
    #[error("{method} checksum of '{subject}' is {calculated}, expected {expected}")]
    ChecksumMismatch {
        /// Archive path that was checked
        subject: String,
        /// `CRC32` or `SHA256`
        method: String,
        /// Digest given in the command
        expected: String,
        /// Digest of the stored bytes
        calculated: String,
    },

    // ==================== Storage ====================
    /// Failure reported by the storage backend
    #[error(transparent)]
    Storage(#[from] vault_core::Error),
}

impl Error {
    /// Create a configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Create a validation error
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Create a malformed command error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedCommand {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_not_found_message() {
        let err = Error::NameNotFound {
            kind: "function".to_string(),
            name: "pipe_delimited".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "function 'pipe_delimited' is not defined in the global namespace"
        );
    }

    #[test]
    fn test_invalid_identifier_message() {
        let err = Error::InvalidIdentifier {
            kind: "variable".to_string(),
            name: "1x".to_string(),
        };
        assert_eq!(err.to_string(), "'1x' is not a valid variable name");
    }

    #[test]
    fn test_no_handler_message_prefix() {
        let err = Error::NoHandlerMatched {
            action: "store".to_string(),
            suggestions: "\n\t - store <one_or_many_variables> in <module> []".to_string(),
        };
        assert!(err
            .to_string()
            .starts_with("No command matched. Did you mean:\n\t - store"));
    }

    #[test]
    fn test_storage_error_is_transparent() {
        let err: Error = vault_core::Error::not_found("a/b").into();
        assert_eq!(
            err.to_string(),
            "There is no item named 'a/b' in the archive"
        );
    }
}
