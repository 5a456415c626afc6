//! Vault settings via `vault.toml` and the `open_vault` line
//!
//! Settings are layered: built-in defaults, then an optional `vault.toml`,
//! then the arguments given to `open_vault`, for example:
//!
//! ```text
//! open_vault --path project.vault -e VAULT_KEY --timestamp False
//! ```
//!
//! Every key may be given by its full name or its first letter.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::parse::{bool_or_str, parse_line, unquote, BoolOrStr};
use crate::{Error, Result};

/// Config file name looked up next to the vault
pub const CONFIG_FILE_NAME: &str = "vault.toml";

/// Session settings
///
/// # Example
///
/// ```toml
/// path = "storage.vault"
/// encryption_variable = "VAULT_KEY"
/// secure = true
/// timestamp = true
/// metadata = true
/// allowed_duration = 30
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultSettings {
    /// Archive file
    #[serde(default = "default_path")]
    pub path: String,
    /// Name of the environment variable holding the password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_variable: Option<String>,
    /// Warn when no encryption variable is given
    #[serde(default = "default_true")]
    pub secure: bool,
    /// Show the short stamp after each command
    #[serde(default = "default_true")]
    pub timestamp: bool,
    /// Forward full metadata to the log sink
    #[serde(default = "default_true")]
    pub metadata: bool,
    /// Seconds a command is expected to take; logged against, never enforced
    #[serde(default = "default_allowed_duration")]
    pub allowed_duration: u64,
}

fn default_path() -> String {
    "storage.vault".to_string()
}

fn default_true() -> bool {
    true
}

fn default_allowed_duration() -> u64 {
    30
}

impl Default for VaultSettings {
    fn default() -> Self {
        Self {
            path: default_path(),
            encryption_variable: None,
            secure: true,
            timestamp: true,
            metadata: true,
            allowed_duration: default_allowed_duration(),
        }
    }
}

const KEYS: [&str; 6] = [
    "path",
    "encryption_variable",
    "secure",
    "timestamp",
    "metadata",
    "allowed_duration",
];

impl VaultSettings {
    /// Default config file content with comments
    pub fn default_toml() -> &'static str {
        r#"# Data vault configuration
#
# Archive file, relative to the working directory
path = "storage.vault"

# Environment variable holding the archive password (unset: no encryption)
# encryption_variable = "VAULT_KEY"

# Warn when no encryption variable is set
secure = true

# Print a short stamp with checksums and time after each command
timestamp = true

# Write full metadata records to the metadata log
metadata = true

# Expected upper bound for one command, in seconds (logged, not enforced)
allowed_duration = 30
"#
    }

    /// Parse TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text)
            .map_err(|e| Error::configuration(format!("Failed to parse settings: {}", e)))
    }

    /// Read and parse a config file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            Error::configuration(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Apply an `open_vault` argument line on top of these settings
    ///
    /// # Errors
    ///
    /// `MalformedCommand` if the line does not pair up, `Validation` for a
    /// non-boolean value of a boolean key or a non-numeric duration.
    pub fn with_line(mut self, line: &str) -> Result<Self> {
        for (key, value) in parse_line(line)? {
            let Some(full) = expand_key(&key) else {
                warn!(key = %key, "Ignoring unknown vault setting");
                continue;
            };
            match full {
                "path" => self.path = unquote(&value)?,
                "encryption_variable" => self.encryption_variable = Some(value),
                "secure" => self.secure = boolean(full, &value)?,
                "timestamp" => self.timestamp = boolean(full, &value)?,
                "metadata" => self.metadata = boolean(full, &value)?,
                "allowed_duration" => {
                    self.allowed_duration = value.parse().map_err(|_| {
                        Error::validation(format!(
                            "allowed_duration must be a whole number of seconds, got '{}'",
                            value
                        ))
                    })?;
                }
                _ => {}
            }
        }
        Ok(self)
    }
}

/// Full key for a full or single-letter key
fn expand_key(key: &str) -> Option<&'static str> {
    KEYS.iter()
        .copied()
        .find(|full| *full == key || (key.len() == 1 && full.starts_with(key)))
}

fn boolean(key: &str, value: &str) -> Result<bool> {
    match bool_or_str(value) {
        BoolOrStr::Bool(b) => Ok(b),
        BoolOrStr::Str(other) => Err(Error::validation(format!(
            "{} must be True or False, got '{}'",
            key, other
        ))),
    }
}
