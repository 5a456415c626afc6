//! An open vault.
//!
//! A `Session` ties settings to the storage they select. There is no
//! process-wide session: the dispatcher owns one, and tests or embedders
//! may hold as many as they like.

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use vault_core::Storage;
use vault_storage::{Archive, Vault};

use crate::config::VaultSettings;
use crate::{Error, Result};

/// Warning recorded when a secure session has no password source
pub const NO_ENCRYPTION_WARNING: &str = "Encryption variable not set - no encryption will be used.";

/// Settings plus the storage they opened
pub struct Session {
    settings: VaultSettings,
    storage: Arc<dyn Storage>,
    warnings: Vec<String>,
}

impl Session {
    /// Open the archive named by `settings`.
    ///
    /// The password is read from the environment variable named by
    /// `encryption_variable`.
    ///
    /// # Errors
    ///
    /// `Configuration` if the named variable is not set.
    pub fn open(settings: VaultSettings) -> Result<Self> {
        let password = match &settings.encryption_variable {
            Some(name) => Some(std::env::var(name).map_err(|_| {
                Error::configuration(format!(
                    "Encryption variable '{}' is not set in the environment",
                    name
                ))
            })?),
            None => None,
        };
        let archive = Archive::new(&settings.path, password);
        Ok(Self::with_archive(settings, archive))
    }

    /// Use an already configured archive
    pub fn with_archive(settings: VaultSettings, archive: Archive) -> Self {
        let encrypted = archive.is_encrypted();
        info!(path = %settings.path, encrypted, "Opened vault");
        Self::with_storage(settings, Arc::new(Vault::new(archive)))
    }

    /// Use any storage backend
    pub fn with_storage(settings: VaultSettings, storage: Arc<dyn Storage>) -> Self {
        let mut warnings = Vec::new();
        if settings.secure && settings.encryption_variable.is_none() {
            warn!("{}", NO_ENCRYPTION_WARNING);
            warnings.push(NO_ENCRYPTION_WARNING.to_string());
        }
        Self {
            settings,
            storage,
            warnings,
        }
    }

    /// Active settings
    pub fn settings(&self) -> &VaultSettings {
        &self.settings
    }

    /// The storage commands act on
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Warnings raised while opening
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("settings", &self.settings)
            .field("warnings", &self.warnings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(dir: &tempfile::TempDir) -> VaultSettings {
        VaultSettings {
            path: dir.path().join("s.vault").display().to_string(),
            ..VaultSettings::default()
        }
    }

    #[test]
    fn test_secure_without_variable_warns() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::open(settings(&dir)).unwrap();
        assert_eq!(session.warnings(), [NO_ENCRYPTION_WARNING.to_string()]);
    }

    #[test]
    fn test_insecure_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::open(VaultSettings {
            secure: false,
            ..settings(&dir)
        })
        .unwrap();
        assert!(session.warnings().is_empty());
    }

    #[test]
    fn test_unset_variable_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Session::open(VaultSettings {
            encryption_variable: Some("DATAVAULT_TEST_SURELY_UNSET_3F1A".to_string()),
            ..settings(&dir)
        });
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_debug_names_settings() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::open(settings(&dir)).unwrap();
        let text = format!("{:?}", session);
        assert!(text.starts_with("Session { settings: VaultSettings {"), "{}", text);
        assert!(text.contains("s.vault"), "{}", text);
    }

    #[test]
    fn test_storage_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::open(settings(&dir)).unwrap();
        assert!(session.storage().list_members(None).unwrap().is_empty());
    }
}
