//! Storage collaborator contract
//!
//! Command handlers never touch the archive directly; they go through this
//! trait so backends can be swapped (and mocked in tests).

use crate::checksum::HashMethod;
use crate::error::Result;
use crate::namespace::Function;
use crate::record::{Loaded, ResultRecord};
use crate::value::Value;

/// Storage backend for vault objects
///
/// Paths are slash-separated, relative to the vault root
/// (`my_frames/x`). Folders exist implicitly as path prefixes.
///
/// Thread safety: implementations must be shareable across threads so a
/// browsing handle can outlive the command that created it.
pub trait Storage: Send + Sync {
    /// Whether an object is stored under `path`
    fn contains(&self, path: &str) -> Result<bool>;

    /// Member paths, sorted
    ///
    /// With `relative_to`, only members below that folder are returned and
    /// the folder prefix (and its slash) is stripped.
    fn list_members(&self, relative_to: Option<&str>) -> Result<Vec<String>>;

    /// Serialize and store `value` under `path`
    ///
    /// `exporter` overrides the default codec. The returned record is
    /// named `subject` and carries the previous checksums when the path was
    /// already occupied.
    ///
    /// # Errors
    ///
    /// Fails if the exporter fails or the archive cannot be rewritten.
    fn store(
        &self,
        path: &str,
        value: &Value,
        exporter: Option<&Function>,
        subject: &str,
    ) -> Result<ResultRecord>;

    /// Load and decode the object under `path`
    ///
    /// # Errors
    ///
    /// `NotFound` if nothing is stored there, `PasswordRequired` /
    /// `Decryption` for encrypted members, `Integrity` on checksum mismatch.
    fn load(&self, path: &str, importer: Option<&Function>) -> Result<Loaded>;

    /// Remove the object under `path`, returning its last checksums
    fn delete(&self, path: &str) -> Result<ResultRecord>;

    /// Hex digest of the stored bytes under `path`
    fn verify_checksum(&self, path: &str, method: HashMethod) -> Result<String>;

    /// Re-read every member and compare against the recorded checksums
    fn check_integrity(&self) -> Result<()>;
}
