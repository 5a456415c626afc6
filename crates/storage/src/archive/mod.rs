//! Vault archive: one file holding every stored object
//!
//! ## Archive Structure
//!
//! ```text
//! storage.vault                  (zstd-compressed tar)
//! └── vault/
//!     ├── MANIFEST.json          format version, kdf header, member checksums
//!     └── data/
//!         ├── my_frames/x        one entry per stored object
//!         └── my_frames/y
//! ```
//!
//! ## Encryption
//!
//! With a password, every member written is sealed with AES-256-GCM under a
//! key derived once per archive (the salt lives in the manifest). Members
//! written without a password stay in clear text; reading an encrypted
//! member without a password fails with `PasswordRequired`.
//!
//! ## Integrity
//!
//! The manifest records CRC32 and SHA256 of every member's plaintext.
//! Every read verifies the CRC32; `check_integrity` verifies all members.

pub mod cipher;
pub mod error;
pub mod reader;
pub mod types;
pub mod writer;

pub use cipher::Cipher;
pub use error::{ArchiveError, ArchiveResult};
pub use reader::{ArchiveContents, ArchiveReader};
pub use types::{
    paths, KdfHeader, Manifest, MemberEntry, DEFAULT_KDF_ITERATIONS, VAULT_FORMAT_VERSION,
};
pub use writer::{ArchiveWriter, DEFAULT_COMPRESSION_LEVEL};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use vault_core::crc32_hex;

/// Handle to an archive file
///
/// Every operation re-reads the file; writes rebuild it atomically.
pub struct Archive {
    path: PathBuf,
    password: Option<String>,
    kdf_iterations: u32,
    writer: ArchiveWriter,
    // Key derivation is slow; keep the last derived key per kdf header
    cipher: Mutex<Option<(KdfHeader, Arc<Cipher>)>>,
}

impl Archive {
    /// Open (or prepare to create) the archive at `path`
    pub fn new(path: impl Into<PathBuf>, password: Option<String>) -> Self {
        Self {
            path: path.into(),
            password,
            kdf_iterations: DEFAULT_KDF_ITERATIONS,
            writer: ArchiveWriter::with_defaults(),
            cipher: Mutex::new(None),
        }
    }

    /// Override the PBKDF2 rounds used when a new key header is created
    pub fn with_kdf_iterations(mut self, iterations: u32) -> Self {
        self.kdf_iterations = iterations;
        self
    }

    /// Archive file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether members written through this handle are encrypted
    pub fn is_encrypted(&self) -> bool {
        self.password.is_some()
    }

    /// Whether the archive file exists yet
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the current manifest
    pub fn manifest(&self) -> ArchiveResult<Manifest> {
        Ok(ArchiveReader::read(&self.path)?.manifest)
    }

    /// Whether a member is stored under `member`
    pub fn contains(&self, member: &str) -> ArchiveResult<bool> {
        Ok(self.manifest()?.members.contains_key(member))
    }

    /// Manifest entry of a member
    pub fn entry(&self, member: &str) -> ArchiveResult<MemberEntry> {
        self.manifest()?
            .members
            .remove(member)
            .ok_or_else(|| ArchiveError::member_not_found(member))
    }

    /// Member paths, sorted
    ///
    /// With `relative_to`, only members below that folder, with the folder
    /// prefix stripped.
    pub fn list_members(&self, relative_to: Option<&str>) -> ArchiveResult<Vec<String>> {
        let manifest = self.manifest()?;
        let members = manifest.members.into_keys();
        Ok(match relative_to.filter(|prefix| !prefix.is_empty()) {
            Some(prefix) => {
                let prefix = format!("{}/", prefix.trim_end_matches('/'));
                members
                    .filter_map(|m| m.strip_prefix(&prefix).map(str::to_string))
                    .collect()
            }
            None => members.collect(),
        })
    }

    /// Read and verify the plaintext of one member
    pub fn read(&self, member: &str) -> ArchiveResult<Vec<u8>> {
        let contents = ArchiveReader::read(&self.path)?;
        self.read_member(&contents, member)
    }

    /// Store `plaintext` under `member`, replacing what was there
    ///
    /// The rebuilt contents are verified before they replace the file, so a
    /// wrong password or a corrupted member leaves the archive untouched.
    pub fn write(&self, member: &str, plaintext: &[u8]) -> ArchiveResult<MemberEntry> {
        let mut contents = ArchiveReader::read(&self.path)?;

        let payload = match &self.password {
            Some(password) => {
                let header = match &contents.manifest.kdf {
                    Some(header) => header.clone(),
                    None => {
                        let header = Cipher::new_header(self.kdf_iterations)?;
                        contents.manifest.kdf = Some(header.clone());
                        header
                    }
                };
                self.cipher_for(password, &header)?.seal(plaintext)?
            }
            None => plaintext.to_vec(),
        };

        let entry = MemberEntry::describe(plaintext, self.password.is_some());
        contents
            .manifest
            .members
            .insert(member.to_string(), entry.clone());
        contents.payloads.insert(member.to_string(), payload);

        self.verify(&contents)?;
        self.writer.write(&contents, &self.path)?;
        info!(
            archive = %self.path.display(),
            member,
            size = entry.size,
            encrypted = entry.encrypted,
            "Stored archive member"
        );
        Ok(entry)
    }

    /// Remove a member, returning its last manifest entry
    pub fn delete(&self, member: &str) -> ArchiveResult<MemberEntry> {
        let mut contents = ArchiveReader::read(&self.path)?;
        let entry = contents
            .manifest
            .members
            .remove(member)
            .ok_or_else(|| ArchiveError::member_not_found(member))?;
        contents.payloads.remove(member);

        self.writer.write(&contents, &self.path)?;
        info!(archive = %self.path.display(), member, "Deleted archive member");
        Ok(entry)
    }

    /// Decrypt and verify every member
    pub fn check_integrity(&self) -> ArchiveResult<()> {
        self.verify(&ArchiveReader::read(&self.path)?)
    }

    fn verify(&self, contents: &ArchiveContents) -> ArchiveResult<()> {
        for member in contents.manifest.members.keys() {
            self.read_member(contents, member)?;
        }
        debug!(
            archive = %self.path.display(),
            members = contents.manifest.members.len(),
            "Integrity check passed"
        );
        Ok(())
    }

    fn read_member(&self, contents: &ArchiveContents, member: &str) -> ArchiveResult<Vec<u8>> {
        let entry = contents
            .manifest
            .members
            .get(member)
            .ok_or_else(|| ArchiveError::member_not_found(member))?;
        let payload = contents
            .payloads
            .get(member)
            .ok_or_else(|| ArchiveError::member_not_found(member))?;

        let plaintext = if entry.encrypted {
            let password = self
                .password
                .as_deref()
                .ok_or_else(|| ArchiveError::PasswordRequired(member.to_string()))?;
            let header = contents.manifest.kdf.as_ref().ok_or_else(|| {
                ArchiveError::invalid_archive("encrypted member without kdf header")
            })?;
            self.cipher_for(password, header)?.open(member, payload)?
        } else {
            payload.clone()
        };

        let actual = crc32_hex(&plaintext);
        if actual != entry.crc32 {
            return Err(ArchiveError::ChecksumMismatch {
                member: member.to_string(),
                expected: entry.crc32.clone(),
                actual,
            });
        }
        Ok(plaintext)
    }

    fn cipher_for(&self, password: &str, header: &KdfHeader) -> ArchiveResult<Arc<Cipher>> {
        let mut cached = self.cipher.lock();
        if let Some((cached_header, cipher)) = cached.as_ref() {
            if cached_header == header {
                return Ok(Arc::clone(cipher));
            }
        }
        let cipher = Arc::new(Cipher::derive(password, header)?);
        *cached = Some((header.clone(), Arc::clone(&cipher)));
        Ok(cipher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archive_in(dir: &tempfile::TempDir, password: Option<&str>) -> Archive {
        Archive::new(
            dir.path().join("storage.vault"),
            password.map(str::to_string),
        )
        .with_kdf_iterations(10)
    }

    #[test]
    fn test_write_read_delete() {
        let dir = tempfile::tempdir().unwrap();
        let archive = archive_in(&dir, None);

        assert!(!archive.exists());
        assert!(!archive.contains("frames/x").unwrap());

        let entry = archive.write("frames/x", b"payload").unwrap();
        assert_eq!(entry.size, 7);
        assert!(!entry.encrypted);
        assert!(archive.contains("frames/x").unwrap());
        assert_eq!(archive.read("frames/x").unwrap(), b"payload");

        let removed = archive.delete("frames/x").unwrap();
        assert_eq!(removed, entry);
        assert!(!archive.contains("frames/x").unwrap());
        assert!(matches!(
            archive.read("frames/x"),
            Err(ArchiveError::MemberNotFound(_))
        ));
    }

    #[test]
    fn test_overwrite_replaces_member() {
        let dir = tempfile::tempdir().unwrap();
        let archive = archive_in(&dir, None);
        archive.write("x", b"first").unwrap();
        archive.write("x", b"second").unwrap();
        assert_eq!(archive.read("x").unwrap(), b"second");
        assert_eq!(archive.list_members(None).unwrap(), vec!["x"]);
    }

    #[test]
    fn test_list_members_relative() {
        let dir = tempfile::tempdir().unwrap();
        let archive = archive_in(&dir, None);
        archive.write("frames/a", b"1").unwrap();
        archive.write("frames/sub/b", b"2").unwrap();
        archive.write("framesX/c", b"3").unwrap();
        archive.write("other", b"4").unwrap();

        assert_eq!(
            archive.list_members(Some("frames")).unwrap(),
            vec!["a", "sub/b"]
        );
        assert_eq!(archive.list_members(None).unwrap().len(), 4);
    }

    #[test]
    fn test_encrypted_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let archive = archive_in(&dir, Some("secret"));
        let entry = archive.write("x", b"classified").unwrap();
        assert!(entry.encrypted);
        assert_eq!(archive.read("x").unwrap(), b"classified");
        assert!(archive.manifest().unwrap().kdf.is_some());
        archive.check_integrity().unwrap();
    }

    #[test]
    fn test_encrypted_member_needs_password() {
        let dir = tempfile::tempdir().unwrap();
        archive_in(&dir, Some("secret")).write("x", b"classified").unwrap();

        let without = archive_in(&dir, None);
        assert!(matches!(
            without.read("x"),
            Err(ArchiveError::PasswordRequired(_))
        ));

        let wrong = archive_in(&dir, Some("guess"));
        assert!(matches!(wrong.read("x"), Err(ArchiveError::Decryption(_))));
    }

    #[test]
    fn test_wrong_password_write_leaves_archive_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let right = archive_in(&dir, Some("right"));
        right.write("f/x", b"first").unwrap();
        let before = std::fs::read(right.path()).unwrap();

        let wrong = archive_in(&dir, Some("wrong"));
        assert!(matches!(
            wrong.write("f/y", b"second"),
            Err(ArchiveError::Decryption(ref m)) if m == "f/x"
        ));
        assert_eq!(std::fs::read(right.path()).unwrap(), before);
        assert_eq!(right.list_members(None).unwrap(), vec!["f/x"]);

        right.write("f/y", b"second").unwrap();
        assert_eq!(right.read("f/y").unwrap(), b"second");
        right.check_integrity().unwrap();
    }

    #[test]
    fn test_kdf_header_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        let archive = archive_in(&dir, Some("secret"));
        archive.write("a", b"1").unwrap();
        let first = archive.manifest().unwrap().kdf;
        archive.write("b", b"2").unwrap();
        assert_eq!(archive.manifest().unwrap().kdf, first);
    }

    #[test]
    fn test_corrupted_member_detected() {
        let dir = tempfile::tempdir().unwrap();
        let archive = archive_in(&dir, None);
        archive.write("x", b"payload").unwrap();

        let mut contents = ArchiveReader::read(archive.path()).unwrap();
        contents
            .payloads
            .insert("x".to_string(), b"tampered".to_vec());
        ArchiveWriter::with_defaults()
            .write(&contents, archive.path())
            .unwrap();

        assert!(matches!(
            archive.read("x"),
            Err(ArchiveError::ChecksumMismatch { .. })
        ));
        assert!(archive.check_integrity().is_err());
    }
}
