//! Vault archive writer
//!
//! Rewrites `.vault` archives with atomic write semantics: the new archive
//! is built next to the old one and renamed over it.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tar::{Builder, Header};

use crate::archive::error::{ArchiveError, ArchiveResult};
use crate::archive::reader::ArchiveContents;
use crate::archive::types::paths;

/// Default zstd compression level
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 3;

/// Writer for vault archives
pub struct ArchiveWriter {
    compression_level: i32,
}

impl ArchiveWriter {
    /// Create a writer with the given zstd level
    pub fn new(compression_level: i32) -> Self {
        Self { compression_level }
    }

    /// Create a writer with the default level
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_COMPRESSION_LEVEL)
    }

    /// Write a complete archive to `path`
    ///
    /// Either the complete archive is written or the previous file is left
    /// untouched.
    pub fn write(&self, contents: &ArchiveContents, path: &Path) -> ArchiveResult<()> {
        let temp_path = path.with_extension("tmp");

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        match self.write_inner(contents, &temp_path) {
            Ok(()) => {
                fs::rename(&temp_path, path)?;
                Ok(())
            }
            Err(e) => {
                let _ = fs::remove_file(&temp_path);
                Err(e)
            }
        }
    }

    fn write_inner(&self, contents: &ArchiveContents, path: &Path) -> ArchiveResult<()> {
        let file = File::create(path)?;
        let mut buf_writer = BufWriter::new(file);
        self.write_to(contents, &mut buf_writer)?;
        buf_writer.flush()?;
        Ok(())
    }

    /// Write a complete archive into any byte sink
    pub fn write_to<W: Write>(&self, contents: &ArchiveContents, writer: W) -> ArchiveResult<()> {
        let manifest_json = serde_json::to_vec_pretty(&contents.manifest)?;

        let zstd_writer = zstd::Encoder::new(writer, self.compression_level)
            .map_err(|e| ArchiveError::compression(format!("zstd encoder: {}", e)))?;
        let mut tar_builder = Builder::new(zstd_writer);

        self.add_file(&mut tar_builder, paths::MANIFEST, &manifest_json)?;
        for (member, payload) in &contents.payloads {
            self.add_file(&mut tar_builder, &paths::data(member), payload)?;
        }

        let zstd_writer = tar_builder
            .into_inner()
            .map_err(|e| ArchiveError::archive(format!("tar finish: {}", e)))?;
        zstd_writer
            .finish()
            .map_err(|e| ArchiveError::compression(format!("zstd finish: {}", e)))?;
        Ok(())
    }

    fn add_file<W: Write>(
        &self,
        builder: &mut Builder<W>,
        path: &str,
        data: &[u8],
    ) -> ArchiveResult<()> {
        let mut header = Header::new_gnu();
        header
            .set_path(path)
            .map_err(|e| ArchiveError::archive(format!("set path '{}': {}", path, e)))?;
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(0);
        header.set_cksum();

        builder
            .append(&header, data)
            .map_err(|e| ArchiveError::archive(format!("append '{}': {}", path, e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::reader::ArchiveReader;
    use crate::archive::types::MemberEntry;

    fn contents() -> ArchiveContents {
        let mut contents = ArchiveContents::default();
        for (member, data) in [("frames/a", &b"one"[..]), ("frames/sub/b", &b"two"[..])] {
            contents
                .manifest
                .members
                .insert(member.to_string(), MemberEntry::describe(data, false));
            contents.payloads.insert(member.to_string(), data.to_vec());
        }
        contents
    }

    #[test]
    fn test_write_then_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.vault");

        ArchiveWriter::with_defaults()
            .write(&contents(), &path)
            .unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());

        let read = ArchiveReader::read(&path).unwrap();
        assert_eq!(read, contents());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let read = ArchiveReader::read(&dir.path().join("absent.vault")).unwrap();
        assert!(read.payloads.is_empty());
        assert!(read.manifest.members.is_empty());
    }

    #[test]
    fn test_deterministic_output() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        ArchiveWriter::with_defaults()
            .write_to(&contents(), &mut a)
            .unwrap();
        ArchiveWriter::with_defaults()
            .write_to(&contents(), &mut b)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_orphan_manifest_entry_rejected() {
        let mut broken = contents();
        broken.payloads.remove("frames/a");
        let mut buffer = Vec::new();
        ArchiveWriter::with_defaults()
            .write_to(&broken, &mut buffer)
            .unwrap();

        let result = ArchiveReader::read_from(&buffer[..]);
        assert!(matches!(result, Err(ArchiveError::InvalidArchive(_))));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let result = ArchiveReader::read_from(&b"not an archive"[..]);
        assert!(result.is_err());
    }
}
