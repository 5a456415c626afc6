//! Vault archive reader
//!
//! Reads `.vault` archives (zstd-compressed tar) into memory.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tar::Archive;

use crate::archive::error::{ArchiveError, ArchiveResult};
use crate::archive::types::{paths, Manifest, VAULT_FORMAT_VERSION};

/// Everything stored in one archive
///
/// Payloads are kept exactly as stored: encrypted members stay sealed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchiveContents {
    /// Parsed manifest
    pub manifest: Manifest,
    /// Raw payload per vault path
    pub payloads: BTreeMap<String, Vec<u8>>,
}

/// Reader for vault archives
pub struct ArchiveReader;

impl ArchiveReader {
    /// Read a whole archive
    ///
    /// A missing file reads as an empty vault.
    ///
    /// Checks:
    /// - Archive can be decompressed
    /// - MANIFEST.json exists and has a supported version
    /// - Every manifest member has a payload and vice versa
    pub fn read(path: &Path) -> ArchiveResult<ArchiveContents> {
        if !path.exists() {
            return Ok(ArchiveContents::default());
        }

        let file = File::open(path)?;
        Self::read_from(BufReader::new(file))
    }

    /// Read an archive from any byte stream
    pub fn read_from<R: Read>(reader: R) -> ArchiveResult<ArchiveContents> {
        let decoder = zstd::Decoder::new(reader)
            .map_err(|e| ArchiveError::compression(format!("zstd decode: {}", e)))?;
        let mut archive = Archive::new(decoder);

        let mut manifest_data = None;
        let mut payloads = BTreeMap::new();

        for entry in archive
            .entries()
            .map_err(|e| ArchiveError::archive(e.to_string()))?
        {
            let mut entry = entry.map_err(|e| ArchiveError::archive(e.to_string()))?;
            let entry_path = entry
                .path()
                .map_err(|e| ArchiveError::archive(e.to_string()))?
                .to_string_lossy()
                .to_string();

            let mut data = Vec::new();
            entry
                .read_to_end(&mut data)
                .map_err(|e| ArchiveError::archive(format!("read {}: {}", entry_path, e)))?;

            if entry_path == paths::MANIFEST {
                manifest_data = Some(data);
            } else if let Some(member) = entry_path.strip_prefix(paths::DATA_PREFIX) {
                payloads.insert(member.to_string(), data);
            }
        }

        let manifest_data = manifest_data
            .ok_or_else(|| ArchiveError::invalid_archive("missing MANIFEST.json"))?;
        let manifest: Manifest = serde_json::from_slice(&manifest_data)?;

        if manifest.format_version != VAULT_FORMAT_VERSION {
            return Err(ArchiveError::UnsupportedVersion {
                version: manifest.format_version,
            });
        }

        if let Some(orphan) = manifest
            .members
            .keys()
            .find(|member| !payloads.contains_key(*member))
        {
            return Err(ArchiveError::invalid_archive(format!(
                "manifest lists '{}' but the archive has no payload for it",
                orphan
            )));
        }
        if let Some(orphan) = payloads
            .keys()
            .find(|member| !manifest.members.contains_key(*member))
        {
            return Err(ArchiveError::invalid_archive(format!(
                "payload '{}' is not listed in the manifest",
                orphan
            )));
        }

        Ok(ArchiveContents { manifest, payloads })
    }
}
