//! Archive-backed implementation of the `Storage` contract

use tracing::debug;

use vault_core::{
    Checksums, Function, HashMethod, Loaded, Result, ResultRecord, Storage, Value,
};

use crate::archive::Archive;
use crate::codec;

/// Storage backed by one vault archive file
pub struct Vault {
    archive: Archive,
}

impl Vault {
    /// Wrap an archive handle
    pub fn new(archive: Archive) -> Self {
        Self { archive }
    }

    /// The underlying archive
    pub fn archive(&self) -> &Archive {
        &self.archive
    }
}

impl Storage for Vault {
    fn contains(&self, path: &str) -> Result<bool> {
        Ok(self.archive.contains(path)?)
    }

    fn list_members(&self, relative_to: Option<&str>) -> Result<Vec<String>> {
        Ok(self.archive.list_members(relative_to)?)
    }

    fn store(
        &self,
        path: &str,
        value: &Value,
        exporter: Option<&Function>,
        subject: &str,
    ) -> Result<ResultRecord> {
        let old = if self.archive.contains(path)? {
            Some(self.archive.entry(path)?.checksums())
        } else {
            None
        };

        let bytes = match exporter {
            Some(exporter) => exporter.export(value)?,
            None => codec::export_default(value)?,
        };
        debug!(path, bytes = bytes.len(), "Exported value");

        let entry = self.archive.write(path, &bytes)?;

        let mut record = ResultRecord::new(subject).with_new(entry.checksums());
        record.old_file = old;
        Ok(record)
    }

    fn load(&self, path: &str, importer: Option<&Function>) -> Result<Loaded> {
        let bytes = self.archive.read(path)?;
        let checksums = Checksums::of(&bytes);
        let value = match importer {
            Some(importer) => importer.import(&bytes)?,
            None => codec::import_default(&bytes)?,
        };
        Ok(Loaded { value, checksums })
    }

    fn delete(&self, path: &str) -> Result<ResultRecord> {
        let entry = self.archive.delete(path)?;
        Ok(ResultRecord::new(path).with_old(entry.checksums()))
    }

    fn verify_checksum(&self, path: &str, method: HashMethod) -> Result<String> {
        let bytes = self.archive.read(path)?;
        Ok(method.digest(&bytes))
    }

    fn check_integrity(&self) -> Result<()> {
        Ok(self.archive.check_integrity()?)
    }
}
