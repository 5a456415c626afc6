//! Where finished commands are reported.
//!
//! The dispatcher hands every sink the short stamp (unless timestamps are
//! off) and the full metadata (unless metadata is off).

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::metadata::Metadata;
use crate::Result;

/// Receiver of command reports
pub trait Sink {
    /// Report one finished command
    fn emit(&mut self, stamp: Option<&str>, metadata: Option<&Metadata>) -> Result<()>;
}

/// Keeps everything in memory
#[derive(Debug, Default)]
pub struct Collector {
    /// Stamps in emission order
    pub stamps: Vec<String>,
    /// Metadata in emission order
    pub records: Vec<Metadata>,
}

impl Collector {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sink for Collector {
    fn emit(&mut self, stamp: Option<&str>, metadata: Option<&Metadata>) -> Result<()> {
        self.stamps.extend(stamp.map(str::to_string));
        self.records.extend(metadata.cloned());
        Ok(())
    }
}

/// Appends metadata as JSON lines to a file; stamps are ignored
#[derive(Debug, Clone)]
pub struct MetadataLog {
    path: PathBuf,
}

impl MetadataLog {
    /// Log to `path`, created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Log file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record back
    pub fn read_all(&self) -> Result<Vec<Metadata>> {
        let content = std::fs::read_to_string(&self.path).map_err(vault_core::Error::from)?;
        let mut records = Vec::new();
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            records.push(serde_json::from_str(line).map_err(vault_core::Error::from)?);
        }
        Ok(records)
    }
}

impl Sink for MetadataLog {
    fn emit(&mut self, _stamp: Option<&str>, metadata: Option<&Metadata>) -> Result<()> {
        let Some(metadata) = metadata else {
            return Ok(());
        };
        let mut line = serde_json::to_string(metadata).map_err(vault_core::Error::from)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(vault_core::Error::from)?;
        file.write_all(line.as_bytes())
            .map_err(vault_core::Error::from)?;
        Ok(())
    }
}

/// Sends every report to each inner sink
pub struct Fanout<'a> {
    sinks: Vec<&'a mut dyn Sink>,
}

impl<'a> Fanout<'a> {
    /// Combine sinks
    pub fn new(sinks: Vec<&'a mut dyn Sink>) -> Self {
        Self { sinks }
    }
}

impl Sink for Fanout<'_> {
    fn emit(&mut self, stamp: Option<&str>, metadata: Option<&Metadata>) -> Result<()> {
        for sink in self.sinks.iter_mut() {
            sink.emit(stamp, metadata)?;
        }
        Ok(())
    }
}
