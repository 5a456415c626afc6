//! Storage layer for the data vault
//!
//! This crate implements the archive backend behind the `Storage` contract:
//! - Archive: tar+zstd container with a checksum manifest and optional
//!   per-member AES-256-GCM encryption
//! - Vault: `Storage` implementation over one archive file
//! - DynamicVault: lazily loaded, cached view of a vault folder
//! - codec: default TSV/JSON exporter and importer

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod archive;
pub mod codec;
pub mod dynamic;
pub mod vault;

pub use archive::{Archive, ArchiveError, ArchiveResult};
pub use dynamic::DynamicVault;
pub use vault::Vault;
