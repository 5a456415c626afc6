//! Core types and traits for the data vault
//!
//! This crate defines the foundational types used throughout the system:
//! - Value / Frame: everything a variable can hold
//! - Namespace / Scope / Binding: where command identifiers are resolved
//! - Function / Object / Module: invocable and attribute-bearing bindings
//! - HashMethod / Checksums: CRC32 and SHA256 provenance digests
//! - ResultRecord / Loaded: what storage operations report back
//! - Storage: the backend contract command handlers call into
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod checksum;
pub mod error;
pub mod namespace;
pub mod record;
pub mod traits;
pub mod value;

pub use checksum::{crc32_hex, sha256_hex, Checksums, HashMethod};
pub use error::{Error, Result};
pub use namespace::{
    resolve, Binding, ExportFn, Function, ImportFn, Module, Namespace, Object, Scope,
};
pub use record::{Loaded, ResultRecord};
pub use traits::Storage;
pub use value::{Frame, Value};
