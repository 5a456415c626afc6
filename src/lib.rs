//! Data Vault - versioned, encrypted storage of named objects
//!
//! A vault is a single archive file. Objects from a namespace are stored in
//! it, imported back, deleted, and verified against checksums through short
//! English-like commands.
//!
//! # Quick Start
//!
//! ```ignore
//! use datavault::{Collector, Dispatcher, Scope, Value};
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.open_vault("-p storage.vault -e VAULT_KEY")?;
//!
//! let mut scope = Scope::new();
//! scope.assign("x", Value::Int(42).into());
//!
//! let mut sink = Collector::new();
//! dispatcher.vault("store x in numbers", &mut scope, &mut sink)?;
//! dispatcher.vault("assert x in numbers is 1A2B3C4D", &mut scope, &mut sink)?;
//! ```
//!
//! # Architecture
//!
//! Every command goes through the [`Dispatcher`], which picks the matching
//! [`Action`] and [`Handler`] and reports a [`Metadata`] record to a [`Sink`].
//! The archive format and codecs live in the storage layer and are reached
//! through the [`Storage`] trait.

// Re-export the public API from vault-executor
pub use vault_executor::*;
