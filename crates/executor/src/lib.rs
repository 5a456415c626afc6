//! # Vault Executor
//!
//! The command language of the data vault.
//!
//! This is the only crate hosts need to import. It provides:
//! - [`Dispatcher`] - runs `open_vault` and vault command lines
//! - [`Action`] / [`Handler`] - the ranked command shapes of each action
//! - [`Syntax`] / [`Validator`] - keyword signatures and their scoring
//! - [`Metadata`] / [`Sink`] - what is recorded about each command and where it goes
//!
//! ## Quick Start
//!
//! ```text
//! use vault_executor::{Collector, Dispatcher, Scope, Value};
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.open_vault("-p data.vault -e VAULT_KEY")?;
//!
//! let mut scope = Scope::new();
//! scope.assign("x", Value::Int(42).into());
//!
//! let mut sink = Collector::new();
//! dispatcher.vault("store x in my_numbers", &mut scope, &mut sink)?;
//! dispatcher.vault("from my_numbers import x as y", &mut scope, &mut sink)?;
//! ```
//!
//! ## Commands
//!
//! | Action | Shapes |
//! |--------|--------|
//! | **store** | `store <ids> in <folder> [as <id>] [with <fn>]`, `store <id> in '<path>' [with <fn>]` |
//! | **import** | `from <folder> import <ids> [as <id>] [with <fn>]`, `import '<path>' as <id> [with <fn>]`, `import <folder> [as <id>]` |
//! | **del** | `del <id> from <folder>`, `del '<path>'` |
//! | **assert** | `assert <id> in <folder> is <hash> [with <method>]`, `assert '<path>' is <hash> [with <method>]` |

#![warn(missing_docs)]
#![warn(clippy::all)]

mod action;
mod config;
mod dispatcher;
mod error;
mod handlers;
mod metadata;
pub mod parse;
mod session;
mod sink;
mod syntax;
mod validators;

// Test modules
#[cfg(test)]
mod tests;

// =============================================================================
// Public API
// =============================================================================

pub use action::{Action, Candidate, Handler, SUGGESTIONS};
pub use config::{VaultSettings, CONFIG_FILE_NAME};
pub use dispatcher::Dispatcher;
pub use error::Error;
pub use handlers::Context;
pub use metadata::{human_time, timestamp, Metadata, HUMAN_TIME_FORMAT};
pub use session::{Session, NO_ENCRYPTION_WARNING};
pub use sink::{Collector, Fanout, MetadataLog, Sink};
pub use syntax::{Concordance, Rules, Syntax};
pub use validators::{lookup, Validator};

// Re-export the data and namespace model so hosts need only this crate
pub use vault_core::{
    resolve, Binding, Checksums, Frame, Function, HashMethod, Module, Namespace, Object,
    ResultRecord, Scope, Storage, Value,
};
pub use vault_storage::{codec, Archive, DynamicVault, Vault};

/// Result type for executor operations
pub type Result<T> = std::result::Result<T, Error>;
