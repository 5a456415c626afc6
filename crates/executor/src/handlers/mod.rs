//! Command handlers organized by action.
//!
//! | Module | Handlers | Action |
//! |--------|----------|--------|
//! | `store` | 3 | `store` |
//! | `import` | 4 | `import` |
//! | `delete` | 2 | `del` |
//! | `assert` | 2 | `assert` |
//!
//! Handlers run after their syntax validated, so keyword lookups only fail
//! when a handler is called directly with arguments it was not chosen for.

use std::sync::Arc;

use vault_core::{Function, Namespace, Storage, Value};

use crate::parse::Arguments;
use crate::validators::lookup;
use crate::{Error, Result};

pub mod assert;
pub mod delete;
pub mod import;
pub mod store;

/// What a handler operates on
pub struct Context<'a> {
    /// The open vault
    pub storage: Arc<dyn Storage>,
    /// Names commands read from and import into
    pub namespace: &'a mut dyn Namespace,
}

/// Value of a keyword the handler's syntax requires
pub(crate) fn keyword<'a>(arguments: &'a Arguments, key: &str) -> Result<&'a str> {
    arguments
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| Error::malformed(format!("keyword '{}' is required", key)))
}

/// Archive path of `name` inside `folder`
pub(crate) fn member_path(folder: &str, name: &str) -> String {
    format!("{}/{}", folder, name)
}

/// Which way a `with` function has to convert
#[derive(Clone, Copy)]
pub(crate) enum Direction {
    Export,
    Import,
}

/// The `with` function, checked for the required direction
pub(crate) fn with_function(
    arguments: &Arguments,
    namespace: &dyn Namespace,
    direction: Direction,
) -> Result<Option<Function>> {
    let Some(name) = arguments.get("with") else {
        return Ok(None);
    };
    let binding = lookup(name, "function", namespace)?;
    let function = binding
        .as_function()
        .cloned()
        .ok_or_else(|| Error::NotCallable { name: name.clone() })?;

    match direction {
        Direction::Export if !function.can_export() => Err(Error::validation(format!(
            "'{}' is an importer, storing needs a function that exports values",
            name
        ))),
        Direction::Import if !function.can_import() => Err(Error::validation(format!(
            "'{}' is an exporter, importing needs a function that reads bytes",
            name
        ))),
        _ => Ok(Some(function)),
    }
}

/// Plain value bound to a variable
pub(crate) fn variable_value(namespace: &dyn Namespace, name: &str) -> Result<Value> {
    let binding = lookup(name, "variable", namespace)?;
    binding.as_value().cloned().ok_or_else(|| {
        Error::validation(format!(
            "'{}' is a {}, only values can be stored",
            name,
            binding.type_name()
        ))
    })
}
