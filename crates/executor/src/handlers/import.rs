//! `import` handlers.

use std::sync::Arc;

use tracing::debug;

use vault_core::{Binding, ResultRecord};
use vault_storage::DynamicVault;

use super::{keyword, member_path, with_function, Context, Direction};
use crate::parse::{split_variables, unquote, Arguments};
use crate::{Error, Result};

// =============================================================================
// Individual Handlers
// =============================================================================

/// Handle `from <folder> import <name> as <alias>`.
pub fn from_module_import_as(
    ctx: &mut Context<'_>,
    arguments: &Arguments,
) -> Result<Vec<ResultRecord>> {
    let path = member_path(keyword(arguments, "from")?, keyword(arguments, "import")?);
    let alias = keyword(arguments, "as")?.to_string();
    load_all(ctx, arguments, vec![(path, alias)])
}

/// Handle `from <folder> import <names>`.
pub fn from_module_import(
    ctx: &mut Context<'_>,
    arguments: &Arguments,
) -> Result<Vec<ResultRecord>> {
    let folder = keyword(arguments, "from")?;
    let names = split_variables(keyword(arguments, "import")?)?;

    let targets = match (arguments.get("as"), names.as_slice()) {
        (Some(alias), [name]) => vec![(member_path(folder, name), alias.clone())],
        (Some(_), _) => {
            return Err(Error::validation(format!(
                "'as' renames a single import, got {}",
                names.join(", ")
            )))
        }
        (None, _) => names
            .into_iter()
            .map(|name| (member_path(folder, &name), name))
            .collect(),
    };
    load_all(ctx, arguments, targets)
}

/// Handle `import '<path>' as <name>`.
pub fn import_path_as(ctx: &mut Context<'_>, arguments: &Arguments) -> Result<Vec<ResultRecord>> {
    let path = unquote(keyword(arguments, "import")?)?;
    let name = keyword(arguments, "as")?.to_string();
    load_all(ctx, arguments, vec![(path, name)])
}

/// Handle `import <folder> [as <name>]`.
///
/// Binds a browsable view of the folder instead of loading its members.
/// Without `as`, `a.b` binds the view of folder `a` to `a`; with `as`, dots
/// address nested folders.
pub fn import_module(ctx: &mut Context<'_>, arguments: &Arguments) -> Result<Vec<ResultRecord>> {
    let module = keyword(arguments, "import")?;
    let head = module.split('.').next().unwrap_or(module);

    let (name, folder) = match arguments.get("as") {
        Some(alias) => (alias.clone(), module.replace('.', "/")),
        None => (head.to_string(), head.to_string()),
    };

    debug!(name = %name, folder = %folder, "Binding dynamic vault");
    let view = DynamicVault::new(Arc::clone(&ctx.storage), folder);
    ctx.namespace.assign(&name, Binding::Object(Arc::new(view)));
    Ok(vec![ResultRecord::new(name)])
}

// =============================================================================
// Shared
// =============================================================================

/// Load each `(path, name)` and bind the value to `name`
fn load_all(
    ctx: &mut Context<'_>,
    arguments: &Arguments,
    targets: Vec<(String, String)>,
) -> Result<Vec<ResultRecord>> {
    let importer = with_function(arguments, &*ctx.namespace, Direction::Import)?;

    let mut records = Vec::with_capacity(targets.len());
    for (path, name) in targets {
        let loaded = ctx.storage.load(&path, importer.as_ref())?;
        debug!(path = %path, name = %name, "Imported member");
        ctx.namespace.assign(&name, Binding::Value(loaded.value));
        records.push(ResultRecord::new(name).with_new(loaded.checksums));
    }
    Ok(records)
}
