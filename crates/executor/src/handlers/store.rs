//! `store` handlers.

use tracing::debug;

use vault_core::ResultRecord;

use super::{keyword, member_path, variable_value, with_function, Context, Direction};
use crate::parse::{split_variables, unquote, Arguments};
use crate::{Error, Result};

// =============================================================================
// Individual Handlers
// =============================================================================

/// Handle `store <variable> in <folder> as <name>`.
pub fn store_in_module_as(ctx: &mut Context<'_>, arguments: &Arguments) -> Result<Vec<ResultRecord>> {
    let variables = split_variables(keyword(arguments, "store")?)?;
    let [variable] = variables.as_slice() else {
        return Err(Error::validation(format!(
            "'as' renames a single variable, got {}",
            variables.join(", ")
        )));
    };
    let path = member_path(keyword(arguments, "in")?, keyword(arguments, "as")?);
    store_all(ctx, arguments, vec![(path, variable.clone())])
}

/// Handle `store <variables> in <folder>`.
pub fn store_in_module(ctx: &mut Context<'_>, arguments: &Arguments) -> Result<Vec<ResultRecord>> {
    let folder = keyword(arguments, "in")?;
    let targets = split_variables(keyword(arguments, "store")?)?
        .into_iter()
        .map(|variable| (member_path(folder, &variable), variable))
        .collect();
    store_all(ctx, arguments, targets)
}

/// Handle `store <variable> in '<path>'`.
pub fn store_in_path(ctx: &mut Context<'_>, arguments: &Arguments) -> Result<Vec<ResultRecord>> {
    let path = unquote(keyword(arguments, "in")?)?;
    let variable = keyword(arguments, "store")?.to_string();
    store_all(ctx, arguments, vec![(path, variable)])
}

// =============================================================================
// Shared
// =============================================================================

/// Store each `(path, variable)`; a repeated path is stored once
fn store_all(
    ctx: &mut Context<'_>,
    arguments: &Arguments,
    targets: Vec<(String, String)>,
) -> Result<Vec<ResultRecord>> {
    let exporter = with_function(arguments, &*ctx.namespace, Direction::Export)?;

    let mut records = Vec::with_capacity(targets.len());
    let mut seen = Vec::with_capacity(targets.len());
    for (path, variable) in targets {
        if seen.contains(&path) {
            continue;
        }
        let value = variable_value(&*ctx.namespace, &variable)?;
        debug!(path = %path, variable = %variable, kind = value.type_name(), "Storing variable");
        records.push(ctx.storage.store(&path, &value, exporter.as_ref(), &variable)?);
        seen.push(path);
    }
    Ok(records)
}
