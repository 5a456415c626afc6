//! `del` handlers.

use vault_core::ResultRecord;

use super::{keyword, member_path, Context};
use crate::parse::{unquote, Arguments};
use crate::{Error, Result};

/// Handle `del <name> from <folder>`.
pub fn delete_variable(ctx: &mut Context<'_>, arguments: &Arguments) -> Result<Vec<ResultRecord>> {
    let path = member_path(keyword(arguments, "from")?, keyword(arguments, "del")?);
    delete(ctx, &path)
}

/// Handle `del '<path>'`.
pub fn delete_path(ctx: &mut Context<'_>, arguments: &Arguments) -> Result<Vec<ResultRecord>> {
    let path = unquote(keyword(arguments, "del")?)?;
    delete(ctx, &path)
}

fn delete(ctx: &mut Context<'_>, path: &str) -> Result<Vec<ResultRecord>> {
    if path.contains('*') {
        return Err(Error::validation(format!(
            "wildcards are not supported in '{}', delete members one by one",
            path
        )));
    }
    Ok(vec![ctx.storage.delete(path)?])
}
