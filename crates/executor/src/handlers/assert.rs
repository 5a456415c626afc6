//! `assert` handlers.

use tracing::debug;

use vault_core::{Checksums, HashMethod, ResultRecord};

use super::{keyword, member_path, Context};
use crate::parse::{unquote, Arguments};
use crate::{Error, Result};

/// Handle `assert <variable> in <folder> is <hash>`.
pub fn assert_variable_hash(
    ctx: &mut Context<'_>,
    arguments: &Arguments,
) -> Result<Vec<ResultRecord>> {
    let path = member_path(keyword(arguments, "in")?, keyword(arguments, "assert")?);
    assert_hash(ctx, arguments, &path)
}

/// Handle `assert '<path>' is <hash>`.
pub fn assert_path_hash(ctx: &mut Context<'_>, arguments: &Arguments) -> Result<Vec<ResultRecord>> {
    let path = unquote(keyword(arguments, "assert")?)?;
    assert_hash(ctx, arguments, &path)
}

/// `with` if given, otherwise the method whose digests have the expected length
fn hash_method(arguments: &Arguments, expected: &str) -> Result<HashMethod> {
    match arguments.get("with") {
        Some(name) => name.parse().map_err(Error::validation),
        None => HashMethod::for_digest_len(expected.len()).ok_or_else(|| {
            Error::validation("Hash needs to have either 8 (CRC32) or 64 (SHA256) characters")
        }),
    }
}

fn assert_hash(ctx: &mut Context<'_>, arguments: &Arguments, path: &str) -> Result<Vec<ResultRecord>> {
    let expected = keyword(arguments, "is")?;
    let method = hash_method(arguments, expected)?;
    let calculated = ctx.storage.verify_checksum(path, method)?;
    debug!(path, method = method.name(), calculated = %calculated, "Verified checksum");

    if !calculated.eq_ignore_ascii_case(expected) {
        return Err(Error::ChecksumMismatch {
            subject: path.to_string(),
            method: method.name().to_string(),
            expected: expected.to_string(),
            calculated,
        });
    }
    Ok(vec![
        ResultRecord::new(path).with_old(Checksums::single(method, calculated))
    ])
}
