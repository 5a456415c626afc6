//! Parameter validators.
//!
//! Each validator checks one raw argument value. `Ok(false)` means the value
//! has the wrong shape; an `Err` carries a specific diagnosis (invalid
//! identifier, unknown name, bad hash length) that is shown to the user as
//! is.

use std::fmt;

use vault_core::{resolve, Binding, Namespace};

use crate::parse::{is_identifier, split_variables, unquote};
use crate::{Error, Result};

/// Kinds of argument values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Validator {
    /// Bare (unquoted) folder name
    Module,
    /// Quoted path literal
    Path,
    /// One variable defined in the namespace
    OneVariable,
    /// Comma-joined variables defined in the namespace
    OneOrManyVariables,
    /// Invocable binding in the namespace
    Function,
    /// One identifier
    ValidId,
    /// Comma-joined identifiers
    OneOrManyValidIds,
    /// `CRC32` or `SHA256`
    HashMethod,
    /// Hex digest of 8 or 64 characters
    Hash,
}

impl Validator {
    /// Name shown in syntax descriptions and misses
    pub fn name(&self) -> &'static str {
        match self {
            Validator::Module => "module",
            Validator::Path => "path",
            Validator::OneVariable => "one_variable",
            Validator::OneOrManyVariables => "one_or_many_variables",
            Validator::Function => "function",
            Validator::ValidId => "valid_id",
            Validator::OneOrManyValidIds => "one_or_many_valid_id",
            Validator::HashMethod => "hash_method",
            Validator::Hash => "hash",
        }
    }

    /// Check `value`, resolving names against `namespace` where needed
    pub fn check(&self, value: &str, namespace: &dyn Namespace) -> Result<bool> {
        match self {
            Validator::Module => Ok(unquote(value)? == value),
            Validator::Path => Ok(unquote(value)? != value),
            Validator::OneVariable => {
                lookup(value, "variable", namespace)?;
                Ok(true)
            }
            Validator::OneOrManyVariables => {
                for name in split_variables(value)? {
                    lookup(&name, "variable", namespace)?;
                }
                Ok(true)
            }
            Validator::Function => {
                if lookup(value, "function", namespace)?.is_callable() {
                    Ok(true)
                } else {
                    Err(Error::NotCallable {
                        name: value.to_string(),
                    })
                }
            }
            Validator::ValidId => {
                require_identifier(value)?;
                Ok(true)
            }
            Validator::OneOrManyValidIds => {
                for name in split_variables(value)? {
                    require_identifier(&name)?;
                }
                Ok(true)
            }
            Validator::HashMethod => Ok(value == "CRC32" || value == "SHA256"),
            Validator::Hash => {
                if value.len() == 8 || value.len() == 64 {
                    Ok(true)
                } else {
                    Err(Error::validation(
                        "Hash needs to have either 8 (CRC32) or 64 (SHA256) characters",
                    ))
                }
            }
        }
    }
}

impl fmt::Display for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn require_identifier(name: &str) -> Result<()> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(Error::InvalidIdentifier {
            kind: "identifier".to_string(),
            name: name.to_string(),
        })
    }
}

/// Resolve a (possibly dotted) name, classifying failures for `kind`
pub fn lookup(name: &str, kind: &str, namespace: &dyn Namespace) -> Result<Binding> {
    if !name.split('.').all(is_identifier) {
        return Err(Error::InvalidIdentifier {
            kind: kind.to_string(),
            name: name.to_string(),
        });
    }
    resolve(namespace, name).map_err(|e| match e {
        vault_core::Error::NameNotFound { .. } | vault_core::Error::AttributeNotFound { .. } => {
            Error::NameNotFound {
                kind: kind.to_string(),
                name: name.to_string(),
            }
        }
        other => Error::Storage(other),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vault_core::{Function, Module, Scope, Value};

    fn scope() -> Scope {
        let mut scope = Scope::new();
        scope.assign("x", Value::Int(1).into());
        scope.assign("y", Value::from("y").into());
        scope.assign(
            "json",
            Module::new("json")
                .with(
                    "dumps",
                    Function::exporter("json.dumps", |v: &Value| Ok(v.to_string().into_bytes())),
                )
                .into(),
        );
        scope
    }

    #[test]
    fn test_module_and_path_are_complementary() {
        let ns = scope();
        assert!(Validator::Module.check("my_frames", &ns).unwrap());
        assert!(!Validator::Module.check("'my_frames'", &ns).unwrap());
        assert!(Validator::Path.check("'a/b'", &ns).unwrap());
        assert!(!Validator::Path.check("a/b", &ns).unwrap());
    }

    #[test]
    fn test_variables_resolve() {
        let ns = scope();
        assert!(Validator::OneVariable.check("x", &ns).unwrap());
        assert!(Validator::OneOrManyVariables.check("x,y", &ns).unwrap());

        let err = Validator::OneOrManyVariables.check("x,z", &ns).unwrap_err();
        assert_eq!(
            err.to_string(),
            "variable 'z' is not defined in the global namespace"
        );
    }

    #[test]
    fn test_invalid_variable_name() {
        let err = Validator::OneVariable.check("1x", &scope()).unwrap_err();
        assert_eq!(err.to_string(), "'1x' is not a valid variable name");
    }

    #[test]
    fn test_function_must_be_callable() {
        let ns = scope();
        assert!(Validator::Function.check("json.dumps", &ns).unwrap());
        assert!(matches!(
            Validator::Function.check("x", &ns),
            Err(Error::NotCallable { .. })
        ));
        assert!(matches!(
            Validator::Function.check("pipe_delimited", &ns),
            Err(Error::NameNotFound { ref kind, .. }) if kind == "function"
        ));
    }

    #[test]
    fn test_identifiers() {
        let ns = scope();
        assert!(Validator::ValidId.check("anything_new", &ns).unwrap());
        assert!(Validator::OneOrManyValidIds.check("a, b", &ns).unwrap());
        assert!(matches!(
            Validator::ValidId.check("a.b", &ns),
            Err(Error::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            Validator::OneOrManyValidIds.check("a,*", &ns),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_hash_lengths() {
        let ns = scope();
        assert!(Validator::Hash.check("3FDAA797", &ns).unwrap());
        assert!(Validator::Hash.check(&"A".repeat(64), &ns).unwrap());
        let err = Validator::Hash.check("abc", &ns).unwrap_err();
        assert!(err.to_string().contains("8 (CRC32) or 64 (SHA256)"));
    }

    #[test]
    fn test_hash_method() {
        let ns = scope();
        assert!(Validator::HashMethod.check("CRC32", &ns).unwrap());
        assert!(Validator::HashMethod.check("SHA256", &ns).unwrap());
        assert!(!Validator::HashMethod.check("MD5", &ns).unwrap());
    }
}
