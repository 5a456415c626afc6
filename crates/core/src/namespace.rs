//! Namespace model used for identifier resolution
//!
//! A namespace maps names to bindings. Commands refer to variables and
//! functions by (possibly dotted) name; `resolve` turns such a name into
//! the binding it denotes:
//!
//! 1. The whole string is looked up first (`a.b` may be bound literally).
//! 2. Otherwise the head (`a`) is looked up and every remaining part is
//!    taken as an attribute of the previous binding.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::value::Value;

/// Serializes a value into bytes
pub type ExportFn = Arc<dyn Fn(&Value) -> Result<Vec<u8>> + Send + Sync>;

/// Deserializes bytes into a value
pub type ImportFn = Arc<dyn Fn(&[u8]) -> Result<Value> + Send + Sync>;

/// An invocable binding: a named exporter or importer
#[derive(Clone)]
pub enum Function {
    /// Value to bytes
    Exporter {
        /// Display name, e.g. `json.dumps`
        name: String,
        /// The conversion itself
        call: ExportFn,
    },
    /// Bytes to value
    Importer {
        /// Display name, e.g. `json.loads`
        name: String,
        /// The conversion itself
        call: ImportFn,
    },
}

impl Function {
    /// Wrap a closure as an exporter
    pub fn exporter<F>(name: impl Into<String>, call: F) -> Self
    where
        F: Fn(&Value) -> Result<Vec<u8>> + Send + Sync + 'static,
    {
        Function::Exporter {
            name: name.into(),
            call: Arc::new(call),
        }
    }

    /// Wrap a closure as an importer
    pub fn importer<F>(name: impl Into<String>, call: F) -> Self
    where
        F: Fn(&[u8]) -> Result<Value> + Send + Sync + 'static,
    {
        Function::Importer {
            name: name.into(),
            call: Arc::new(call),
        }
    }

    /// Name the function was registered under
    pub fn name(&self) -> &str {
        match self {
            Function::Exporter { name, .. } | Function::Importer { name, .. } => name,
        }
    }

    /// Whether this function maps values to bytes
    pub fn can_export(&self) -> bool {
        matches!(self, Function::Exporter { .. })
    }

    /// Whether this function maps bytes to values
    pub fn can_import(&self) -> bool {
        matches!(self, Function::Importer { .. })
    }

    /// Run as an exporter
    pub fn export(&self, value: &Value) -> Result<Vec<u8>> {
        match self {
            Function::Exporter { call, .. } => call(value),
            Function::Importer { name, .. } => Err(Error::codec(format!(
                "'{}' is an importer and cannot export values",
                name
            ))),
        }
    }

    /// Run as an importer
    pub fn import(&self, bytes: &[u8]) -> Result<Value> {
        match self {
            Function::Importer { call, .. } => call(bytes),
            Function::Exporter { name, .. } => Err(Error::codec(format!(
                "'{}' is an exporter and cannot import bytes",
                name
            ))),
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Function::Exporter { name, .. } => write!(f, "Exporter({})", name),
            Function::Importer { name, .. } => write!(f, "Importer({})", name),
        }
    }
}

/// Something with named attributes
///
/// Implemented by modules of functions and by browsable vault folders.
/// `attribute` may do I/O (loading a member from the archive), so both
/// methods are fallible.
pub trait Object: Send + Sync {
    /// Short description used in listings, e.g. `module` or `vault folder`
    fn type_name(&self) -> &str;

    /// Names of all attributes, sorted
    fn attribute_names(&self) -> Result<Vec<String>>;

    /// Fetch one attribute, `None` if there is no such attribute
    fn attribute(&self, name: &str) -> Result<Option<Binding>>;
}

/// A named collection of bindings, e.g. the `json` module
#[derive(Debug, Clone, Default)]
pub struct Module {
    name: String,
    members: BTreeMap<String, Binding>,
}

impl Module {
    /// Create an empty module
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: BTreeMap::new(),
        }
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, binding: impl Into<Binding>) -> Self {
        self.members.insert(name.into(), binding.into());
        self
    }

    /// Module name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Object for Module {
    fn type_name(&self) -> &str {
        "module"
    }

    fn attribute_names(&self) -> Result<Vec<String>> {
        Ok(self.members.keys().cloned().collect())
    }

    fn attribute(&self, name: &str) -> Result<Option<Binding>> {
        Ok(self.members.get(name).cloned())
    }
}

/// What a name is bound to
#[derive(Clone)]
pub enum Binding {
    /// Plain data
    Value(Value),
    /// Exporter or importer
    Function(Function),
    /// Attribute container
    Object(Arc<dyn Object>),
}

impl Binding {
    /// Only functions can be invoked
    pub fn is_callable(&self) -> bool {
        matches!(self, Binding::Function(_))
    }

    /// The value, if this binding holds plain data
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Binding::Value(v) => Some(v),
            _ => None,
        }
    }

    /// The function, if this binding is invocable
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Binding::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Attribute access: object members and `Value::Object` keys
    pub fn attribute(&self, name: &str) -> Result<Option<Binding>> {
        match self {
            Binding::Object(object) => object.attribute(name),
            Binding::Value(Value::Object(map)) => Ok(map.get(name).cloned().map(Binding::Value)),
            _ => Ok(None),
        }
    }

    /// Short type description for listings
    pub fn type_name(&self) -> String {
        match self {
            Binding::Value(v) => v.type_name().to_string(),
            Binding::Function(f) if f.can_export() => "exporter".to_string(),
            Binding::Function(_) => "importer".to_string(),
            Binding::Object(o) => o.type_name().to_string(),
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Binding::Function(func) => f.debug_tuple("Function").field(func).finish(),
            Binding::Object(o) => write!(f, "Object({})", o.type_name()),
        }
    }
}

impl From<Value> for Binding {
    fn from(v: Value) -> Self {
        Binding::Value(v)
    }
}

impl From<Function> for Binding {
    fn from(f: Function) -> Self {
        Binding::Function(f)
    }
}

impl From<Module> for Binding {
    fn from(m: Module) -> Self {
        Binding::Object(Arc::new(m))
    }
}

/// The caller-provided scope commands resolve names against
pub trait Namespace {
    /// Look up a name exactly as written
    fn lookup(&self, name: &str) -> Option<Binding>;

    /// Bind (or rebind) a name
    fn assign(&mut self, name: &str, binding: Binding);

    /// All bound names, sorted
    fn names(&self) -> Vec<String>;
}

/// In-memory namespace
#[derive(Debug, Clone, Default)]
pub struct Scope {
    bindings: BTreeMap<String, Binding>,
}

impl Scope {
    /// Create an empty scope
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove a binding, returning it
    pub fn remove(&mut self, name: &str) -> Option<Binding> {
        self.bindings.remove(name)
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True if nothing is bound
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Namespace for Scope {
    fn lookup(&self, name: &str) -> Option<Binding> {
        self.bindings.get(name).cloned()
    }

    fn assign(&mut self, name: &str, binding: Binding) {
        self.bindings.insert(name.to_string(), binding);
    }

    fn names(&self) -> Vec<String> {
        self.bindings.keys().cloned().collect()
    }
}

/// Resolve a possibly dotted name against a namespace.
///
/// Fails with `NameNotFound` when the head is unbound and with
/// `AttributeNotFound` when an attribute along the way is missing.
pub fn resolve(namespace: &dyn Namespace, dotted: &str) -> Result<Binding> {
    if let Some(binding) = namespace.lookup(dotted) {
        return Ok(binding);
    }

    let mut parts = dotted.split('.');
    let head = parts.next().unwrap_or_default();
    let mut current = namespace
        .lookup(head)
        .ok_or_else(|| Error::NameNotFound {
            name: dotted.to_string(),
        })?;

    let mut walked = head.to_string();
    for part in parts {
        current = current
            .attribute(part)?
            .ok_or_else(|| Error::AttributeNotFound {
                object: walked.clone(),
                attribute: part.to_string(),
            })?;
        walked.push('.');
        walked.push_str(part);
    }
    Ok(current)
}
