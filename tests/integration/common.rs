//! Shared fixtures for integration tests.

use tempfile::TempDir;

pub use datavault::*;

/// One opened vault in a temporary directory with a small scope
pub struct Fixture {
    pub dir: TempDir,
    pub dispatcher: Dispatcher,
    pub scope: Scope,
    pub sink: Collector,
}

impl Fixture {
    /// Unencrypted vault, built-in functions plus `frame` and `note`
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let mut dispatcher = Dispatcher::new();
        dispatcher
            .open_vault(&format!("-p '{}' -s False", vault_path(&dir)))
            .unwrap();
        Self {
            dir,
            dispatcher,
            scope: scope(),
            sink: Collector::new(),
        }
    }

    pub fn run(&mut self, line: &str) -> Result<Metadata> {
        self.dispatcher.vault(line, &mut self.scope, &mut self.sink)
    }

    pub fn value(&self, name: &str) -> Option<Value> {
        self.scope.lookup(name).and_then(|b| b.as_value().cloned())
    }
}

pub fn vault_path(dir: &TempDir) -> String {
    dir.path().join("storage.vault").display().to_string()
}

/// A two-column frame with a float and a string column
pub fn frame() -> Value {
    Value::Frame(
        Frame::new(
            vec!["score".to_string(), "label".to_string()],
            vec![
                vec![Value::Float(0.5), Value::from("low")],
                vec![Value::Float(2.25), Value::from("high")],
            ],
        )
        .unwrap(),
    )
}

pub fn scope() -> Scope {
    let mut scope = Scope::new();
    scope.assign("frame", frame().into());
    scope.assign("note", Value::from("remember the milk").into());
    scope.assign(
        "json",
        Module::new("json")
            .with("dumps", codec::json_exporter())
            .with("loads", codec::json_importer())
            .into(),
    );
    scope
}
