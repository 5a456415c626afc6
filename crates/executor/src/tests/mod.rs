//! Test modules for the executor crate.

use tempfile::TempDir;

use vault_core::{Frame, Module, Namespace, Scope, Value};
use vault_storage::{codec, Archive};

use crate::{Collector, Dispatcher, Metadata, Result, Session, VaultSettings};

pub mod actions;

/// A dispatcher over a temporary vault, a scope and a collecting sink.
pub(crate) struct Harness {
    pub dir: TempDir,
    pub dispatcher: Dispatcher,
    pub scope: Scope,
    pub sink: Collector,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_password(None)
    }

    pub fn with_password(password: Option<&str>) -> Self {
        let dir = TempDir::new().unwrap();
        let dispatcher = open(&dir, password, settings(&dir));
        Self {
            dir,
            dispatcher,
            scope: scope(),
            sink: Collector::new(),
        }
    }

    /// Like `new`, with different display toggles
    pub fn with_settings(adjust: impl FnOnce(&mut VaultSettings)) -> Self {
        let dir = TempDir::new().unwrap();
        let mut settings = settings(&dir);
        adjust(&mut settings);
        let dispatcher = open(&dir, None, settings);
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

    /// A second dispatcher on the same archive file
    pub fn reopen(&self, password: Option<&str>) -> Dispatcher {
        open(&self.dir, password, settings(&self.dir))
    }

    pub fn value(&self, name: &str) -> Option<Value> {
        self.scope.lookup(name).and_then(|b| b.as_value().cloned())
    }
}

fn settings(dir: &TempDir) -> VaultSettings {
    VaultSettings {
        path: dir.path().join("storage.vault").display().to_string(),
        secure: false,
        ..VaultSettings::default()
    }
}

fn open(dir: &TempDir, password: Option<&str>, settings: VaultSettings) -> Dispatcher {
    let archive = Archive::new(
        dir.path().join("storage.vault"),
        password.map(str::to_string),
    )
    .with_kdf_iterations(10);
    let mut dispatcher = Dispatcher::new();
    dispatcher.open_with(Session::with_archive(settings, archive));
    dispatcher
}

/// Frame `x` (columns `a`, `b`), string `y`, and the built-in functions
pub(crate) fn frame_x() -> Value {
    Value::Frame(
        Frame::new(
            vec!["a".to_string(), "b".to_string()],
            vec![
                vec![Value::Int(1), Value::Int(1)],
                vec![Value::Int(1), Value::Int(2)],
            ],
        )
        .unwrap(),
    )
}

fn scope() -> Scope {
    let mut scope = Scope::new();
    scope.assign("x", frame_x().into());
    scope.assign("y", Value::from("text").into());
    scope.assign(
        "json",
        Module::new("json")
            .with("dumps", codec::json_exporter())
            .with("loads", codec::json_importer())
            .into(),
    );
    scope.assign("text", codec::text_importer().into());
    scope
}
