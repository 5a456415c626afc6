//! The Dispatcher: single entry point for vault commands.
//!
//! ```text
//! line ──► tokenize ──► pair ──► pick action ──► choose handler ──► run
//!                                                                    │
//!                       sinks ◄── stamp/metadata ◄── timing ◄────────┘
//! ```

use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};

use vault_core::Namespace;

use crate::action::Action;
use crate::config::VaultSettings;
use crate::handlers::Context;
use crate::metadata::Metadata;
use crate::parse::parse_line;
use crate::session::Session;
use crate::sink::Sink;
use crate::{Error, Result};

/// Routes command lines to actions.
///
/// Holds the base settings and, once `open_vault` ran, the session.
///
/// # Example
///
/// ```ignore
/// use vault_executor::{Collector, Dispatcher};
/// use vault_core::Scope;
///
/// let mut dispatcher = Dispatcher::new();
/// dispatcher.open_vault("--path data.vault --secure False")?;
///
/// let mut scope = Scope::new();
/// let mut sink = Collector::new();
/// dispatcher.vault("store x in my_frames", &mut scope, &mut sink)?;
/// ```
#[derive(Default)]
pub struct Dispatcher {
    base: VaultSettings,
    session: Option<Session>,
}

impl Dispatcher {
    /// Dispatcher with built-in default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher whose `open_vault` starts from `base` (e.g. a `vault.toml`)
    pub fn with_settings(base: VaultSettings) -> Self {
        Self {
            base,
            session: None,
        }
    }

    /// Apply an `open_vault` argument line to the base settings and open the
    /// resulting vault, replacing any previous session.
    pub fn open_vault(&mut self, line: &str) -> Result<&Session> {
        let settings = self.base.clone().with_line(line)?;
        Ok(self.open_with(Session::open(settings)?))
    }

    /// Install an already opened session
    pub fn open_with(&mut self, session: Session) -> &Session {
        self.session.insert(session)
    }

    /// The active session, if any
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Run one command line.
    ///
    /// # Errors
    ///
    /// - `Configuration` before `open_vault`
    /// - `MalformedCommand` if the line does not contain exactly one action
    ///   keyword or does not pair up
    /// - whatever the chosen action raises
    pub fn vault(
        &self,
        line: &str,
        namespace: &mut dyn Namespace,
        sink: &mut dyn Sink,
    ) -> Result<Metadata> {
        let session = self.session.as_ref().ok_or_else(|| {
            Error::configuration("Please setup the storage with open_vault first.")
        })?;

        let arguments = parse_line(line)?;
        let action = one_action(
            Action::ALL
                .iter()
                .filter(|a| arguments.contains_key(a.main_keyword())),
        )?;

        let started = Utc::now();
        let clock = Instant::now();
        let mut ctx = Context {
            storage: session.storage().clone(),
            namespace,
        };
        let metadata = action.perform(&arguments, &mut ctx)?;
        let finished = Utc::now();

        let elapsed = clock.elapsed();
        let allowed = session.settings().allowed_duration;
        debug!(
            action = action.main_keyword(),
            elapsed_ms = elapsed.as_millis() as u64,
            allowed_secs = allowed,
            "Command finished"
        );
        if elapsed.as_secs() > allowed {
            warn!(
                action = action.main_keyword(),
                elapsed_secs = elapsed.as_secs(),
                allowed_secs = allowed,
                "Command took longer than allowed_duration"
            );
        }

        let metadata = metadata.with_timing(started, finished).with_command(line);
        info!(
            action = action.main_keyword(),
            objects = metadata.result.len(),
            "Vault command completed"
        );

        let settings = session.settings();
        let stamp = settings.timestamp.then(|| action.short_stamp(&metadata));
        sink.emit(stamp.as_deref(), settings.metadata.then_some(&metadata))?;
        Ok(metadata)
    }

    /// Syntax overview of one action (by keyword) or of all of them
    pub fn help(&self, keyword: Option<&str>) -> Result<String> {
        match keyword {
            Some(keyword) => Action::from_keyword(keyword)
                .map(|action| action.explain())
                .ok_or_else(|| Error::validation(format!("unknown action '{}'", keyword))),
            None => Ok(Action::ALL
                .iter()
                .map(Action::explain)
                .collect::<Vec<_>>()
                .join("\n\n")),
        }
    }
}

/// The single action named by the arguments
fn one_action<'a>(mut actions: impl Iterator<Item = &'a Action>) -> Result<Action> {
    match (actions.next(), actions.next()) {
        (Some(action), None) => Ok(*action),
        (None, _) => Err(Error::malformed(format!(
            "no action keyword, expected one of: {}",
            Action::ALL
                .iter()
                .map(Action::main_keyword)
                .collect::<Vec<_>>()
                .join(", ")
        ))),
        (Some(first), Some(second)) => Err(Error::malformed(format!(
            "more than one action keyword: {} and {}",
            first.main_keyword(),
            second.main_keyword()
        ))),
    }
}
