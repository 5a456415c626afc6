//! Shell session: the dispatcher, the variables it works on, and the
//! optional metadata log.

use std::io::Write;

use tracing::debug;

use vault_executor::{
    codec, lookup, Binding, Dispatcher, Error, Fanout, MetadataLog, Module, Namespace, Result,
    Scope, Sink, Value,
};

use crate::format::{format_binding, format_list, format_value, Printer};
use crate::parse::CliAction;
use crate::value::parse_value;

/// Wraps the dispatcher and the user's variables.
pub struct SessionState {
    dispatcher: Dispatcher,
    scope: Scope,
    metadata_log: Option<MetadataLog>,
}

impl SessionState {
    /// Create a session with the built-in functions bound.
    pub fn new(dispatcher: Dispatcher, metadata_log: Option<MetadataLog>) -> Self {
        Self {
            dispatcher,
            scope: builtins(),
            metadata_log,
        }
    }

    /// Variables of the session
    #[cfg(test)]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Run one action, writing what it reports to `out`.
    ///
    /// `Quit` and `Clear` are the REPL's business and do nothing here.
    pub fn execute(&mut self, action: CliAction, out: &mut dyn Write) -> Result<()> {
        match action {
            CliAction::OpenVault(line) => {
                let session = self.dispatcher.open_vault(&line)?;
                for warning in session.warnings() {
                    write_line(out, warning)?;
                }
                write_line(out, &format!("Opened vault {}", session.settings().path))
            }
            CliAction::Vault(command) => {
                let mut printer = Printer::new(&mut *out);
                match self.metadata_log.as_mut() {
                    Some(log) => {
                        let mut sinks = Fanout::new(vec![&mut printer as &mut dyn Sink, log]);
                        self.dispatcher.vault(&command, &mut self.scope, &mut sinks)?;
                    }
                    None => {
                        self.dispatcher
                            .vault(&command, &mut self.scope, &mut printer)?;
                    }
                }
                Ok(())
            }
            CliAction::Let { name, literal } => {
                let value = parse_value(&literal);
                debug!(name = %name, kind = value.type_name(), "Assigned variable");
                self.scope.assign(&name, value.into());
                Ok(())
            }
            CliAction::Load { name, file } => {
                let text = std::fs::read_to_string(&file).map_err(|e| Error::Storage(e.into()))?;
                let frame = codec::frame_from_tsv(&text)?;
                let (rows, columns) = frame.shape();
                self.scope.assign(&name, Value::Frame(frame).into());
                write_line(
                    out,
                    &format!("Loaded {} rows x {} columns into {}", rows, columns, name),
                )
            }
            CliAction::Show(name) => {
                let text = match lookup(&name, "variable", &self.scope)? {
                    Binding::Value(value) => format_value(&value),
                    Binding::Object(object) => format_list(&object.attribute_names()?),
                    other => format_binding(&name, &other),
                };
                write_line(out, &text)
            }
            CliAction::Ls(folder) => {
                let session = self.dispatcher.session().ok_or_else(|| {
                    Error::configuration("Please setup the storage with open_vault first.")
                })?;
                let members = session.storage().list_members(folder.as_deref())?;
                write_line(out, &format_list(&members))
            }
            CliAction::Vars => {
                let lines: Vec<String> = self
                    .scope
                    .names()
                    .into_iter()
                    .filter_map(|name| {
                        let binding = self.scope.lookup(&name)?;
                        Some(format_binding(&name, &binding))
                    })
                    .collect();
                write_line(out, &lines.join("\n"))
            }
            CliAction::Help(keyword) => {
                let text = self.dispatcher.help(keyword.as_deref())?;
                write_line(out, &text)?;
                if keyword.is_none() {
                    write_line(out, SHELL_HELP)?;
                }
                Ok(())
            }
            CliAction::Clear | CliAction::Quit => Ok(()),
        }
    }

    /// REPL prompt, naming the open vault
    pub fn prompt(&self) -> String {
        match self.dispatcher.session() {
            Some(session) => format!("datavault:{}> ", session.settings().path),
            None => "datavault> ".to_string(),
        }
    }
}

const SHELL_HELP: &str = "\n# shell\n\
    \t - open_vault [-p <path>] [-e <variable>] [-s True|False] [-t True|False] [-m True|False]\n\
    \t - vault <command>\n\
    \t - let <name> = <value>\n\
    \t - load <name> from '<file.tsv>'\n\
    \t - show <name>\n\
    \t - ls [<folder>]\n\
    \t - vars\n\
    \t - help [<keyword>]\n\
    \t - quit";

/// `json.dumps`, `json.loads` and `text`
fn builtins() -> Scope {
    let mut scope = Scope::new();
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

fn write_line(out: &mut dyn Write, text: &str) -> Result<()> {
    writeln!(out, "{}", text).map_err(|e| Error::Storage(e.into()))
}
