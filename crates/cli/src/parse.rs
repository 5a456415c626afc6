//! REPL line → `CliAction`.
//!
//! Vault commands are passed through untouched; the executor tokenizes them.
//! Everything else is a shell command operating on the session's scope.

use vault_executor::parse::{is_identifier, tokenize, unquote};

/// Words that start a vault command without the `vault` prefix
const ACTION_WORDS: &[&str] = &["store", "import", "from", "del", "assert"];

/// What one REPL line asks for
#[derive(Debug, Clone, PartialEq)]
pub enum CliAction {
    /// `open_vault <settings line>`
    OpenVault(String),
    /// `vault <command>` or a bare command
    Vault(String),
    /// `let <name> = <literal>`
    Let { name: String, literal: String },
    /// `load <name> from '<file.tsv>'`
    Load { name: String, file: String },
    /// `show <name>`
    Show(String),
    /// `ls [<folder>]`
    Ls(Option<String>),
    /// `vars`
    Vars,
    /// `help [<keyword>]`
    Help(Option<String>),
    /// `clear`
    Clear,
    /// `quit` / `exit`
    Quit,
}

/// Parse one non-empty line.
pub fn parse_line(line: &str) -> Result<CliAction, String> {
    let trimmed = line.trim();
    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (trimmed, ""),
    };

    match word {
        "quit" | "exit" => Ok(CliAction::Quit),
        "clear" => Ok(CliAction::Clear),
        "vars" => Ok(CliAction::Vars),
        "help" => Ok(CliAction::Help(optional(rest))),
        "ls" => Ok(CliAction::Ls(optional(rest))),
        "open_vault" => Ok(CliAction::OpenVault(rest.to_string())),
        "vault" if rest.is_empty() => Err("vault needs a command, try 'help'".to_string()),
        "vault" => Ok(CliAction::Vault(rest.to_string())),
        "show" => parse_show(rest),
        "let" => parse_let(rest),
        "load" => parse_load(rest),
        w if ACTION_WORDS.contains(&w) => Ok(CliAction::Vault(trimmed.to_string())),
        other => Err(format!("Unknown command: {}", other)),
    }
}

fn optional(rest: &str) -> Option<String> {
    (!rest.is_empty()).then(|| rest.to_string())
}

fn parse_show(rest: &str) -> Result<CliAction, String> {
    if rest.is_empty() {
        return Err("Usage: show <name>".to_string());
    }
    Ok(CliAction::Show(rest.to_string()))
}

fn parse_let(rest: &str) -> Result<CliAction, String> {
    let (name, literal) = rest
        .split_once('=')
        .ok_or_else(|| "Usage: let <name> = <value>".to_string())?;
    let (name, literal) = (name.trim(), literal.trim());
    if !is_identifier(name) {
        return Err(format!("'{}' is not a valid identifier", name));
    }
    if literal.is_empty() {
        return Err(format!("no value given for '{}'", name));
    }
    Ok(CliAction::Let {
        name: name.to_string(),
        literal: literal.to_string(),
    })
}

fn parse_load(rest: &str) -> Result<CliAction, String> {
    let tokens = tokenize(rest).map_err(|e| e.to_string())?;
    match tokens.as_slice() {
        [name, from, file] if from == "from" => {
            if !is_identifier(name) {
                return Err(format!("'{}' is not a valid identifier", name));
            }
            Ok(CliAction::Load {
                name: name.clone(),
                file: unquote(file).map_err(|e| e.to_string())?,
            })
        }
        _ => Err("Usage: load <name> from '<file.tsv>'".to_string()),
    }
}
