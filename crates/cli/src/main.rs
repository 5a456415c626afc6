//! Data vault shell.
//!
//! Two modes:
//! - **REPL mode**: `datavault [flags]` with stdin on a TTY
//! - **Pipe mode**: `datavault [flags] < script` runs one line at a time
//!
//! The vault is opened up front when a path or settings file is given;
//! otherwise the first `open_vault` line opens it, starting from the flags.

mod commands;
mod format;
mod parse;
mod repl;
mod state;
mod value;

use std::io::IsTerminal;
use std::path::Path;
use std::process;
use std::str::FromStr;

use tracing::Level;

use vault_executor::{Dispatcher, MetadataLog, Session, VaultSettings, CONFIG_FILE_NAME};

use commands::build_cli;
use format::format_error;
use state::SessionState;

fn main() {
    let matches = build_cli().get_matches();
    init_logging(&matches);

    let (settings, open_now) = match settings_from(&matches) {
        Ok(found) => found,
        Err(e) => {
            eprintln!("{}", format_error(&e));
            process::exit(1);
        }
    };

    let mut dispatcher = Dispatcher::with_settings(settings.clone());
    if open_now {
        match Session::open(settings) {
            Ok(session) => {
                for warning in dispatcher.open_with(session).warnings() {
                    eprintln!("{}", warning);
                }
            }
            Err(e) => {
                eprintln!("{}", format_error(&e));
                process::exit(1);
            }
        }
    }

    let metadata_log = matches
        .get_one::<String>("metadata-log")
        .map(MetadataLog::new);
    let mut state = SessionState::new(dispatcher, metadata_log);

    if std::io::stdin().is_terminal() {
        repl::run_repl(&mut state);
    } else {
        let exit_code = repl::run_pipe(&mut state);
        process::exit(exit_code);
    }
}

/// Install the stderr subscriber; `--log-level` wins over `-v`.
fn init_logging(matches: &clap::ArgMatches) {
    let level = match matches.get_one::<String>("log-level") {
        Some(name) => Level::from_str(name).unwrap_or(Level::WARN),
        None => match matches.get_count("verbose") {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        },
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Defaults, then the settings file, then the flags.
///
/// The second element says whether anything named a vault explicitly.
fn settings_from(matches: &clap::ArgMatches) -> vault_executor::Result<(VaultSettings, bool)> {
    let (mut settings, mut explicit) = match matches.get_one::<String>("config") {
        Some(file) => (VaultSettings::from_toml_file(Path::new(file))?, true),
        None if Path::new(CONFIG_FILE_NAME).exists() => {
            (VaultSettings::from_toml_file(Path::new(CONFIG_FILE_NAME))?, true)
        }
        None => (VaultSettings::default(), false),
    };

    if let Some(path) = matches.get_one::<String>("vault") {
        settings.path = path.clone();
        explicit = true;
    }
    if let Some(variable) = matches.get_one::<String>("encryption-variable") {
        settings.encryption_variable = Some(variable.clone());
        explicit = true;
    }
    if matches.get_flag("insecure") {
        settings.secure = false;
    }
    if matches.get_flag("no-timestamp") {
        settings.timestamp = false;
    }
    if matches.get_flag("no-metadata") {
        settings.metadata = false;
    }
    Ok((settings, explicit))
}
