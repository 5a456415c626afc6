//! Clap command definition.
//!
//! Every flag maps onto one `VaultSettings` field; the vault itself is opened
//! from them before the first line is read.

use clap::{Arg, ArgAction, Command};

/// Build the command line interface.
pub fn build_cli() -> Command {
    Command::new("datavault")
        .about("Store, import and verify objects in an encrypted data vault")
        .arg(
            Arg::new("vault")
                .long("vault")
                .short('p')
                .value_name("PATH")
                .help("Vault archive path (default: storage.vault)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("Settings file (default: vault.toml if present)"),
        )
        .arg(
            Arg::new("encryption-variable")
                .long("encryption-variable")
                .short('e')
                .value_name("NAME")
                .help("Environment variable holding the vault password"),
        )
        .arg(
            Arg::new("insecure")
                .long("insecure")
                .help("Do not warn when the vault is not encrypted")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-timestamp")
                .long("no-timestamp")
                .help("Do not print a stamp after each command")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-metadata")
                .long("no-metadata")
                .help("Do not report full metadata records")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("metadata-log")
                .long("metadata-log")
                .value_name("FILE")
                .help("Append metadata records as JSON lines to FILE"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("More log output on stderr (repeatable)")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level: error, warn, info, debug or trace")
                .conflicts_with("verbose"),
        )
}
