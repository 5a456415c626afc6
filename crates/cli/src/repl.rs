//! REPL loop with rustyline.
//!
//! Interactive mode: prompt, history, TAB completion.
//! Pipe mode: read lines from stdin, execute each.

use std::io::{self, BufRead, Write};

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Context, Editor, Helper};
use tracing::warn;

use crate::format::format_error;
use crate::parse::{parse_line, CliAction};
use crate::state::SessionState;

/// Run the interactive REPL.
pub fn run_repl(state: &mut SessionState) {
    let config = Config::builder()
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .build();

    let mut rl: Editor<VaultHelper, _> = match Editor::with_config(config) {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("(error) cannot start line editor: {}", e);
            return;
        }
    };
    rl.set_helper(Some(VaultHelper));

    let history_path = history_file();
    if let Some(ref path) = history_path {
        let _ = rl.load_history(path);
    }

    let stdout = io::stdout();
    loop {
        match rl.readline(&state.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match parse_line(trimmed) {
                    Ok(CliAction::Quit) => break,
                    Ok(CliAction::Clear) => print!("\x1B[2J\x1B[1;1H"),
                    Ok(action) => {
                        if let Err(e) = state.execute(action, &mut stdout.lock()) {
                            eprintln!("{}", format_error(&e));
                        }
                    }
                    Err(e) => eprintln!("(error) {}", e),
                }
                let _ = stdout.lock().flush();
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("(error) {:?}", err);
                break;
            }
        }
    }

    if let Some(ref path) = history_path {
        if let Err(e) = rl.save_history(path) {
            warn!(path = %path, error = %e, "Could not save history");
        }
    }
}

/// Run in pipe mode: read lines from stdin, execute each.
///
/// Returns 1 if any line failed, 0 otherwise.
pub fn run_pipe(state: &mut SessionState) -> i32 {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_lines(state, stdin.lock().lines().map_while(|l| l.ok()), &mut stdout.lock())
}

/// Execute each line in turn; blank lines and `#` comments are skipped.
fn run_lines(
    state: &mut SessionState,
    lines: impl Iterator<Item = String>,
    out: &mut dyn Write,
) -> i32 {
    let mut exit_code = 0;
    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match parse_line(trimmed) {
            Ok(CliAction::Quit) => break,
            Ok(CliAction::Clear) => {}
            Ok(action) => {
                if let Err(e) = state.execute(action, out) {
                    eprintln!("{}", format_error(&e));
                    exit_code = 1;
                }
            }
            Err(e) => {
                eprintln!("(error) {}", e);
                exit_code = 1;
            }
        }
    }
    exit_code
}

fn history_file() -> Option<String> {
    std::env::var("HOME")
        .ok()
        .map(|h| format!("{}/.datavault_history", h))
}

// =========================================================================
// TAB Completion
// =========================================================================

/// First words a line can start with.
const TOP_LEVEL_COMMANDS: &[&str] = &[
    "open_vault", "vault", "store", "import", "from", "del", "assert", "let", "load", "show",
    "ls", "vars", "help", "clear", "quit", "exit",
];

/// Keywords that may follow once a vault command has started.
const COMMAND_KEYWORDS: &[&str] = &["in", "as", "with", "import", "from", "is"];

struct VaultHelper;

impl Helper for VaultHelper {}
impl Validator for VaultHelper {}
impl Highlighter for VaultHelper {}
impl Hinter for VaultHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Completer for VaultHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line_to_pos = &line[..pos];
        let words: Vec<&str> = line_to_pos.split_whitespace().collect();
        let trailing_space = line_to_pos.ends_with(' ');

        let (prefix, pool) = match (words.as_slice(), trailing_space) {
            ([], _) => ("", TOP_LEVEL_COMMANDS),
            ([first], false) => (*first, TOP_LEVEL_COMMANDS),
            (_, true) => ("", COMMAND_KEYWORDS),
            ([.., last], false) => (*last, COMMAND_KEYWORDS),
        };

        let candidates = pool
            .iter()
            .filter(|word| word.starts_with(prefix))
            .map(|word| Pair {
                display: word.to_string(),
                replacement: word.to_string(),
            })
            .collect();
        Ok((pos - prefix.len(), candidates))
    }
}
