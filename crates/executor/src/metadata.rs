//! Provenance metadata of one executed command.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use vault_core::ResultRecord;

/// Format of `finished_human_readable`, e.g. `Monday, 19. Oct 2026 14:05`
pub const HUMAN_TIME_FORMAT: &str = "%A, %d. %b %Y %H:%M";

/// Everything recorded about one command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Main keyword of the action (`store`, `import`, `del`, `assert`)
    pub action: String,
    /// One record per object touched
    pub result: Vec<ResultRecord>,
    /// RFC 3339 UTC start time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<String>,
    /// RFC 3339 UTC finish time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished: Option<String>,
    /// Finish time for display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_human_readable: Option<String>,
    /// The command line as typed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl Metadata {
    /// Metadata with results only; timing and command are added by the dispatcher
    pub fn new(action: impl Into<String>, result: Vec<ResultRecord>) -> Self {
        Self {
            action: action.into(),
            result,
            started: None,
            finished: None,
            finished_human_readable: None,
            command: None,
        }
    }

    /// Record start and finish times
    pub fn with_timing(mut self, started: DateTime<Utc>, finished: DateTime<Utc>) -> Self {
        self.started = Some(timestamp(started));
        self.finished = Some(timestamp(finished));
        self.finished_human_readable = Some(human_time(finished));
        self
    }

    /// Record the command line
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }
}

/// RFC 3339 with microseconds and a `Z` suffix
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Display form, see [`HUMAN_TIME_FORMAT`]
pub fn human_time(at: DateTime<Utc>) -> String {
    at.format(HUMAN_TIME_FORMAT).to_string()
}
