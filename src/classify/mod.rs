//! Read-only vs. mutating classification of shell commands.

mod programs;

use serde::Serialize;

use crate::command;
use crate::rewrite::launcher;

/// Whether a command can be approved without consulting the user's policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Safety {
    /// Performs no mutation; safe to auto-approve.
    ReadOnly,
    /// May change files, remote state, or run arbitrary code.
    Mutating,
}

impl std::fmt::Display for Safety {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Safety::ReadOnly => write!(f, "read-only"),
            Safety::Mutating => write!(f, "mutating"),
        }
    }
}

/// Classify a whole shell command.
///
/// Read-only only when the command parses, runs at least one program, no
/// redirection writes a file, and every program invocation is read-only.
/// Anything that fails to parse is mutating.
pub fn classify(command: &str) -> Safety {
    let segments = match command::parse(command) {
        Ok(segments) => segments,
        Err(e) => {
            tracing::debug!(error = %e, "unparseable command classified as mutating");
            return Safety::Mutating;
        }
    };

    if segments.is_empty() {
        return Safety::Mutating;
    }

    let read_only = segments.iter().all(|segment| {
        if segment.writes_file {
            return false;
        }
        let mut words: Vec<&str> = Vec::with_capacity(segment.args.len() + 1);
        words.push(segment.program.as_str());
        words.extend(segment.args.iter().map(String::as_str));
        is_read_only(&words)
    });

    if read_only {
        Safety::ReadOnly
    } else {
        Safety::Mutating
    }
}

/// Tools a launcher may front and still count as read-only.
const LAUNCHABLE: &[&str] = &["eslint", "prettier", "tsc", "vue-tsc", "mypy", "ruff", "pip"];

/// Read-only check for one invocation, looking through launcher prefixes.
fn is_read_only(words: &[&str]) -> bool {
    if programs::is_read_only(words) {
        return true;
    }
    match launcher::strip(words) {
        Some((_, consumed)) if LAUNCHABLE.contains(&words[consumed]) => {
            programs::is_read_only(&words[consumed..])
        }
        _ => false,
    }
}
