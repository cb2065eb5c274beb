//! Registering the hook in a settings file.

use serde_json::{json, Map, Value};

use super::{object_entry, SettingsError};

/// Binary name looked for when deciding whether the hook is registered.
const BINARY: &str = "rtk-hook";

/// Result of [`install`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Added,
    AlreadyPresent,
}

/// Shell command Claude Code runs for the hook: `<exe> hook`, with the
/// executable quoted when it contains whitespace.
pub fn hook_command(exe: &str) -> String {
    if exe.chars().any(char::is_whitespace) {
        format!("\"{exe}\" hook")
    } else {
        format!("{exe} hook")
    }
}

/// Add a `PreToolUse` entry with matcher `Bash` running `command`, unless
/// some entry already runs this binary's `hook` subcommand.
pub fn install(
    root: &mut Map<String, Value>,
    command: &str,
) -> Result<InstallOutcome, SettingsError> {
    let hooks = object_entry(root, "hooks", "hooks")?;
    let entries = match hooks
        .entry("PreToolUse")
        .or_insert_with(|| Value::Array(Vec::new()))
    {
        Value::Array(entries) => entries,
        _ => {
            return Err(SettingsError::WrongType {
                key: "hooks.PreToolUse".to_string(),
                expected: "an array",
            })
        }
    };

    if entries.iter().any(runs_hook) {
        tracing::debug!("hook already registered");
        return Ok(InstallOutcome::AlreadyPresent);
    }

    entries.push(json!({
        "matcher": "Bash",
        "hooks": [{"type": "command", "command": command}]
    }));
    tracing::debug!(command, "registered hook");
    Ok(InstallOutcome::Added)
}

/// Whether a matcher entry has a command hook running `rtk-hook ... hook`.
fn runs_hook(entry: &Value) -> bool {
    entry
        .get("hooks")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|hook| hook.get("command").and_then(Value::as_str))
        .any(is_hook_command)
}

fn is_hook_command(command: &str) -> bool {
    let words: Vec<&str> = command.split_whitespace().collect();
    let Some(hook_at) = words.iter().rposition(|w| *w == "hook") else {
        return false;
    };
    words[..hook_at].iter().any(|w| {
        let w = w.trim_matches(|c| c == '"' || c == '\'');
        w.rsplit('/').next() == Some(BINARY)
    })
}
