use crate::classify::Safety;
use crate::config::Config;
use crate::protocol::{HookInput, HookOutput, ToolUse};
use crate::rewrite::{Rewrite, Rewriter};

pub(crate) const APP_NAME: &str = "rtk-hook";

/// Evaluate a hook input and return the rewrite to apply, if any.
///
/// Returns `None` when the hook has nothing to say: a tool other than Bash,
/// a missing or empty command, or a command that passes through unchanged.
/// Otherwise the output carries the original `tool_input` with `command`
/// replaced. An `allow` decision is added only for read-only commands with
/// auto-allow enabled; everything else is left to the user's policy.
///
/// # Examples
///
/// ```
/// use rtk_hook::config::Config;
/// use rtk_hook::decision::evaluate;
/// use rtk_hook::protocol::{Decision, HookInput};
///
/// let input: HookInput = serde_json::from_str(r#"{
///     "tool_name": "Bash",
///     "tool_input": {"command": "git status", "description": "Show status"}
/// }"#).unwrap();
///
/// let output = evaluate(&input, &Config::default()).unwrap();
/// let inner = &output.hook_specific_output;
/// assert_eq!(inner.updated_input["command"], "rtk git status");
/// assert_eq!(inner.updated_input["description"], "Show status");
/// assert_eq!(inner.permission_decision, Some(Decision::Allow));
/// ```
pub fn evaluate(input: &HookInput, config: &Config) -> Option<HookOutput> {
    let command = match ToolUse::parse(&input.tool_name, &input.tool_input) {
        ToolUse::Bash {
            command: Some(command),
        } => command,
        ToolUse::Bash { command: None } => {
            tracing::debug!("Bash input without a command");
            return None;
        }
        ToolUse::Other { tool_name } => {
            tracing::debug!(tool_name, "not a Bash tool use");
            return None;
        }
    };

    let rewrite = Rewriter::new(config).rewrite(command)?;
    let updated_input = updated_input(&input.tool_input, &rewrite);

    if config.auto_allow && rewrite.safety == Safety::ReadOnly {
        Some(HookOutput::rewrite_and_allow(
            updated_input,
            reason(&config.tool, rewrite.safety),
        ))
    } else {
        Some(HookOutput::rewrite(updated_input))
    }
}

/// The original tool input with only `command` replaced.
fn updated_input(tool_input: &serde_json::Value, rewrite: &Rewrite) -> serde_json::Value {
    let mut updated = tool_input.clone();
    updated["command"] = serde_json::Value::String(rewrite.rewritten.clone());
    updated
}

fn reason(tool: &str, safety: Safety) -> String {
    format!("{APP_NAME}: rewritten to {tool} ({safety})")
}
