use serde::Serialize;
use serde_json::Value;

/// The output returned to Claude Code on stdout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookOutput {
    pub hook_specific_output: PreToolUseOutput,
}

/// PreToolUse-specific output carrying the rewritten tool input and, for
/// auto-approved commands, the permission decision.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreToolUseOutput {
    pub hook_event_name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission_decision: Option<Decision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission_decision_reason: Option<String>,
    pub updated_input: Value,
}

/// The permission decision the hook may report.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Allow,
}

impl HookOutput {
    /// Replace the tool input and leave the decision to the user's policy.
    pub fn rewrite(updated_input: Value) -> Self {
        HookOutput {
            hook_specific_output: PreToolUseOutput {
                hook_event_name: "PreToolUse",
                permission_decision: None,
                permission_decision_reason: None,
                updated_input,
            },
        }
    }

    /// Replace the tool input and approve it.
    pub fn rewrite_and_allow(updated_input: Value, reason: impl Into<String>) -> Self {
        HookOutput {
            hook_specific_output: PreToolUseOutput {
                hook_event_name: "PreToolUse",
                permission_decision: Some(Decision::Allow),
                permission_decision_reason: Some(reason.into()),
                updated_input,
            },
        }
    }
}
