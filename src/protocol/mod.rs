pub mod input;
pub mod output;
pub mod tool_use;

pub use input::{HookInput, PermissionMode};
pub use output::{Decision, HookOutput, PreToolUseOutput};
pub use tool_use::ToolUse;
