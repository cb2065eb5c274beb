use serde_json::Value;

/// The part of a tool invocation the hook acts on, borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolUse<'a> {
    /// A `Bash` call. `command` is `None` when `tool_input.command` is
    /// missing, not a string, or only whitespace.
    Bash { command: Option<&'a str> },
    /// Any other tool; never rewritten.
    Other { tool_name: &'a str },
}

impl<'a> ToolUse<'a> {
    /// Classify a tool call by name and pull out the shell command.
    ///
    /// # Examples
    ///
    /// ```
    /// use rtk_hook::protocol::ToolUse;
    ///
    /// let input = serde_json::json!({"command": "git status", "timeout": 5000});
    /// assert_eq!(ToolUse::parse("Bash", &input).command(), Some("git status"));
    /// assert_eq!(ToolUse::parse("Read", &input).command(), None);
    /// ```
    pub fn parse(tool_name: &'a str, tool_input: &'a Value) -> Self {
        if tool_name != "Bash" {
            return ToolUse::Other { tool_name };
        }
        let command = tool_input
            .get("command")
            .and_then(Value::as_str)
            .filter(|c| !c.trim().is_empty());
        ToolUse::Bash { command }
    }

    /// The shell command to rewrite, if this is a usable Bash call.
    pub fn command(&self) -> Option<&'a str> {
        match self {
            ToolUse::Bash { command } => *command,
            ToolUse::Other { .. } => None,
        }
    }
}
