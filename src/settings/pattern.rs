//! `Bash(...)` permission rules.

use std::fmt;

/// How a rule's command part is matched by Claude Code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternForm {
    /// `Bash(cmd:*)`
    Prefix,
    /// `Bash(cmd *)`
    SpacedWildcard,
    /// `Bash(cmd*)`
    Wildcard,
    /// `Bash(cmd)`
    Exact,
}

/// A parsed `Bash(...)` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BashPattern {
    pub command: String,
    pub form: PatternForm,
}

impl BashPattern {
    /// Parse a permission rule; `None` for non-Bash rules, `Bash` without a
    /// pattern, and empty commands.
    pub fn parse(rule: &str) -> Option<Self> {
        let inner = rule.trim().strip_prefix("Bash(")?.strip_suffix(')')?;

        let (command, form) = if let Some(command) = inner.strip_suffix(":*") {
            (command, PatternForm::Prefix)
        } else if let Some(command) = inner.strip_suffix(" *") {
            (command, PatternForm::SpacedWildcard)
        } else if let Some(command) = inner.strip_suffix('*') {
            (command, PatternForm::Wildcard)
        } else {
            (inner, PatternForm::Exact)
        };

        let command = command.trim();
        if command.is_empty() {
            return None;
        }
        Some(BashPattern {
            command: command.to_string(),
            form,
        })
    }

    /// The same rule form around a different command.
    pub fn with_command(&self, command: &str) -> Self {
        BashPattern {
            command: command.to_string(),
            form: self.form,
        }
    }
}

impl fmt::Display for BashPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.form {
            PatternForm::Prefix => write!(f, "Bash({}:*)", self.command),
            PatternForm::SpacedWildcard => write!(f, "Bash({} *)", self.command),
            PatternForm::Wildcard => write!(f, "Bash({}*)", self.command),
            PatternForm::Exact => write!(f, "Bash({})", self.command),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! pattern_test {
        ($name:ident, $rule:expr, $command:expr, $form:expr) => {
            #[test]
            fn $name() {
                let pattern = BashPattern::parse($rule).expect("should parse");
                assert_eq!(pattern.command, $command);
                assert_eq!(pattern.form, $form);
                assert_eq!(pattern.to_string(), $rule);
            }
        };
    }

    pattern_test!(prefix_form, "Bash(git status:*)", "git status", PatternForm::Prefix);
    pattern_test!(spaced_wildcard_form, "Bash(npm run *)", "npm run", PatternForm::SpacedWildcard);
    pattern_test!(wildcard_form, "Bash(cargo test*)", "cargo test", PatternForm::Wildcard);
    pattern_test!(exact_form, "Bash(ls -la)", "ls -la", PatternForm::Exact);
    pattern_test!(bare_program, "Bash(cat:*)", "cat", PatternForm::Prefix);

    #[test]
    fn non_bash_rules_are_ignored() {
        assert_eq!(BashPattern::parse("Read(./src/**)"), None);
        assert_eq!(BashPattern::parse("WebFetch(domain:example.com)"), None);
        assert_eq!(BashPattern::parse("Bash"), None);
        assert_eq!(BashPattern::parse("Bash()"), None);
        assert_eq!(BashPattern::parse("Bash(:*)"), None);
    }

    #[test]
    fn with_command_keeps_form() {
        let pattern = BashPattern::parse("Bash(git log *)").unwrap();
        assert_eq!(
            pattern.with_command("rtk git log").to_string(),
            "Bash(rtk git log *)"
        );
    }
}
