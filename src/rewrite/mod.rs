//! Routing recognized commands through the replacement tool.
//!
//! Everything outside the rewritten program invocations (separators,
//! whitespace, env prefixes, downstream pipeline stages, quoting) is copied
//! from the input unchanged.

pub(crate) mod launcher;
pub(crate) mod lexer;
pub(crate) mod rules;


use crate::classify::{classify, Safety};
use crate::config::Config;
use crate::domain::ProgramName;
use lexer::{Piece, Word};
use rules::{Invocation, Rule, RULES};

/// A command routed through the replacement tool.
#[derive(Debug, Clone, PartialEq)]
pub struct Rewrite {
    pub original: String,
    pub rewritten: String,
    /// Classification of the original command.
    pub safety: Safety,
}

/// Rewrites commands against the rule table with one configuration.
pub struct Rewriter<'c> {
    config: &'c Config,
    rules: &'static [Rule],
}

impl<'c> Rewriter<'c> {
    pub fn new(config: &'c Config) -> Self {
        Rewriter {
            config,
            rules: RULES,
        }
    }

    /// Rewrite `command`, or `None` when it passes through unchanged.
    pub fn rewrite(&self, command: &str) -> Option<Rewrite> {
        if command.trim().is_empty() {
            return None;
        }
        if command.contains("<<") {
            tracing::debug!("heredoc command left alone");
            return None;
        }
        if self.already_routed(command) {
            tracing::debug!(tool = %self.config.tool, "command already uses the tool");
            return None;
        }

        let pieces = lexer::split(command);
        tracing::debug!(pieces = pieces.len(), "split command");

        let mut rewritten = String::with_capacity(command.len() + 16);
        let mut changed = false;
        for piece in pieces {
            match piece {
                Piece::Operator(op) => rewritten.push_str(op),
                Piece::Segment {
                    text,
                    pipeline_head: true,
                } => match self.rewrite_segment(text) {
                    Some(segment) => {
                        changed = true;
                        rewritten.push_str(&segment);
                    }
                    None => rewritten.push_str(text),
                },
                Piece::Segment { text, .. } => rewritten.push_str(text),
            }
        }

        if !changed {
            return None;
        }

        let safety = classify(command);
        tracing::debug!(%rewritten, %safety, "rewrote command");
        Some(Rewrite {
            original: command.to_string(),
            rewritten,
            safety,
        })
    }

    /// Rewritten forms of a permission-rule command prefix.
    ///
    /// A prefix that rewrites as a command gives its rewritten form. A bare
    /// program gives the tool form of every rule head for that program
    /// (`cat` → `rtk read`). Anything else gives nothing.
    pub fn rewrite_prefix(&self, prefix: &str) -> Vec<String> {
        if let Some(rewrite) = self.rewrite(prefix) {
            return vec![rewrite.rewritten.trim().to_string()];
        }

        let words = lexer::words(prefix);
        let [only] = words.as_slice() else {
            return Vec::new();
        };
        let program = ProgramName::new(&only.value(prefix));
        if program.is_tool(&self.config.tool) || self.config.is_excluded(program.as_str(), None) {
            return Vec::new();
        }
        rules::heads_for(self.rules, program.as_str())
            .into_iter()
            .map(|head| format!("{} {head}", self.config.tool))
            .collect()
    }

    /// First program of the command, after env assignments, is the tool.
    fn already_routed(&self, command: &str) -> bool {
        let words = lexer::words(command);
        words
            .iter()
            .find(|w| !lexer::is_assignment(w.raw(command)))
            .is_some_and(|w| ProgramName::new(&w.value(command)).is_tool(&self.config.tool))
    }

    /// Rewrite one pipeline-head segment, keeping its env prefix and its
    /// surrounding whitespace.
    fn rewrite_segment(&self, text: &str) -> Option<String> {
        let words = lexer::words(text);
        let end = words.last()?.end;
        let body_start = words
            .iter()
            .position(|w| !lexer::is_assignment(w.raw(text)))?;
        let body = &words[body_start..];

        // Words index into `source`; trailing whitespace stays outside it.
        let source = &text[..end];
        let args = self.match_invocation(source, body)?;

        Some(format!(
            "{}{} {args}{}",
            &text[..body[0].start],
            self.config.tool,
            &text[end..]
        ))
    }

    /// Replacement-tool arguments for an invocation, tried directly and
    /// then through a launcher.
    fn match_invocation(&self, source: &str, body: &[Word]) -> Option<String> {
        let direct = Invocation::new(source, body)?;
        if let Some((rule, args)) = rules::find(self.rules, &direct, None) {
            return self.unless_excluded(&direct, rule, args);
        }

        let values: Vec<String> = body.iter().map(|w| w.value(source)).collect();
        let values: Vec<&str> = values.iter().map(String::as_str).collect();
        let (family, consumed) = launcher::strip(&values)?;
        let launched = Invocation::new(source, &body[consumed..])?;
        let (rule, args) = rules::find(self.rules, &launched, Some(family))?;
        tracing::debug!(launcher = ?family, "matched through launcher");
        self.unless_excluded(&launched, rule, args)
    }

    fn unless_excluded(
        &self,
        invocation: &Invocation<'_>,
        rule: &Rule,
        args: String,
    ) -> Option<String> {
        let program = invocation.program.as_str();
        let subcommand = rules::subcommand_index(program, &invocation.values)
            .map(|i| invocation.values[i].as_str());
        if self.config.is_excluded(program, subcommand) {
            tracing::debug!(program, ?subcommand, "excluded by config");
            return None;
        }
        tracing::debug!(program = rule.program, head = rule.head, "matched rule");
        Some(args)
    }
}

/// Rewrite `command` with `config`; see [`Rewriter::rewrite`].
pub fn rewrite_command(command: &str, config: &Config) -> Option<Rewrite> {
    Rewriter::new(config).rewrite(command)
}
