//! The table of tool invocations the replacement tool understands.

use super::launcher::LauncherFamily::{self, Js, Python};
use super::lexer::Word;
use crate::domain::ProgramName;

/// A program invocation as seen by the rule table: the underlying tool
/// (after env assignments and any launcher) and the words that follow it.
pub(crate) struct Invocation<'a> {
    /// Text the words index into.
    pub(crate) source: &'a str,
    pub(crate) program: ProgramName,
    pub(crate) args: &'a [Word],
    /// Unquoted values of `args`.
    pub(crate) values: Vec<String>,
}

impl<'a> Invocation<'a> {
    /// `words[0]` is the program; the rest are its arguments.
    pub(crate) fn new(source: &'a str, words: &'a [Word]) -> Option<Self> {
        let (program, args) = words.split_first()?;
        Some(Invocation {
            source,
            program: ProgramName::new(&program.value(source)),
            args,
            values: args.iter().map(|w| w.value(source)).collect(),
        })
    }

    /// Original text from the `index`th argument to the end.
    fn rest_from(&self, index: usize) -> &'a str {
        match self.args.get(index) {
            Some(word) => &self.source[word.start..],
            None => "",
        }
    }

    fn raw_arg(&self, index: usize) -> &'a str {
        self.args[index].raw(self.source)
    }
}

/// How a matched invocation becomes arguments of the replacement tool.
#[derive(Clone, Copy)]
pub(crate) enum Transform {
    /// Drop the first `skip` arguments, put `head` in front of the rest.
    Replace { head: &'static str, skip: usize },
    /// Argument reshaping that may still decline the invocation.
    Custom(fn(&Invocation<'_>) -> Option<String>),
}

/// One recognized tool invocation.
#[derive(Clone, Copy)]
pub(crate) struct Rule {
    pub(crate) program: &'static str,
    /// Accepted subcommands; empty accepts any invocation.
    pub(crate) subcommands: &'static [&'static str],
    /// Launcher family that may front this tool.
    pub(crate) launcher: Option<LauncherFamily>,
    pub(crate) transform: Transform,
    /// Replacement-tool form of the bare program, for program-wide
    /// permission rules.
    pub(crate) head: &'static str,
}

impl Rule {
    const fn prefix(
        program: &'static str,
        subcommands: &'static [&'static str],
        launcher: Option<LauncherFamily>,
        head: &'static str,
    ) -> Self {
        Rule {
            program,
            subcommands,
            launcher,
            transform: Transform::Replace { head, skip: 0 },
            head,
        }
    }

    const fn replace(
        program: &'static str,
        subcommands: &'static [&'static str],
        head: &'static str,
    ) -> Self {
        Rule {
            program,
            subcommands,
            launcher: None,
            transform: Transform::Replace { head, skip: 1 },
            head,
        }
    }

    const fn custom(
        program: &'static str,
        launcher: Option<LauncherFamily>,
        transform: fn(&Invocation<'_>) -> Option<String>,
        head: &'static str,
    ) -> Self {
        Rule {
            program,
            subcommands: &[],
            launcher,
            transform: Transform::Custom(transform),
            head,
        }
    }

    /// Whether this rule covers the invocation, reached directly (`via` is
    /// `None`) or through a launcher of the given family.
    fn accepts(&self, invocation: &Invocation<'_>, via: Option<LauncherFamily>) -> bool {
        if invocation.program != self.program {
            return false;
        }
        if via.is_some() && via != self.launcher {
            return false;
        }
        if self.subcommands.is_empty() {
            return true;
        }
        subcommand_index(self.program, &invocation.values)
            .is_some_and(|i| self.subcommands.contains(&invocation.values[i].as_str()))
    }

    /// Arguments for the replacement tool, or `None` when the transform
    /// declines.
    fn apply(&self, invocation: &Invocation<'_>) -> Option<String> {
        match self.transform {
            Transform::Replace { head, skip } => Some(join(head, invocation.rest_from(skip))),
            Transform::Custom(transform) => transform(invocation),
        }
    }
}

fn join(head: &str, rest: &str) -> String {
    if rest.is_empty() {
        head.to_string()
    } else {
        format!("{head} {rest}")
    }
}

const PIP_SUBCOMMANDS: &[&str] = &["list", "outdated", "install", "show"];

#[rustfmt::skip]
pub(crate) static RULES: &[Rule] = &[
    // Version control and forges
    Rule::prefix("git", &["status", "diff", "log", "add", "commit", "push", "pull", "branch", "fetch", "stash", "show", "worktree"], None, "git"),
    Rule::prefix("gh", &["pr", "issue", "run", "api", "release"], None, "gh"),

    // Rust
    Rule::prefix("cargo", &["test", "build", "clippy", "check", "install", "fmt"], None, "cargo"),

    // Files and search
    Rule::custom("cat", None, cat_to_read, "read"),
    Rule::custom("head", None, head_to_read, "read"),
    Rule::custom("tail", None, tail_to_read, "read"),
    Rule::custom("rg", None, search_to_grep, "grep"),
    Rule::custom("grep", None, search_to_grep, "grep"),
    Rule::prefix("ls", &[], None, "ls"),
    Rule::prefix("tree", &[], None, "tree"),
    Rule::prefix("find", &[], None, "find"),
    Rule::prefix("diff", &[], None, "diff"),

    // JavaScript and TypeScript
    Rule::custom("vitest", Some(Js), vitest_run, "vitest run"),
    Rule::replace("pnpm", &["test"], "vitest run"),
    Rule::replace("pnpm", &["lint"], "lint"),
    Rule::prefix("pnpm", &["list", "ls", "outdated", "install"], None, "pnpm"),
    Rule::prefix("npm", &["test", "run"], None, "npm"),
    Rule::prefix("tsc", &[], Some(Js), "tsc"),
    Rule::prefix("vue-tsc", &[], Some(Js), "tsc"),
    Rule::prefix("eslint", &[], Some(Js), "lint"),
    Rule::prefix("prettier", &[], Some(Js), "prettier"),
    Rule::prefix("playwright", &[], Some(Js), "playwright"),
    Rule::prefix("prisma", &[], Some(Js), "prisma"),
    Rule::prefix("next", &["build"], Some(Js), "next"),

    // Containers
    Rule::prefix("docker", &["ps", "images", "logs", "compose", "run", "build", "exec"], None, "docker"),
    Rule::prefix("kubectl", &["get", "logs", "describe", "apply"], None, "kubectl"),

    // Network
    Rule::prefix("curl", &[], None, "curl"),
    Rule::prefix("wget", &[], None, "wget"),
    Rule::prefix("ssh", &[], None, "ssh"),

    // Python
    Rule::prefix("pytest", &[], Some(Python), "pytest"),
    Rule::prefix("ruff", &["check", "format"], Some(Python), "ruff"),
    Rule::prefix("pip", PIP_SUBCOMMANDS, Some(Python), "pip"),
    Rule::prefix("pip3", PIP_SUBCOMMANDS, None, "pip"),
    Rule::custom("uv", None, uv_pip, "pip"),
    Rule::prefix("mypy", &[], Some(Python), "mypy"),

    // Go
    Rule::prefix("go", &["test", "build", "vet"], None, "go"),
    Rule::prefix("golangci-lint", &["run"], None, "golangci-lint"),
];

/// First rule in `rules` covering the invocation, with the replacement
/// tool's arguments.
pub(crate) fn find<'r>(
    rules: &'r [Rule],
    invocation: &Invocation<'_>,
    via: Option<LauncherFamily>,
) -> Option<(&'r Rule, String)> {
    rules
        .iter()
        .filter(|rule| rule.accepts(invocation, via))
        .find_map(|rule| rule.apply(invocation).map(|args| (rule, args)))
}

/// Distinct replacement-tool heads for a bare program, in table order.
pub(crate) fn heads_for(rules: &[Rule], program: &str) -> Vec<&'static str> {
    let mut heads: Vec<&'static str> = Vec::new();
    for rule in rules.iter().filter(|r| r.program == program) {
        if !heads.contains(&rule.head) {
            heads.push(rule.head);
        }
    }
    heads
}

/// Global options that take a separate value, per program.
fn value_options(program: &str) -> &'static [&'static str] {
    match program {
        "git" => &[
            "-C",
            "-c",
            "--git-dir",
            "--work-tree",
            "--namespace",
            "--config-env",
        ],
        "cargo" => &["-Z", "--config", "--color"],
        "gh" => &["-R", "--repo"],
        "docker" => &["-H", "--host", "--context", "-c", "--config", "-l", "--log-level"],
        "kubectl" => &[
            "-n",
            "--namespace",
            "--context",
            "--kubeconfig",
            "--cluster",
            "--user",
            "-s",
            "--server",
        ],
        _ => &[],
    }
}

/// Index of the subcommand in `args`, skipping global options (and their
/// values) and cargo's `+toolchain` selector.
pub(crate) fn subcommand_index<S: AsRef<str>>(program: &str, args: &[S]) -> Option<usize> {
    let takes_value = value_options(program);
    let mut index = 0;
    while let Some(arg) = args.get(index) {
        let arg = arg.as_ref();
        if arg.starts_with('-') {
            index += if takes_value.contains(&arg) { 2 } else { 1 };
        } else if program == "cargo" && arg.starts_with('+') {
            index += 1;
        } else {
            return Some(index);
        }
    }
    None
}

// ---- Custom transforms ----

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Input,
    Output,
}

/// Direction of a redirection word and whether its target is attached
/// (`>out`) rather than in the next word (`> out`).
///
/// Takes the raw word, so a quoted `">"` is an operand. Process
/// substitutions (`<(cmd)`) are operands too.
fn redirection(raw: &str) -> Option<(Direction, bool)> {
    let rest = match raw.strip_prefix('&') {
        Some(rest) => rest,
        None => raw.trim_start_matches(|c: char| c.is_ascii_digit()),
    };
    let (direction, target) = if let Some(t) = rest.strip_prefix('<') {
        (Direction::Input, t.strip_prefix(|c: char| matches!(c, '&' | '>')).unwrap_or(t))
    } else if let Some(t) = rest.strip_prefix('>') {
        (Direction::Output, t.strip_prefix(|c: char| matches!(c, '>' | '&' | '|')).unwrap_or(t))
    } else {
        return None;
    };
    if target.starts_with('(') {
        return None;
    }
    Some((direction, !target.is_empty()))
}

/// The arguments that are not redirections or redirection targets.
struct Operands {
    indices: Vec<usize>,
    stdin_redirected: bool,
}

impl Operands {
    fn of(invocation: &Invocation<'_>) -> Self {
        let mut indices = Vec::new();
        let mut stdin_redirected = false;
        let mut index = 0;
        while index < invocation.args.len() {
            match redirection(invocation.raw_arg(index)) {
                Some((direction, attached)) => {
                    stdin_redirected |= direction == Direction::Input;
                    index += if attached { 1 } else { 2 };
                }
                None => {
                    indices.push(index);
                    index += 1;
                }
            }
        }
        Operands {
            indices,
            stdin_redirected,
        }
    }
}

/// `cat FILE...` without options reads through the tool.
fn cat_to_read(invocation: &Invocation<'_>) -> Option<String> {
    let operands = Operands::of(invocation);
    if operands.indices.is_empty()
        || operands
            .indices
            .iter()
            .any(|&i| invocation.values[i].starts_with('-'))
    {
        return None;
    }
    Some(join("read", invocation.rest_from(0)))
}

fn head_to_read(invocation: &Invocation<'_>) -> Option<String> {
    let (lines, file) = line_window(&invocation.values)?;
    Some(format!(
        "read {} --max-lines {lines}",
        invocation.raw_arg(file)
    ))
}

fn tail_to_read(invocation: &Invocation<'_>) -> Option<String> {
    let (lines, file) = line_window(&invocation.values)?;
    Some(format!(
        "read {} --tail-lines {lines}",
        invocation.raw_arg(file)
    ))
}

/// Line count and file index for `head`/`tail` on a single file.
///
/// Accepts `FILE`, `-N FILE`, `-nN FILE`, `-n N FILE`, `--lines=N FILE` and
/// `--lines N FILE`. The count defaults to 10. Anything else (follow mode,
/// `+N` offsets, several files, byte counts) is declined.
fn line_window(values: &[String]) -> Option<(String, usize)> {
    let is_count = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    let is_file = |s: &str| !s.is_empty() && !s.starts_with('-');

    match values {
        [file] if is_file(file.as_str()) => Some(("10".to_string(), 0)),
        [flag, file] if is_file(file.as_str()) => {
            let count = flag
                .strip_prefix("--lines=")
                .or_else(|| flag.strip_prefix("-n"))
                .or_else(|| flag.strip_prefix('-'))?;
            is_count(count).then(|| (count.to_string(), 1))
        }
        [flag, count, file]
            if (flag == "-n" || flag == "--lines") && is_count(count.as_str()) && is_file(file.as_str()) =>
        {
            Some((count.clone(), 2))
        }
        _ => None,
    }
}

/// `rg`/`grep` with at least one argument; bare invocations and redirected
/// input search stdin.
fn search_to_grep(invocation: &Invocation<'_>) -> Option<String> {
    let operands = Operands::of(invocation);
    if operands.indices.is_empty() || operands.stdin_redirected {
        return None;
    }
    Some(join("grep", invocation.rest_from(0)))
}

/// Vitest always runs once through the tool; watch-style subcommands are
/// left alone.
fn vitest_run(invocation: &Invocation<'_>) -> Option<String> {
    match invocation.values.first().map(String::as_str) {
        Some("run") => Some(join("vitest run", invocation.rest_from(1))),
        Some("watch" | "dev" | "bench" | "init" | "list" | "related") => None,
        _ => Some(join("vitest run", invocation.rest_from(0))),
    }
}

/// `uv pip <subcommand>` maps onto the tool's pip filter.
fn uv_pip(invocation: &Invocation<'_>) -> Option<String> {
    match invocation.values.as_slice() {
        [pip, subcommand, ..] if pip == "pip" && PIP_SUBCOMMANDS.contains(&subcommand.as_str()) => {
            Some(join("pip", invocation.rest_from(1)))
        }
        _ => None,
    }
}
