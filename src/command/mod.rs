use brush_parser::ast;

use crate::domain::ProgramName;
use crate::rewrite::lexer::unquote;

/// One program invocation found in a shell command.
#[derive(Debug, PartialEq)]
pub(crate) struct CommandSegment {
    pub(crate) program: ProgramName,
    pub(crate) args: Vec<String>,
    /// A redirection on this command (or an enclosing compound command)
    /// writes to a file.
    pub(crate) writes_file: bool,
}

/// Error returned when a command string cannot be parsed.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ParseError(pub String);

/// Parse a shell command string into the program invocations it runs.
///
/// Builds a brush-parser AST and walks every and/or list, pipeline and
/// compound body. Wrappers such as `env` or `nohup` are replaced by the
/// program they launch.
pub(crate) fn parse(command: &str) -> Result<Vec<CommandSegment>, ParseError> {
    if command.trim().is_empty() {
        return Ok(vec![]);
    }

    let mut parser = brush_parser::Parser::builder()
        .reader(std::io::Cursor::new(command.to_string()))
        .build();

    let program = parser
        .parse_program()
        .map_err(|e| ParseError(e.to_string()))?;

    let mut segments = Vec::new();
    for complete_command in &program.complete_commands {
        visit_compound_list(complete_command, &mut segments);
    }
    Ok(segments)
}

/// Split combined short flags: `-la` → `["-l", "-a"]`.
///
/// Long flags, `-`, `--`, `key=value` forms and numeric options (`-20`)
/// are returned whole.
pub(crate) fn expand_flags(arg: &str) -> Vec<String> {
    if !arg.starts_with('-')
        || arg == "-"
        || arg.starts_with("--")
        || arg.contains('=')
        || arg[1..].chars().all(|c| c.is_ascii_digit())
    {
        return vec![arg.to_string()];
    }
    let chars: Vec<char> = arg[1..].chars().collect();
    if chars.len() == 1 {
        return vec![arg.to_string()];
    }
    chars.iter().map(|c| format!("-{c}")).collect()
}

fn visit_compound_list(list: &ast::CompoundList, segments: &mut Vec<CommandSegment>) {
    for item in &list.0 {
        visit_and_or_list(&item.0, segments);
    }
}

fn visit_and_or_list(list: &ast::AndOrList, segments: &mut Vec<CommandSegment>) {
    visit_pipeline(&list.first, segments);
    for and_or in &list.additional {
        match and_or {
            ast::AndOr::And(pipeline) | ast::AndOr::Or(pipeline) => {
                visit_pipeline(pipeline, segments);
            }
        }
    }
}

fn visit_pipeline(pipeline: &ast::Pipeline, segments: &mut Vec<CommandSegment>) {
    for command in &pipeline.seq {
        visit_command(command, segments);
    }
}

/// Builtins and utilities that run another program given in their arguments.
const TRANSPARENT_WRAPPERS: &[&str] = &["command", "env", "nohup", "exec", "builtin", "time"];

fn visit_command(command: &ast::Command, segments: &mut Vec<CommandSegment>) {
    match command {
        ast::Command::Simple(simple) => visit_simple(simple, segments),
        ast::Command::Compound(compound, redirects) => {
            let first = segments.len();
            visit_compound(compound, segments);
            let writes = redirects
                .as_ref()
                .is_some_and(|list| list.0.iter().any(redirect_writes_file));
            if writes {
                for segment in &mut segments[first..] {
                    segment.writes_file = true;
                }
            }
        }
        ast::Command::Function(func) => visit_compound(&func.body.0, segments),
        ast::Command::ExtendedTest(_) => {}
    }
}

fn visit_simple(simple: &ast::SimpleCommand, segments: &mut Vec<CommandSegment>) {
    let Some(word) = &simple.word_or_name else {
        return;
    };
    let name = unquote(&word.flatten());
    if name.is_empty() {
        return;
    }

    let prefix_items = simple.prefix.as_ref().map(|p| p.0.as_slice()).unwrap_or(&[]);
    let suffix_items = simple.suffix.as_ref().map(|s| s.0.as_slice()).unwrap_or(&[]);
    let writes_file = prefix_items
        .iter()
        .chain(suffix_items)
        .any(item_writes_file);

    let program = ProgramName::new(&name);
    if TRANSPARENT_WRAPPERS.contains(&program.as_str()) {
        let words = suffix_words(suffix_items);
        let unwrapped = unwrap_wrapper(program.as_str(), &words);
        if !unwrapped.is_empty() {
            segments.extend(unwrapped.into_iter().map(|mut seg| {
                seg.writes_file |= writes_file;
                seg
            }));
            return;
        }
    }

    segments.push(CommandSegment {
        args: normalize_args(&program, suffix_words(suffix_items)),
        program,
        writes_file,
    });
}

/// Unquoted text of every plain word in a prefix or suffix.
///
/// brush-parser keeps quotes in word text, so `"--fix"` has to become
/// `--fix` before any option is compared.
fn suffix_words(items: &[ast::CommandPrefixOrSuffixItem]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match item {
            ast::CommandPrefixOrSuffixItem::Word(word) => Some(unquote(&word.flatten())),
            _ => None,
        })
        .collect()
}

/// Programs whose options are whole words after a single dash
/// (`find -delete`), never bundles of letters.
const SINGLE_DASH_LONG_OPTIONS: &[&str] = &["find"];

/// Expand combined flags up to `--`; everything after it is positional.
fn normalize_args(program: &ProgramName, words: impl IntoIterator<Item = String>) -> Vec<String> {
    if SINGLE_DASH_LONG_OPTIONS.contains(&program.as_str()) {
        return words.into_iter().collect();
    }
    let mut args = Vec::new();
    let mut end_of_options = false;
    for text in words {
        if end_of_options || text == "--" {
            end_of_options = true;
            args.push(text);
        } else {
            args.extend(expand_flags(&text));
        }
    }
    args
}

fn item_writes_file(item: &ast::CommandPrefixOrSuffixItem) -> bool {
    match item {
        ast::CommandPrefixOrSuffixItem::IoRedirect(redirect) => redirect_writes_file(redirect),
        _ => false,
    }
}

/// Whether a redirection creates or modifies a file.
///
/// Descriptor duplication (`2>&1`) and `/dev/null` are not file writes.
fn redirect_writes_file(redirect: &ast::IoRedirect) -> bool {
    match redirect {
        ast::IoRedirect::File(_, kind, target) => {
            let writing = matches!(
                kind,
                ast::IoFileRedirectKind::Write
                    | ast::IoFileRedirectKind::Append
                    | ast::IoFileRedirectKind::Clobber
                    | ast::IoFileRedirectKind::ReadAndWrite
            );
            writing
                && match target {
                    ast::IoFileRedirectTarget::Filename(word) => {
                        !is_null_device(&unquote(&word.flatten()))
                    }
                    _ => false,
                }
        }
        ast::IoRedirect::OutputAndError(word, _) => !is_null_device(&unquote(&word.flatten())),
        _ => false,
    }
}

fn is_null_device(target: &str) -> bool {
    target == "/dev/null"
}

/// Options of each wrapper that take a separate value argument.
fn value_options(wrapper: &str) -> &'static [&'static str] {
    match wrapper {
        "env" => &["-u", "--unset", "-C", "--chdir", "-P"],
        "exec" => &["-a"],
        _ => &[],
    }
}

/// Find the program a wrapper launches and the arguments that follow it.
///
/// Nested wrappers (`env nohup git log`) are unwrapped repeatedly. A
/// `-S`/`--split-string` payload for `env` is parsed as a command of its own,
/// with any trailing words appended to its last segment.
fn unwrap_wrapper(wrapper: &str, words: &[String]) -> Vec<CommandSegment> {
    let mut wrapper = ProgramName::new(wrapper);
    let mut index = 0;

    while index < words.len() {
        let text = &words[index];

        if wrapper == "env" {
            let payload = if text == "-S" || text == "--split-string" {
                index += 1;
                words.get(index).cloned()
            } else if let Some(value) = text.strip_prefix("--split-string=") {
                Some(value.to_string())
            } else {
                text.strip_prefix("-S")
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
            };
            if let Some(payload) = payload {
                let mut segments = parse(&payload).unwrap_or_default();
                if let Some(last) = segments.last_mut() {
                    let trailing = normalize_args(&last.program, words[index + 1..].iter().cloned());
                    last.args.extend(trailing);
                }
                return segments;
            }
        }

        if text.starts_with('-') {
            if value_options(wrapper.as_str()).contains(&text.as_str()) {
                index += 1;
            }
            index += 1;
            continue;
        }
        if text.contains('=') {
            index += 1;
            continue;
        }

        let program = ProgramName::new(text);
        if TRANSPARENT_WRAPPERS.contains(&program.as_str()) {
            wrapper = program;
            index += 1;
            continue;
        }
        return vec![CommandSegment {
            args: normalize_args(&program, words[index + 1..].iter().cloned()),
            program,
            writes_file: false,
        }];
    }

    vec![]
}

fn visit_compound(command: &ast::CompoundCommand, segments: &mut Vec<CommandSegment>) {
    match command {
        ast::CompoundCommand::BraceGroup(cmd) => visit_compound_list(&cmd.list, segments),
        ast::CompoundCommand::Subshell(cmd) => visit_compound_list(&cmd.list, segments),
        ast::CompoundCommand::ForClause(cmd) => visit_compound_list(&cmd.body.list, segments),
        ast::CompoundCommand::ArithmeticForClause(cmd) => {
            visit_compound_list(&cmd.body.list, segments);
        }
        ast::CompoundCommand::WhileClause(cmd) | ast::CompoundCommand::UntilClause(cmd) => {
            visit_compound_list(&cmd.0, segments);
            visit_compound_list(&cmd.1.list, segments);
        }
        ast::CompoundCommand::IfClause(cmd) => {
            visit_compound_list(&cmd.condition, segments);
            visit_compound_list(&cmd.then, segments);
            if let Some(elses) = &cmd.elses {
                for clause in elses {
                    if let Some(condition) = &clause.condition {
                        visit_compound_list(condition, segments);
                    }
                    visit_compound_list(&clause.body, segments);
                }
            }
        }
        ast::CompoundCommand::CaseClause(cmd) => {
            for case_item in &cmd.cases {
                if let Some(body) = &case_item.cmd {
                    visit_compound_list(body, segments);
                }
            }
        }
        ast::CompoundCommand::Arithmetic(_) => {}
    }
}
