//! Per-program read-only checks.

use crate::domain::ProgramName;
use crate::rewrite::rules::subcommand_index;

/// Programs that never mutate anything whatever their arguments.
const ALWAYS_READ_ONLY: &[&str] = &[
    "basename", "cat", "cd", "df", "diff", "dirname", "du", "echo", "false", "file", "grep",
    "head", "ls", "nl", "printf", "pwd", "realpath", "stat", "tail", "tree", "true", "wc",
    "which",
];

const FIND_UNSAFE: &[&str] = &[
    "-exec", "-execdir", "-ok", "-okdir", "-delete", "-fls", "-fprint", "-fprint0", "-fprintf",
];

const RG_UNSAFE: &[&str] = &["--pre", "--hostname-bin", "--search-zip", "-z"];

/// `words[0]` is the program, the rest its unquoted arguments.
pub(super) fn is_read_only(words: &[&str]) -> bool {
    let Some((first, args)) = words.split_first() else {
        return false;
    };
    let program = ProgramName::new(first);
    let program = program.as_str();

    if ALWAYS_READ_ONLY.contains(&program) {
        return true;
    }

    match program {
        "find" => !args.iter().any(|a| FIND_UNSAFE.contains(a)),
        "rg" => !args
            .iter()
            .any(|a| RG_UNSAFE.contains(a) || a.starts_with("--pre=")),
        "sed" => is_sed_print(args),
        "sort" => !args
            .iter()
            .any(|a| *a == "-o" || a.starts_with("--output") || (a.starts_with("-o") && a.len() > 2)),
        "git" => is_git_read_only(args),
        "cargo" => is_cargo_read_only(args),
        "gh" => is_gh_read_only(args),
        "docker" => is_docker_read_only(args),
        "kubectl" => matches!(
            subcommand(program, args),
            Some(("get" | "describe" | "logs" | "version" | "explain" | "top", _))
        ),
        "pnpm" => matches!(args.first(), Some(&("list" | "ls" | "outdated" | "why"))),
        "npm" => matches!(args.first(), Some(&("ls" | "list" | "outdated" | "view"))),
        "pip" | "pip3" => matches!(args.first(), Some(&("list" | "show" | "freeze" | "check"))),
        "uv" => matches!(args, ["pip", "list" | "show" | "freeze", ..]),
        "ruff" => match args.split_first() {
            Some((&"check", rest)) => !has_fix(rest),
            Some((&"format", rest)) => rest.iter().any(|a| *a == "--check" || *a == "--diff"),
            _ => false,
        },
        "eslint" => !has_fix(args),
        "prettier" => {
            args.iter()
                .any(|a| *a == "--check" || *a == "-c" || *a == "--list-different" || *a == "-l")
                && !args.iter().any(|a| *a == "--write" || *a == "-w")
        }
        "tsc" | "vue-tsc" => args.contains(&"--noEmit"),
        "mypy" => true,
        "go" => matches!(args.first(), Some(&("vet" | "list" | "version"))),
        "golangci-lint" => matches!(args.split_first(), Some((&"run", rest)) if !has_fix(rest)),
        "curl" => is_curl_read_only(args),
        _ => false,
    }
}

fn has_fix(args: &[&str]) -> bool {
    args.iter()
        .any(|a| *a == "--fix" || a.starts_with("--fix=") || *a == "--fix-only" || *a == "--unsafe-fixes")
}

/// The subcommand (after global options) and the arguments following it.
fn subcommand<'a>(program: &str, args: &'a [&'a str]) -> Option<(&'a str, &'a [&'a str])> {
    let index = subcommand_index(program, args)?;
    Some((args[index], &args[index + 1..]))
}

/// `sed -n <N|M,N>p FILE`: prints a line range and nothing else.
fn is_sed_print(args: &[&str]) -> bool {
    let [flag, script, file] = args else {
        return false;
    };
    if *flag != "-n" || file.starts_with('-') {
        return false;
    }
    let Some(range) = script.strip_suffix('p') else {
        return false;
    };
    let is_line = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    match range.split_once(',') {
        Some((from, to)) => is_line(from) && is_line(to),
        None => is_line(range),
    }
}

fn is_git_read_only(args: &[&str]) -> bool {
    let Some(index) = subcommand_index("git", args) else {
        return false;
    };
    // A config override can point the pager at any program.
    if args[..index]
        .iter()
        .any(|a| a.starts_with("-c") || a.starts_with("--config-env"))
    {
        return false;
    }
    let (sub, rest) = (args[index], &args[index + 1..]);
    match sub {
        "status" | "log" | "diff" | "show" | "blame" | "shortlog" | "describe" | "rev-parse"
        | "ls-files" => true,
        "branch" => is_branch_listing(rest),
        "stash" => matches!(rest.first(), Some(&("list" | "show"))),
        "worktree" => matches!(rest.first(), Some(&"list")),
        "remote" => matches!(rest, [] | ["-v"] | ["--verbose"]),
        "tag" => matches!(rest, [] | ["-l"] | ["--list"]),
        _ => false,
    }
}

/// `git branch` with only listing options and no branch name.
fn is_branch_listing(args: &[&str]) -> bool {
    const LISTING: &[&str] = &[
        "-a", "--all", "-r", "--remotes", "-v", "-vv", "--verbose", "-l", "--list",
        "--show-current", "--no-color", "--color",
    ];
    const LISTING_WITH_VALUE: &[&str] = &["--contains", "--no-contains", "--merged", "--no-merged", "--sort", "--format"];

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if LISTING.contains(arg) || LISTING_WITH_VALUE.iter().any(|o| arg.starts_with(&format!("{o}="))) {
            continue;
        }
        if LISTING_WITH_VALUE.contains(arg) {
            iter.next();
            continue;
        }
        return false;
    }
    true
}

fn is_cargo_read_only(args: &[&str]) -> bool {
    match subcommand("cargo", args) {
        Some(("check" | "tree" | "metadata", _)) => true,
        Some(("clippy", rest)) => !rest.iter().any(|a| *a == "--fix"),
        _ => false,
    }
}

fn is_gh_read_only(args: &[&str]) -> bool {
    match subcommand("gh", args) {
        Some(("pr" | "issue" | "run" | "release" | "repo", rest)) => matches!(
            rest.first(),
            Some(&("view" | "list" | "status" | "checks" | "diff"))
        ),
        Some(("api", rest)) => is_gh_api_get(rest),
        _ => false,
    }
}

/// `gh api` that sends no body and uses GET.
fn is_gh_api_get(args: &[&str]) -> bool {
    const BODY: &[&str] = &["-f", "-F", "--field", "--raw-field", "--input"];
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if BODY.contains(arg) || BODY.iter().any(|b| b.starts_with("--") && arg.starts_with(&format!("{b}="))) {
            return false;
        }
        let method = match *arg {
            "-X" | "--method" => iter.next().copied(),
            a => a.strip_prefix("--method=").or_else(|| a.strip_prefix("-X").filter(|m| !m.is_empty())),
        };
        if let Some(method) = method {
            if !method.eq_ignore_ascii_case("GET") {
                return false;
            }
        }
    }
    true
}

fn is_docker_read_only(args: &[&str]) -> bool {
    match subcommand("docker", args) {
        Some(("ps" | "images" | "logs" | "inspect" | "version" | "info", _)) => true,
        Some(("compose", rest)) => matches!(rest.first(), Some(&("ps" | "logs" | "config"))),
        _ => false,
    }
}

/// `curl` that only fetches and prints.
fn is_curl_read_only(args: &[&str]) -> bool {
    const UNSAFE_SHORT: &[char] = &['d', 'F', 'T', 'X', 'o', 'O', 'c', 'K', 'u', 'E'];
    const UNSAFE_LONG: &[&str] = &[
        "--data", "--data-raw", "--data-binary", "--data-urlencode", "--data-ascii", "--json",
        "--form", "--form-string", "--upload-file", "--request", "--output", "--remote-name",
        "--remote-name-all", "--output-dir", "--cookie-jar", "--config", "--user", "--cert",
        "--key", "--netrc-file", "--oauth2-bearer", "--dump-header", "--trace", "--trace-ascii",
    ];

    !args.iter().any(|arg| {
        if let Some(long) = arg.strip_prefix("--") {
            let name = long.split_once('=').map_or(long, |(n, _)| n);
            UNSAFE_LONG.iter().any(|u| u[2..] == *name)
        } else if let Some(short) = arg.strip_prefix('-') {
            short.chars().any(|c| UNSAFE_SHORT.contains(&c))
        } else {
            false
        }
    })
}
