//! Launcher prefixes: package runners and interpreter module flags that
//! stand in front of the tool actually being run.

use crate::domain::ProgramName;

/// Family of launcher, which decides the tools it may front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LauncherFamily {
    /// `npx`, `bunx`, `pnpm exec`, `pnpm dlx`, `pnpm`, `yarn`.
    Js,
    /// `python -m`, `python3 -m`, `uv run`, `poetry run`.
    Python,
}

/// `npx` options that may appear before the package name.
const NPX_FLAGS: &[&str] = &["-y", "--yes", "--no-install", "-q", "--quiet"];

/// Recognize a launcher at the start of `words` (unquoted values).
///
/// Returns the family and the number of words the launcher occupies; the
/// word at that index is the launched tool. `None` when there is no
/// launcher or nothing follows it.
pub(crate) fn strip(words: &[&str]) -> Option<(LauncherFamily, usize)> {
    let program = ProgramName::new(words.first()?);
    let second = words.get(1).copied();

    let (family, consumed) = match (program.as_str(), second) {
        ("npx", _) => {
            let flags = words[1..]
                .iter()
                .take_while(|w| NPX_FLAGS.contains(*w))
                .count();
            (LauncherFamily::Js, 1 + flags)
        }
        ("bunx", _) => (LauncherFamily::Js, 1),
        ("pnpm", Some("exec" | "dlx")) => (LauncherFamily::Js, 2),
        ("pnpm" | "yarn", Some(next)) if !next.starts_with('-') => (LauncherFamily::Js, 1),
        ("python" | "python3", Some("-m")) => (LauncherFamily::Python, 2),
        ("uv" | "poetry", Some("run")) => (LauncherFamily::Python, 2),
        _ => return None,
    };

    match words.get(consumed) {
        Some(tool) if !tool.is_empty() && !tool.starts_with('-') => Some((family, consumed)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn npx_launcher() {
        assert_eq!(
            strip(&["npx", "vitest", "run"]),
            Some((LauncherFamily::Js, 1))
        );
    }

    #[test]
    fn npx_skips_its_own_flags() {
        assert_eq!(
            strip(&["npx", "-y", "prisma", "generate"]),
            Some((LauncherFamily::Js, 2))
        );
    }

    #[test]
    fn pnpm_exec_and_dlx() {
        assert_eq!(strip(&["pnpm", "exec", "tsc"]), Some((LauncherFamily::Js, 2)));
        assert_eq!(strip(&["pnpm", "dlx", "eslint"]), Some((LauncherFamily::Js, 2)));
    }

    #[test]
    fn pnpm_and_yarn_direct() {
        assert_eq!(strip(&["pnpm", "vitest"]), Some((LauncherFamily::Js, 1)));
        assert_eq!(strip(&["yarn", "eslint", "."]), Some((LauncherFamily::Js, 1)));
    }

    #[test]
    fn python_module() {
        assert_eq!(
            strip(&["python3", "-m", "pytest", "-x"]),
            Some((LauncherFamily::Python, 2))
        );
        assert_eq!(
            strip(&["/usr/bin/python", "-m", "mypy"]),
            Some((LauncherFamily::Python, 2))
        );
    }

    #[test]
    fn uv_and_poetry_run() {
        assert_eq!(strip(&["uv", "run", "ruff"]), Some((LauncherFamily::Python, 2)));
        assert_eq!(
            strip(&["poetry", "run", "pytest"]),
            Some((LauncherFamily::Python, 2))
        );
    }

    #[test]
    fn launcher_without_tool_is_none() {
        assert_eq!(strip(&["npx"]), None);
        assert_eq!(strip(&["python", "-m"]), None);
        assert_eq!(strip(&["pnpm", "exec"]), None);
    }

    #[test]
    fn python_script_is_not_a_launcher() {
        assert_eq!(strip(&["python", "manage.py", "test"]), None);
    }

    #[test]
    fn non_launcher_is_none() {
        assert_eq!(strip(&["git", "status"]), None);
        assert_eq!(strip(&["uv", "pip", "list"]), None);
    }

    #[test]
    fn pnpm_flag_is_not_a_tool() {
        assert_eq!(strip(&["pnpm", "--version"]), None);
    }
}
