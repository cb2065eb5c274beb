pub mod classify;
pub mod config;
pub mod decision;
pub mod logging;
pub mod protocol;
pub mod rewrite;
pub mod settings;

pub(crate) mod cli;
pub(crate) mod command;
pub(crate) mod domain;

use std::path::Path;

/// Run the hook subcommand: read JSON from stdin, evaluate, write JSON to stdout.
///
/// These `run_*` functions bridge the binary crate (`main.rs`) to the library
/// without exposing `cli` internals. Not a stable integration API; callers
/// should use [`decision::evaluate`] and [`rewrite::Rewriter`] directly.
pub fn run_hook(config_path: Option<&Path>) {
    cli::hook::run(config_path)
}

/// Run the rewrite subcommand. Returns whether the command was rewritten.
pub fn run_rewrite(config_path: Option<&Path>, words: &[String]) -> miette::Result<bool> {
    cli::rewrite::run(config_path, words)
}

/// Run the migrate-permissions subcommand.
pub fn run_migrate(settings: &Path, config_path: Option<&Path>, dry_run: bool) -> miette::Result<()> {
    cli::migrate::run(settings, config_path, dry_run)
}

/// Run the install subcommand.
pub fn run_install(settings: &Path, dry_run: bool) -> miette::Result<()> {
    cli::install::run(settings, dry_run)
}
