use std::path::Path;

use miette::IntoDiagnostic;

use crate::settings::hooks::{self, InstallOutcome};
use crate::settings::SettingsFile;

/// Register this executable as the Bash `PreToolUse` hook in `path`.
pub fn run(path: &Path, dry_run: bool) -> miette::Result<()> {
    let exe = std::env::current_exe().into_diagnostic()?;
    let command = hooks::hook_command(&exe.to_string_lossy());

    let mut settings = SettingsFile::load(path)?;
    match hooks::install(settings.root_mut(), &command)? {
        InstallOutcome::AlreadyPresent => {
            println!("{}: hook already installed", path.display());
        }
        InstallOutcome::Added if dry_run => {
            println!("dry run: would add PreToolUse hook `{command}` to {}", path.display());
        }
        InstallOutcome::Added => {
            let backup = settings.save()?;
            println!("added PreToolUse hook `{command}` to {}", path.display());
            if let Some(backup) = backup {
                println!("backup: {}", backup.display());
            }
        }
    }
    Ok(())
}
