use std::path::Path;

use crate::rewrite::Rewriter;
use crate::settings::{permissions, SettingsFile};

/// Add rewritten-form permission rules to the settings file at `path`.
pub fn run(path: &Path, config_path: Option<&Path>, dry_run: bool) -> miette::Result<()> {
    let config = super::load_config(config_path)?;
    let rewriter = Rewriter::new(&config);
    let mut settings = SettingsFile::load(path)?;

    let additions = permissions::migrate(settings.root_mut(), &rewriter)?;
    if additions.is_empty() {
        println!("{}: no permission rules to add", path.display());
        return Ok(());
    }

    for addition in &additions {
        println!("{addition}");
    }

    if dry_run {
        println!(
            "dry run: {} rule(s) would be added to {}",
            additions.len(),
            path.display()
        );
        return Ok(());
    }

    let backup = settings.save()?;
    println!("{} rule(s) added to {}", additions.len(), path.display());
    if let Some(backup) = backup {
        println!("backup: {}", backup.display());
    }
    Ok(())
}
