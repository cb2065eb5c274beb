use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// Route Claude Code shell commands through rtk and classify them for permissions.
#[derive(Debug, Parser)]
#[command(name = "rtk-hook", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run as a Claude Code PreToolUse hook (reads stdin, writes stdout)
    Hook {
        /// Path to the KDL config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Show how a command would be rewritten (exit 1 when unchanged)
    Rewrite {
        /// Path to the KDL config file
        #[arg(long)]
        config: Option<PathBuf>,
        /// The command, as one argument or several
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
    /// Add rewritten-form rules to a settings file's permission lists
    MigratePermissions {
        /// Settings file [default: ~/.claude/settings.json]
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Path to the KDL config file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Report the rules that would be added without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Register this binary as the Bash PreToolUse hook in a settings file
    Install {
        /// Settings file [default: ~/.claude/settings.json]
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Report the change without writing
        #[arg(long)]
        dry_run: bool,
    },
}

fn settings_path(explicit: Option<PathBuf>) -> miette::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(rtk_hook::settings::default_path()?),
    }
}

fn main() -> miette::Result<ExitCode> {
    let cli = Cli::parse();
    rtk_hook::logging::init();

    match cli.command {
        Commands::Hook { config } => rtk_hook::run_hook(config.as_deref()),
        Commands::Rewrite { config, command } => {
            if !rtk_hook::run_rewrite(config.as_deref(), &command)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::MigratePermissions {
            settings,
            config,
            dry_run,
        } => rtk_hook::run_migrate(&settings_path(settings)?, config.as_deref(), dry_run)?,
        Commands::Install { settings, dry_run } => {
            rtk_hook::run_install(&settings_path(settings)?, dry_run)?
        }
    }
    Ok(ExitCode::SUCCESS)
}
