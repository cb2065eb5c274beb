use std::io::Read;
use std::path::Path;

use crate::config::Config;
use crate::decision;
use crate::protocol::{HookInput, HookOutput};

/// Execute the hook subcommand: read JSON from stdin, evaluate, write JSON to stdout.
///
/// Every failure (config errors, the tool missing from `PATH`, bad stdin,
/// unserializable output) is logged at warn and produces no stdout at all,
/// so Claude Code runs the original command as if the hook were absent.
pub fn run(config_path: Option<&Path>) {
    let config = match super::load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "config error, passing command through");
            return;
        }
    };

    if let Err(e) = which::which(&config.tool) {
        tracing::warn!(tool = %config.tool, error = %e, "replacement tool not found, passing command through");
        return;
    }

    match execute_from_stdin(&config) {
        Ok(Some(output)) => output_json(&output),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "could not evaluate hook input"),
    }
}

fn execute_from_stdin(config: &Config) -> Result<Option<HookOutput>, Box<dyn std::error::Error>> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let hook_input: HookInput = serde_json::from_str(&input)?;
    Ok(decision::evaluate(&hook_input, config))
}

/// Serialize a HookOutput to JSON and print to stdout.
fn output_json(output: &HookOutput) {
    match serde_json::to_string(output) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::warn!(error = %e, "could not serialize hook output"),
    }
}
