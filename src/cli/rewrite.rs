use std::path::Path;

use crate::rewrite::rewrite_command;

/// Print the rewrite of `words` joined as one command.
///
/// Returns whether the command was rewritten.
pub fn run(config_path: Option<&Path>, words: &[String]) -> miette::Result<bool> {
    let config = super::load_config(config_path)?;
    let command = words.join(" ");

    match rewrite_command(&command, &config) {
        Some(rewrite) => {
            println!("{}", rewrite.rewritten);
            println!("classification: {}", rewrite.safety);
            Ok(true)
        }
        None => {
            println!("{command}");
            println!("unchanged");
            Ok(false)
        }
    }
}
