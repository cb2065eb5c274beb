pub mod hook;
pub mod install;
pub mod migrate;
pub mod rewrite;

use std::path::Path;

use crate::config::{Config, ConfigError};

/// Config from `--config`, or the defaults when none was given.
pub(crate) fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load(path),
        None => Ok(Config::default()),
    }
}
