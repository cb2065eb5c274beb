//! Reading and writing Claude Code settings files.
//!
//! Settings are handled as untyped JSON so that keys this crate knows
//! nothing about survive a round trip, in their original order.

pub mod hooks;
pub mod pattern;
pub mod permissions;

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

/// Errors from loading, editing, or saving a settings file.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum SettingsError {
    #[error("could not determine the home directory")]
    #[diagnostic(
        code(rtk_hook::settings::no_home),
        help("pass the settings file explicitly with --settings")
    )]
    NoHome,
    #[error("failed to read {}", path.display())]
    #[diagnostic(code(rtk_hook::settings::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not valid JSON", path.display())]
    #[diagnostic(code(rtk_hook::settings::json))]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} must contain a JSON object", path.display())]
    #[diagnostic(code(rtk_hook::settings::not_object))]
    NotAnObject { path: PathBuf },
    #[error("`{key}` must be {expected}")]
    #[diagnostic(
        code(rtk_hook::settings::wrong_type),
        help("fix the settings file by hand, then run the command again")
    )]
    WrongType { key: String, expected: &'static str },
    #[error("failed to write {}", path.display())]
    #[diagnostic(code(rtk_hook::settings::write))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `~/.claude/settings.json`.
pub fn default_path() -> Result<PathBuf, SettingsError> {
    dirs::home_dir()
        .map(|home| home.join(".claude").join("settings.json"))
        .ok_or(SettingsError::NoHome)
}

/// `settings.json` → `settings.json.bak`, next to the original.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("settings.json"));
    name.push(".bak");
    path.with_file_name(name)
}

/// A settings file loaded into memory.
#[derive(Debug)]
pub struct SettingsFile {
    path: PathBuf,
    root: Map<String, Value>,
}

impl SettingsFile {
    /// Load `path`; a missing or blank file is an empty object.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let root = if content.trim().is_empty() {
            Map::new()
        } else {
            let value: Value =
                serde_json::from_str(&content).map_err(|source| SettingsError::Json {
                    path: path.to_path_buf(),
                    source,
                })?;
            match value {
                Value::Object(map) => map,
                _ => {
                    return Err(SettingsError::NotAnObject {
                        path: path.to_path_buf(),
                    })
                }
            }
        };
        tracing::debug!(path = %path.display(), keys = root.len(), "loaded settings");

        Ok(SettingsFile {
            path: path.to_path_buf(),
            root,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.root
    }

    /// Write the settings back as pretty JSON.
    ///
    /// An existing file is first copied to its backup path, which is
    /// returned. The new content goes to a temporary file in the same
    /// directory and is renamed over the original.
    pub fn save(&self) -> Result<Option<PathBuf>, SettingsError> {
        let write_err = |source| SettingsError::Write {
            path: self.path.clone(),
            source,
        };

        let backup = if self.path.exists() {
            let backup = backup_path(&self.path);
            std::fs::copy(&self.path, &backup).map_err(|source| SettingsError::Write {
                path: backup.clone(),
                source,
            })?;
            Some(backup)
        } else {
            None
        };

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(write_err)?;

        let mut content = serde_json::to_string_pretty(&self.root)
            .map_err(|e| write_err(std::io::Error::other(e)))?;
        content.push('\n');

        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(write_err)?;
        tmp.write_all(content.as_bytes()).map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        tracing::debug!(path = %self.path.display(), ?backup, "saved settings");

        Ok(backup)
    }
}

/// The object at `root[key]`, created empty when absent.
pub(crate) fn object_entry<'a>(
    root: &'a mut Map<String, Value>,
    key: &str,
    display_key: &str,
) -> Result<&'a mut Map<String, Value>, SettingsError> {
    match root
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()))
    {
        Value::Object(map) => Ok(map),
        _ => Err(SettingsError::WrongType {
            key: display_key.to_string(),
            expected: "an object",
        }),
    }
}
