mod document;

use std::path::{Path, PathBuf};

use document::{Arg, ConfigDocument, ParseNode};

/// Replacement tool used when the config does not name one.
pub const DEFAULT_TOOL: &str = "rtk";

/// Top-level configuration loaded from a KDL file.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Replacement tool: a name looked up on `PATH` or an absolute path.
    pub tool: String,
    /// Emit an `allow` decision for read-only rewrites.
    pub auto_allow: bool,
    pub exclude: Vec<Exclusion>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tool: DEFAULT_TOOL.to_string(),
            auto_allow: true,
            exclude: Vec::new(),
        }
    }
}

/// A program, or a program and subcommand, that is never rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusion {
    pub program: String,
    pub subcommand: Option<String>,
}

impl Exclusion {
    /// Parse `"curl"` or `"git push"`.
    fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split_whitespace();
        let program = parts.next()?.to_string();
        let subcommand = parts.next().map(String::from);
        if parts.next().is_some() {
            return None;
        }
        Some(Exclusion {
            program,
            subcommand,
        })
    }

    /// Whether an invocation of `program` with `subcommand` is excluded.
    pub fn matches(&self, program: &str, subcommand: Option<&str>) -> bool {
        if self.program != program {
            return false;
        }
        match &self.subcommand {
            Some(excluded) => subcommand == Some(excluded.as_str()),
            None => true,
        }
    }
}

/// Errors that can occur when loading or parsing a config file.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    #[diagnostic(code(rtk_hook::config::not_found))]
    NotFound(PathBuf),
    #[error("failed to read config: {0}")]
    #[diagnostic(code(rtk_hook::config::read))]
    ReadError(#[from] std::io::Error),
    #[error("invalid KDL syntax: {0}")]
    #[diagnostic(code(rtk_hook::config::syntax))]
    ParseError(String),
    #[error("invalid config: {0}")]
    #[diagnostic(
        code(rtk_hook::config::invalid),
        help("known nodes are `tool`, `auto-allow` and `exclude`")
    )]
    ValidationError(String),
}

impl Config {
    /// Load a config from a KDL file at the given path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let doc = ConfigDocument::load(path)?;
        Self::from_document(&doc)
    }

    /// Parse a KDL string into a Config.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let doc = ConfigDocument::parse(content)?;
        Self::from_document(&doc)
    }

    /// Whether `program` (with its `subcommand`, if any) is excluded from
    /// rewriting.
    pub fn is_excluded(&self, program: &str, subcommand: Option<&str>) -> bool {
        self.exclude.iter().any(|e| e.matches(program, subcommand))
    }

    fn from_document(doc: &ConfigDocument) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        for node in doc.nodes() {
            if node.has_children() {
                return Err(invalid(&node, "does not take a children block"));
            }
            match node.name() {
                "tool" => config.tool = single_string(&node)?,
                "auto-allow" => config.auto_allow = single_bool(&node)?,
                "exclude" => {
                    let values = strings(&node)?;
                    if values.is_empty() {
                        return Err(invalid(&node, "needs at least one program"));
                    }
                    for value in values {
                        let exclusion = Exclusion::parse(value).ok_or_else(|| {
                            invalid(&node, &format!("`{value}` is not `program` or `program subcommand`"))
                        })?;
                        config.exclude.push(exclusion);
                    }
                }
                other => {
                    return Err(ConfigError::ValidationError(format!(
                        "line {}: unknown node `{other}`",
                        node.line()
                    )))
                }
            }
        }
        Ok(config)
    }
}

fn invalid(node: &ParseNode<'_>, problem: &str) -> ConfigError {
    ConfigError::ValidationError(format!(
        "line {}: `{}` {problem}",
        node.line(),
        node.name()
    ))
}

/// All arguments of a node, which must be strings.
fn strings<'a>(node: &ParseNode<'a>) -> Result<Vec<&'a str>, ConfigError> {
    node.args()
        .into_iter()
        .map(|arg| match arg {
            Arg::Str(s) => Ok(s),
            _ => Err(invalid(node, "takes only string values")),
        })
        .collect()
}

fn single_string(node: &ParseNode<'_>) -> Result<String, ConfigError> {
    match strings(node)?.as_slice() {
        [value] if !value.trim().is_empty() => Ok(value.to_string()),
        _ => Err(invalid(node, "takes exactly one non-empty string")),
    }
}

fn single_bool(node: &ParseNode<'_>) -> Result<bool, ConfigError> {
    match node.args().as_slice() {
        [Arg::Bool(value)] => Ok(*value),
        _ => Err(invalid(node, "takes exactly one of #true or #false")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    // --- KDL Parsing Tests ---

    #[test]
    fn parse_full_config() {
        let config = Config::parse(
            r#"
            tool "/opt/bin/rtk"
            auto-allow #false
            exclude "curl" "git push"
            "#,
        )
        .unwrap();

        assert_eq!(config.tool, "/opt/bin/rtk");
        assert!(!config.auto_allow);
        assert_eq!(
            config.exclude,
            vec![
                Exclusion {
                    program: "curl".into(),
                    subcommand: None
                },
                Exclusion {
                    program: "git".into(),
                    subcommand: Some("push".into())
                },
            ]
        );
    }

    #[test]
    fn parse_empty_kdl_file_gives_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.tool, "rtk");
        assert!(config.auto_allow);
    }

    #[test]
    fn merge_multiple_exclude_nodes() {
        let config = Config::parse(
            r#"
            exclude "curl"
            exclude "wget" "ssh"
            "#,
        )
        .unwrap();
        let programs: Vec<&str> = config.exclude.iter().map(|e| e.program.as_str()).collect();
        assert_eq!(programs, vec!["curl", "wget", "ssh"]);
    }

    #[test]
    fn invalid_kdl_returns_parse_error() {
        let result = Config::parse("this is { not valid { kdl");
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }

    #[test]
    fn unknown_node_reports_line() {
        let err = Config::parse("tool \"rtk\"\nauto-allow #true\nbash \"x\"\n").unwrap_err();
        match err {
            ConfigError::ValidationError(msg) => {
                assert!(msg.contains("line 3"), "got: {msg}");
                assert!(msg.contains("bash"), "got: {msg}");
            }
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn tool_requires_one_string() {
        assert!(matches!(
            Config::parse("tool").unwrap_err(),
            ConfigError::ValidationError(_)
        ));
        assert!(matches!(
            Config::parse("tool \"a\" \"b\"").unwrap_err(),
            ConfigError::ValidationError(_)
        ));
        assert!(matches!(
            Config::parse("tool 1").unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }

    #[test]
    fn auto_allow_requires_bool() {
        assert!(matches!(
            Config::parse("auto-allow \"yes\"").unwrap_err(),
            ConfigError::ValidationError(_)
        ));
        assert!(Config::parse("auto-allow #true").unwrap().auto_allow);
    }

    #[test]
    fn exclude_rejects_three_words() {
        assert!(matches!(
            Config::parse("exclude \"git push origin\"").unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }

    #[test]
    fn exclude_requires_a_value() {
        assert!(matches!(
            Config::parse("exclude").unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }

    // --- Exclusion Matching Tests ---

    #[test]
    fn program_exclusion_covers_every_subcommand() {
        let config = Config::parse("exclude \"docker\"").unwrap();
        assert!(config.is_excluded("docker", Some("ps")));
        assert!(config.is_excluded("docker", None));
        assert!(!config.is_excluded("git", Some("ps")));
    }

    #[test]
    fn subcommand_exclusion_is_narrow() {
        let config = Config::parse("exclude \"git push\"").unwrap();
        assert!(config.is_excluded("git", Some("push")));
        assert!(!config.is_excluded("git", Some("status")));
        assert!(!config.is_excluded("git", None));
    }

    // --- File Loading Tests ---

    #[test]
    fn load_nonexistent_file_returns_not_found() {
        let result = Config::load(Path::new("/tmp/does-not-exist-rtk-hook-12345.kdl"));
        assert!(matches!(result.unwrap_err(), ConfigError::NotFound(_)));
    }

    #[test]
    fn load_valid_file_from_disk() {
        let mut tmpfile = NamedTempFile::new().unwrap();
        writeln!(tmpfile, "tool \"rtk2\"\nexclude \"ssh\"").unwrap();

        let config = Config::load(tmpfile.path()).unwrap();
        assert_eq!(config.tool, "rtk2");
        assert!(config.is_excluded("ssh", None));
    }

    #[test]
    fn load_file_with_invalid_kdl_returns_parse_error() {
        let mut tmpfile = NamedTempFile::new().unwrap();
        writeln!(tmpfile, "invalid {{ kdl {{ syntax").unwrap();

        let result = Config::load(tmpfile.path());
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }
}
