/// A program name reduced to its basename.
///
/// `/usr/bin/git`, `./node_modules/.bin/eslint` and `git` all compare by the
/// last path component, which is what the rule table is keyed on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgramName(pub(crate) String);

impl ProgramName {
    /// Create from a raw program string, keeping only the basename.
    pub fn new(raw: &str) -> Self {
        let basename = raw.rsplit('/').next().unwrap_or(raw);
        ProgramName(basename.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this program is the given tool, which may be configured as a
    /// bare name (`rtk`) or a path (`/opt/rtk/bin/rtk`).
    pub fn is_tool(&self, tool: &str) -> bool {
        !self.0.is_empty() && self.0 == ProgramName::new(tool).0
    }
}

impl PartialEq<str> for ProgramName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ProgramName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl std::fmt::Display for ProgramName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
