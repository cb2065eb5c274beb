//! Thin view over `kdl` types, so config validation never touches KDL
//! entries or spans directly.

use std::path::Path;

use super::ConfigError;

/// A parsed config file with the byte offset of every line start.
pub(super) struct ConfigDocument {
    doc: kdl::KdlDocument,
    line_starts: Vec<usize>,
}

/// One top-level node and its 1-based source line.
pub(super) struct ParseNode<'a> {
    node: &'a kdl::KdlNode,
    line: usize,
}

/// A node argument, reduced to the kinds the config accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Arg<'a> {
    Str(&'a str),
    Bool(bool),
    /// Numbers, null and properties (`key=value`).
    Other,
}

impl ConfigDocument {
    pub(super) fn parse(source: &str) -> Result<Self, ConfigError> {
        let doc: kdl::KdlDocument = source
            .parse()
            .map_err(|e: kdl::KdlError| ConfigError::ParseError(e.to_string()))?;
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Ok(Self { doc, line_starts })
    }

    pub(super) fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::ReadError(e),
        })?;
        Self::parse(&content)
    }

    /// Top-level nodes in document order.
    pub(super) fn nodes(&self) -> impl Iterator<Item = ParseNode<'_>> {
        self.doc.nodes().iter().map(|node| ParseNode {
            node,
            line: self.line_of(node.span().offset()),
        })
    }

    fn line_of(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }
}

impl<'a> ParseNode<'a> {
    pub(super) fn name(&self) -> &'a str {
        self.node.name().value()
    }

    pub(super) fn line(&self) -> usize {
        self.line
    }

    /// Whether the node has a `{ ... }` block.
    pub(super) fn has_children(&self) -> bool {
        self.node.children().is_some()
    }

    pub(super) fn args(&self) -> Vec<Arg<'a>> {
        self.node
            .entries()
            .iter()
            .map(|entry| {
                if entry.name().is_some() {
                    return Arg::Other;
                }
                let value = entry.value();
                if let Some(s) = value.as_string() {
                    Arg::Str(s)
                } else if let Some(b) = value.as_bool() {
                    Arg::Bool(b)
                } else {
                    Arg::Other
                }
            })
            .collect()
    }
}
