//! Quote-aware splitting of raw command text.
//!
//! Rewriting has to reproduce everything it does not touch byte-for-byte, so
//! this works on offsets into the original string rather than on an AST.

/// A piece of a command line between top-level control operators.
#[derive(Debug, PartialEq)]
pub(crate) enum Piece<'a> {
    /// Command text, including its surrounding whitespace.
    Segment {
        text: &'a str,
        /// First command of a pipeline (not fed by a `|`).
        pipeline_head: bool,
    },
    /// A control operator: `&&`, `||`, `;`, `&`, `|` or `|&`.
    Operator(&'a str),
}

/// A shell word located in its source text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Word {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

impl Word {
    /// The word exactly as written, quotes included.
    pub(crate) fn raw<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    /// The word with quoting removed (no expansion is performed).
    pub(crate) fn value(&self, source: &str) -> String {
        unquote(self.raw(source))
    }
}

/// Tracks quoting and nesting while scanning.
#[derive(Default)]
struct Scanner {
    single: bool,
    double: bool,
    backtick: bool,
    escaped: bool,
    depth: usize,
}

impl Scanner {
    /// Feed one character; returns true when it is at top level and unquoted.
    fn step(&mut self, c: char, prev: Option<char>) -> bool {
        if self.escaped {
            self.escaped = false;
            return false;
        }
        if self.single {
            if c == '\'' {
                self.single = false;
            }
            return false;
        }
        match c {
            '\\' => {
                self.escaped = true;
                false
            }
            '"' if !self.backtick => {
                self.double = !self.double;
                false
            }
            '`' => {
                self.backtick = !self.backtick;
                false
            }
            '\'' if !self.double && !self.backtick => {
                self.single = true;
                false
            }
            '(' if !self.double || prev == Some('$') => {
                self.depth += 1;
                false
            }
            ')' if self.depth > 0 => {
                self.depth -= 1;
                false
            }
            _ => !self.double && !self.backtick && self.depth == 0,
        }
    }
}

/// Split a command line at its top-level control operators.
///
/// Redirection forms that contain `&` or `|` (`2>&1`, `&>`, `>|`) are not
/// operators.
pub(crate) fn split(command: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut scanner = Scanner::default();
    let mut segment_start = 0;
    let mut pipeline_head = true;
    let mut prev: Option<char> = None;
    let mut iter = command.char_indices().peekable();

    while let Some((i, c)) = iter.next() {
        let top_level = scanner.step(c, prev);
        let next = iter.peek().map(|&(_, n)| n);

        let operator_len = if !top_level {
            0
        } else {
            match (c, next) {
                ('&', Some('&')) | ('|', Some('|')) | ('|', Some('&')) => 2,
                ('&', Some('>')) => 0,
                ('&', _) if matches!(prev, Some('>') | Some('<')) => 0,
                ('|', _) if prev == Some('>') => 0,
                (';', _) | ('&', _) | ('|', _) => 1,
                _ => 0,
            }
        };

        if operator_len == 0 {
            prev = Some(c);
            continue;
        }

        pieces.push(Piece::Segment {
            text: &command[segment_start..i],
            pipeline_head,
        });
        let operator = &command[i..i + operator_len];
        pieces.push(Piece::Operator(operator));
        pipeline_head = !operator.starts_with('|') || operator == "||";
        if operator_len == 2 {
            iter.next();
        }
        segment_start = i + operator_len;
        prev = operator.chars().last();
    }

    pieces.push(Piece::Segment {
        text: &command[segment_start..],
        pipeline_head,
    });
    pieces
}

/// Split one segment into words, keeping quoted regions inside their word.
pub(crate) fn words(segment: &str) -> Vec<Word> {
    let mut words = Vec::new();
    let mut scanner = Scanner::default();
    let mut start: Option<usize> = None;
    let mut prev: Option<char> = None;

    for (i, c) in segment.char_indices() {
        let top_level = scanner.step(c, prev);
        if top_level && c.is_whitespace() {
            if let Some(s) = start.take() {
                words.push(Word { start: s, end: i });
            }
        } else if start.is_none() {
            start = Some(i);
        }
        prev = Some(c);
    }
    if let Some(s) = start {
        words.push(Word {
            start: s,
            end: segment.len(),
        });
    }
    words
}

/// Remove shell quoting from a single word.
pub(crate) fn unquote(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    let mut single = false;
    let mut double = false;
    while let Some(c) = chars.next() {
        match c {
            '\'' if !double => single = !single,
            '"' if !single => double = !double,
            '\\' if !single => {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// `NAME=value` environment assignment.
pub(crate) fn is_assignment(raw: &str) -> bool {
    let Some((name, _)) = raw.split_once('=') else {
        return false;
    };
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment_texts(command: &str) -> Vec<&str> {
        split(command)
            .into_iter()
            .filter_map(|p| match p {
                Piece::Segment { text, .. } => Some(text),
                Piece::Operator(_) => None,
            })
            .collect()
    }

    fn operators(command: &str) -> Vec<&str> {
        split(command)
            .into_iter()
            .filter_map(|p| match p {
                Piece::Operator(op) => Some(op),
                Piece::Segment { .. } => None,
            })
            .collect()
    }

    fn word_values(segment: &str) -> Vec<String> {
        words(segment).iter().map(|w| w.value(segment)).collect()
    }

    #[test]
    fn single_segment() {
        assert_eq!(segment_texts("git status"), vec!["git status"]);
    }

    #[test]
    fn splits_and_or_semicolon() {
        assert_eq!(
            segment_texts("a && b || c; d"),
            vec!["a ", " b ", " c", " d"]
        );
        assert_eq!(operators("a && b || c; d"), vec!["&&", "||", ";"]);
    }

    #[test]
    fn reassembly_is_lossless() {
        let command = "FOO=1 git log -3 &&  cargo test |& tee out ; ls &";
        let rebuilt: String = split(command)
            .into_iter()
            .map(|p| match p {
                Piece::Segment { text, .. } => text,
                Piece::Operator(op) => op,
            })
            .collect();
        assert_eq!(rebuilt, command);
    }

    #[test]
    fn pipeline_heads_marked() {
        let heads: Vec<bool> = split("git log | head -5 && ls | wc -l")
            .into_iter()
            .filter_map(|p| match p {
                Piece::Segment { pipeline_head, .. } => Some(pipeline_head),
                Piece::Operator(_) => None,
            })
            .collect();
        assert_eq!(heads, vec![true, false, true, false]);
    }

    #[test]
    fn quoted_operators_not_split() {
        assert_eq!(
            segment_texts(r#"grep "a && b" x; echo 'c | d'"#),
            vec![r#"grep "a && b" x"#, " echo 'c | d'"]
        );
    }

    #[test]
    fn command_substitution_not_split() {
        assert_eq!(
            segment_texts("echo $(git rev-parse HEAD; date) done"),
            vec!["echo $(git rev-parse HEAD; date) done"]
        );
    }

    #[test]
    fn escaped_operator_not_split() {
        assert_eq!(
            segment_texts(r"find . -exec ls {} \; -print"),
            vec![r"find . -exec ls {} \; -print"]
        );
    }

    #[test]
    fn redirection_ampersands_not_split() {
        assert_eq!(
            segment_texts("cargo build 2>&1 &>log >|out"),
            vec!["cargo build 2>&1 &>log >|out"]
        );
    }

    #[test]
    fn background_operator_splits() {
        assert_eq!(operators("sleep 1 & ls"), vec!["&"]);
    }

    #[test]
    fn words_keep_quotes_in_raw_form() {
        let segment = r#"git commit -m "fix: a b""#;
        let ws = words(segment);
        assert_eq!(ws.len(), 4);
        assert_eq!(ws[3].raw(segment), r#""fix: a b""#);
        assert_eq!(ws[3].value(segment), "fix: a b");
    }

    #[test]
    fn words_handle_mixed_quoting() {
        assert_eq!(
            word_values(r#"rg 'a b'"c"\ d e"#),
            vec!["rg", "a bc d", "e"]
        );
    }

    #[test]
    fn words_skip_surrounding_whitespace() {
        assert_eq!(word_values("  ls   -la  "), vec!["ls", "-la"]);
    }

    #[test]
    fn assignment_detection() {
        assert!(is_assignment("FOO=bar"));
        assert!(is_assignment("_X1="));
        assert!(!is_assignment("--flag=value"));
        assert!(!is_assignment("1A=b"));
        assert!(!is_assignment("git"));
    }
}
