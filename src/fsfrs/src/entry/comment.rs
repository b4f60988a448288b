// fsfrs/src/entry/comment.rs

//! The `#` comment block attached above a directive.

use serde::{Deserialize, Serialize};

/// One line of a comment block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentLine {
    /// Raw text after the `#`, leading space included
    Text(String),
    /// Blank line inside the block
    Blank,
}

/// An ordered block of comment lines, re-emitted verbatim above a directive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    lines: Vec<CommentLine>,
}

impl Comment {
    /// Create an empty comment.
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a comment from human text, one `# ` line per text line.
    pub fn from_text(text: &str) -> Self {
        let lines = text
            .lines()
            .map(|line| {
                if line.is_empty() {
                    CommentLine::Text(String::new())
                } else {
                    CommentLine::Text(format!(" {}", line))
                }
            })
            .collect();
        Self { lines }
    }

    /// Append a raw `#` line (the `#` itself already removed).
    pub fn push_raw<S: Into<String>>(&mut self, raw: S) {
        self.lines.push(CommentLine::Text(raw.into()));
    }

    pub fn push_blank(&mut self) {
        self.lines.push(CommentLine::Blank);
    }

    pub fn lines(&self) -> &[CommentLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Human-readable text: one leading space stripped per line, blank lines
    /// kept as empty lines.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| match line {
                CommentLine::Text(raw) => raw.strip_prefix(' ').unwrap_or(raw),
                CommentLine::Blank => "",
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub(crate) fn trim_trailing_blanks(&mut self) {
        while matches!(self.lines.last(), Some(CommentLine::Blank)) {
            self.lines.pop();
        }
    }

    /// Rewrite the last text line with `f`, leaving the block untouched when
    /// `f` declines.
    pub(crate) fn rewrite_last<F>(&mut self, f: F)
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let last = self.lines.iter_mut().rev().find_map(|line| match line {
            CommentLine::Text(raw) => Some(raw),
            CommentLine::Blank => None,
        });
        if let Some(raw) = last {
            if let Some(rewritten) = f(raw) {
                *raw = rewritten;
            }
        }
    }

    /// Render the block as source lines, each `#`-prefixed except blanks.
    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(|line| match line {
                CommentLine::Text(raw) => format!("#{}", raw),
                CommentLine::Blank => String::new(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_round_trip() {
        let comment = Comment::from_text("Analysis level\n1 : First-level analysis");
        assert_eq!(
            comment.render(),
            "# Analysis level\n# 1 : First-level analysis"
        );
        assert_eq!(comment.text(), "Analysis level\n1 : First-level analysis");
    }

    #[test]
    fn test_raw_lines_are_verbatim() {
        let mut comment = Comment::new();
        comment.push_raw("no space");
        comment.push_blank();
        comment.push_raw("  indented");
        assert_eq!(comment.render(), "#no space\n\n#  indented");
        assert_eq!(comment.text(), "no space\n\n indented");
    }

    #[test]
    fn test_rewrite_last_skips_blanks() {
        let mut comment = Comment::from_text("first\nsecond");
        comment.push_blank();
        comment.rewrite_last(|raw| Some(raw.replace("second", "2nd")));
        assert_eq!(comment.render(), "# first\n# 2nd\n");
    }
}
