// fsfrs/src/parser.rs

//! Line parser that turns fsf text into a [`Document`].
//!
//! The format is a flat sequence of units: zero or more `#` comment lines
//! followed by exactly one `set key value` line. A blank line ends nothing by
//! itself; it is kept inside a comment block that is still accumulating and
//! skipped otherwise.

use crate::document::Document;
use crate::entry::{Comment, Entry};
use crate::error::{FsfError, Result};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

lazy_static! {
    static ref DIRECTIVE: Regex = Regex::new(r"^set\s+(\S+)\s+(.*)$").unwrap();
}

/// Classification of one trimmed source line.
#[derive(Debug, Clone, PartialEq)]
pub enum Line<'a> {
    Blank,
    /// Text after the `#`
    Comment(&'a str),
    /// Raw key and raw value of a `set` line
    Directive { key: &'a str, value: &'a str },
}

/// Classify a single line; `number` is 1-based and only used for errors.
pub fn classify_line(line: &str, number: usize) -> Result<Line<'_>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Line::Blank);
    }
    if let Some(rest) = line.strip_prefix('#') {
        return Ok(Line::Comment(rest));
    }
    let caps = DIRECTIVE
        .captures(line)
        .ok_or_else(|| FsfError::UnparseableLine {
            line: number,
            content: line.to_string(),
        })?;
    let (key, value) = match (caps.get(1), caps.get(2)) {
        (Some(key), Some(value)) => (key.as_str(), value.as_str()),
        _ => {
            return Err(FsfError::UnparseableLine {
                line: number,
                content: line.to_string(),
            })
        }
    };
    Ok(Line::Directive { key, value })
}

/// Parse a whole document.
pub fn parse_document(content: &str) -> Result<Document> {
    let mut document = Document::new();
    let mut pending = Comment::new();

    for (index, raw_line) in content.lines().enumerate() {
        match classify_line(raw_line, index + 1)? {
            Line::Blank => {
                if !pending.is_empty() {
                    pending.push_blank();
                }
            }
            Line::Comment(text) => pending.push_raw(text),
            Line::Directive { key, value } => {
                let entry = Entry::parse(key, value, std::mem::take(&mut pending))?;
                document.append(entry)?;
            }
        }
    }

    pending.trim_trailing_blanks();
    document.set_trailer(pending);
    debug!("parsed {} entries", document.len());
    Ok(document)
}
