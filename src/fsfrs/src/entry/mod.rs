// fsfrs/src/entry/mod.rs

//! A single `set key value` directive with its comment block.

pub mod comment;
pub mod key;
pub mod value;


pub use comment::{Comment, CommentLine};
pub use key::{Key, LocalIndex, INPUT_NAMESPACE};
pub use value::Value;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether values under this local index are written bare regardless of
/// how they were quoted in the source.
pub fn is_keyword_local(local: &LocalIndex) -> bool {
    match local {
        LocalIndex::Name(name) => name.starts_with("con_mode") || name == "unwarp_dir",
        LocalIndex::Position(_) => false,
    }
}

/// One directive of an fsf document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    key: Key,
    value: Value,
    /// Text written without quotes
    keyword: bool,
    /// Source spelling of a number, kept until the value is replaced
    #[serde(skip)]
    lexeme: Option<String>,
    comment: Comment,
}

impl Entry {
    /// Create an entry from already-typed parts.
    pub fn new<V: Into<Value>>(key: Key, value: V, comment: Comment) -> Self {
        let keyword = is_keyword_local(key.local());
        Self {
            key,
            value: value.into(),
            keyword,
            lexeme: None,
            comment,
        }
    }

    /// Parse a directive from its raw key, raw value and comment.
    ///
    /// Quotes are stripped from string values. Unquoted values are read as
    /// numbers when they look like one; other unquoted words, and every value
    /// under a keyword local index, are kept as bare keywords.
    pub fn parse(raw_key: &str, raw_value: &str, comment: Comment) -> Result<Self> {
        let key = Key::parse(raw_key)?;
        let raw = raw_value.trim();
        let quoted = raw.contains('"');

        let (value, keyword, lexeme) = if key.is_input() {
            (Value::text(raw.trim_matches('"')), !quoted, None)
        } else if is_keyword_local(key.local()) {
            (Value::text(raw.trim_matches('"')), true, None)
        } else if quoted {
            (Value::text(raw.trim_matches('"')), false, None)
        } else if let Some(number) = value::parse_number(raw) {
            (number, false, Some(raw.to_string()))
        } else {
            (Value::text(raw), true, None)
        };

        Ok(Self {
            key,
            value,
            keyword,
            lexeme,
            comment,
        })
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The key as it appears in the document, e.g. `fmri(tr)`.
    pub fn name(&self) -> String {
        self.key.to_string()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn comment(&self) -> &Comment {
        &self.comment
    }

    pub fn comment_mut(&mut self) -> &mut Comment {
        &mut self.comment
    }

    pub fn is_keyword(&self) -> bool {
        self.keyword
    }

    /// Replace the value. The source spelling of the old value is dropped.
    pub fn set_value<V: Into<Value>>(&mut self, value: V) {
        self.value = value.into();
        self.lexeme = None;
    }

    pub(crate) fn set_key(&mut self, key: Key) {
        self.key = key;
    }

    /// The value as written after the key.
    pub fn rendered_value(&self) -> String {
        match (&self.value, &self.lexeme) {
            (Value::Text(s), _) if !self.keyword => format!("\"{}\"", s),
            (_, Some(lexeme)) => lexeme.clone(),
            (value, None) => value.to_string(),
        }
    }

    /// Render the comment block followed by the `set` line.
    pub fn render(&self) -> String {
        let directive = format!("set {} {}", self.key, self.rendered_value());
        if self.comment.is_empty() {
            directive
        } else {
            format!("{}\n{}", self.comment.render(), directive)
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}
