// fsfrs/src/entry/key.rs

//! Directive keys of the form `namespace(local)`.

use crate::error::{FsfError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Namespace of the input list (4D data or lower-level FEAT directories).
pub const INPUT_NAMESPACE: &str = "feat_files";

lazy_static! {
    static ref KEY_PATTERN: Regex = Regex::new(r"^([A-Za-z0-9_]+)\((.+)\)$").unwrap();
}

/// The part of a key inside the parentheses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalIndex {
    /// 1-based position in a list namespace
    Position(usize),
    /// Setting name in a scalar namespace, e.g. `tr` or `groupmem.3`
    Name(String),
}

impl LocalIndex {
    /// Get the position if this is a list index.
    pub fn position(&self) -> Option<usize> {
        match self {
            LocalIndex::Position(p) => Some(*p),
            LocalIndex::Name(_) => None,
        }
    }

    /// Get the setting name if this is a scalar index.
    pub fn name(&self) -> Option<&str> {
        match self {
            LocalIndex::Position(_) => None,
            LocalIndex::Name(n) => Some(n),
        }
    }
}

impl PartialOrd for LocalIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Positions sort numerically and before names; names sort lexically.
impl Ord for LocalIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (LocalIndex::Position(a), LocalIndex::Position(b)) => a.cmp(b),
            (LocalIndex::Position(_), LocalIndex::Name(_)) => Ordering::Less,
            (LocalIndex::Name(_), LocalIndex::Position(_)) => Ordering::Greater,
            (LocalIndex::Name(a), LocalIndex::Name(b)) => a.cmp(b),
        }
    }
}

impl fmt::Display for LocalIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalIndex::Position(p) => write!(f, "{}", p),
            LocalIndex::Name(n) => write!(f, "{}", n),
        }
    }
}

/// A parsed directive key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    namespace: String,
    local: LocalIndex,
}

impl Key {
    /// Parse a raw key such as `fmri(tr)` or `feat_files(3)`.
    ///
    /// Keys in the input-list namespace must carry a numeric index.
    pub fn parse(raw: &str) -> Result<Self> {
        let caps = KEY_PATTERN
            .captures(raw)
            .ok_or_else(|| FsfError::MalformedKey {
                key: raw.to_string(),
            })?;
        let namespace = caps[1].to_string();
        let token = &caps[2];

        let local = if namespace == INPUT_NAMESPACE {
            // Only the canonical spelling is accepted, so the key renders back
            // exactly as written.
            let canonical = token.bytes().all(|b| b.is_ascii_digit())
                && (token == "0" || !token.starts_with('0'));
            let position = token
                .parse::<usize>()
                .ok()
                .filter(|_| canonical)
                .ok_or_else(|| FsfError::NonNumericIndex {
                    key: raw.to_string(),
                    index: token.to_string(),
                })?;
            LocalIndex::Position(position)
        } else {
            LocalIndex::Name(token.to_string())
        };

        Ok(Self { namespace, local })
    }

    /// Key of the input-list member at `position`.
    pub fn input(position: usize) -> Self {
        Self {
            namespace: INPUT_NAMESPACE.to_string(),
            local: LocalIndex::Position(position),
        }
    }

    /// Key of a scalar setting, e.g. `Key::named("fmri", "npts")`.
    pub fn named<N: Into<String>, L: Into<String>>(namespace: N, local: L) -> Self {
        Self {
            namespace: namespace.into(),
            local: LocalIndex::Name(local.into()),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn local(&self) -> &LocalIndex {
        &self.local
    }

    /// Whether this key belongs to the input list.
    pub fn is_input(&self) -> bool {
        self.namespace == INPUT_NAMESPACE
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.namespace, self.local)
    }
}
