// fsfrs/src/document/layout.rs

//! Fixed key families of a higher-level FEAT design that track the input list.

use crate::entry::{Comment, Key, LocalIndex};
use lazy_static::lazy_static;
use regex::Regex;

/// Namespace holding every scalar setting.
pub const SETTINGS_NAMESPACE: &str = "fmri";

/// Settings that cache the length of the input list.
pub const LENGTH_CACHES: [&str; 2] = ["npts", "multiple"];

/// Marker after which input-list entries are synthesized.
pub const INPUT_MARKER: &str = "confoundevs";
/// Marker after which EV weighting entries are synthesized.
pub const EV_WEIGHT_MARKER: &str = "level2orth";
/// Marker after which group membership entries are synthesized.
pub const GROUP_MEMBERSHIP_MARKER: &str = "con_mode_old";

lazy_static! {
    static ref GROUP_MEMBERSHIP: Regex = Regex::new(r"^groupmem\.(\d+)$").unwrap();
    static ref EV_WEIGHT: Regex = Regex::new(r"^evg(\d+)\.(\d+)$").unwrap();
    static ref INPUT_COMMENT_INDEX: Regex = Regex::new(r"^(.*)\((\d+)\)\s*$").unwrap();
    static ref DEPENDENT_COMMENT_INDEX: Regex = Regex::new(r"^(.*\binput )(\d+)\s*$").unwrap();
}

pub fn setting(name: &str) -> Key {
    Key::named(SETTINGS_NAMESPACE, name)
}

/// `fmri(groupmem.{input})`
pub fn group_membership_key(input: usize) -> Key {
    setting(&format!("groupmem.{}", input))
}

/// `fmri(evg{input}.{ev})`
pub fn ev_weight_key(input: usize, ev: usize) -> Key {
    setting(&format!("evg{}.{}", input, ev))
}

/// Input number of a group membership key.
pub fn group_membership_input(key: &Key) -> Option<usize> {
    let name = settings_name(key)?;
    GROUP_MEMBERSHIP
        .captures(name)
        .and_then(|caps| caps[1].parse().ok())
}

/// `(input, ev)` of an EV weighting key.
pub fn ev_weight_indices(key: &Key) -> Option<(usize, usize)> {
    let name = settings_name(key)?;
    let caps = EV_WEIGHT.captures(name)?;
    Some((caps[1].parse().ok()?, caps[2].parse().ok()?))
}

fn settings_name(key: &Key) -> Option<&str> {
    match key.local() {
        LocalIndex::Name(name) if key.namespace() == SETTINGS_NAMESPACE => Some(name.as_str()),
        _ => None,
    }
}

pub fn input_comment(input: usize) -> Comment {
    Comment::from_text(&format!("4D AVW data or FEAT directory ({})", input))
}

pub fn group_membership_comment(input: usize) -> Comment {
    Comment::from_text(&format!("Group membership for input {}", input))
}

pub fn ev_weight_comment(input: usize, ev: usize) -> Comment {
    Comment::from_text(&format!(
        "Higher-level EV value for EV {} and input {}",
        ev, input
    ))
}

/// How a re-keyed entry's comment embeds its input number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentIndex {
    /// `... (3)`
    Parenthesized,
    /// `... input 3`
    TrailingInput,
}

impl CommentIndex {
    /// Point the last comment line at `input`; comments without an embedded
    /// number are left alone.
    pub fn retarget(self, comment: &mut Comment, input: usize) {
        let pattern: &Regex = match self {
            CommentIndex::Parenthesized => &*INPUT_COMMENT_INDEX,
            CommentIndex::TrailingInput => &*DEPENDENT_COMMENT_INDEX,
        };
        comment.rewrite_last(|raw| {
            let caps = pattern.captures(raw)?;
            Some(match self {
                CommentIndex::Parenthesized => format!("{}({})", &caps[1], input),
                CommentIndex::TrailingInput => format!("{}{}", &caps[1], input),
            })
        });
    }
}
