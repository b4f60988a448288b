// fsfrs/src/document/renumber.rs

//! Renumbering of the input list and every key family that tracks it.
//!
//! Re-keys are computed into a side table, validated as a whole, and then
//! applied in one pass over the sequence. Old and new input numbers overlap
//! (removing input 2 of 3 moves 3 onto 2), so re-keying in place one entry
//! at a time would collide.

use super::core::Document;
use super::layout::{
    self, ev_weight_comment, ev_weight_key, group_membership_comment, group_membership_key,
    input_comment, CommentIndex,
};
use crate::entry::{Entry, Key, Value};
use crate::error::{FsfError, Result, Warning};
use indexmap::IndexMap;
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A member that is not yet in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInput {
    /// 4D data or lower-level FEAT directory
    pub path: String,
    /// Value of the synthesized group membership entry
    pub group_membership: i64,
    /// Value of each synthesized EV weighting entry
    pub ev_weight: f64,
}

impl NewInput {
    pub fn new<S: Into<String>>(path: S) -> Self {
        Self {
            path: path.into(),
            group_membership: 1,
            ev_weight: 1.0,
        }
    }

    pub fn with_group_membership(mut self, group: i64) -> Self {
        self.group_membership = group;
        self
    }

    pub fn with_ev_weight(mut self, weight: f64) -> Self {
        self.ev_weight = weight;
        self
    }
}

/// One position of the input list in its new order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Slot {
    /// Member already in the document under `key`, previously at `origin`
    Existing { key: String, origin: usize },
    /// Member to synthesize together with its companions
    Fresh(NewInput),
}

#[derive(Debug)]
struct Rekey {
    key: Key,
    input: usize,
    comment: CommentIndex,
}

/// EV weighting keys grouped by input number, plus every EV column seen.
fn ev_weights_by_input(doc: &Document) -> (HashMap<usize, Vec<(String, usize)>>, BTreeSet<usize>) {
    let mut by_input: HashMap<usize, Vec<(String, usize)>> = HashMap::new();
    let mut columns = BTreeSet::new();
    for (name, entry) in &doc.entries {
        if let Some((input, ev)) = layout::ev_weight_indices(entry.key()) {
            by_input.entry(input).or_default().push((name.clone(), ev));
            columns.insert(ev);
        }
    }
    (by_input, columns)
}

/// Renumber the input list so that `slots[i]` ends up at position `i + 1`.
///
/// On error the document is left untouched.
pub(crate) fn renumber(doc: &mut Document, slots: &[Slot]) -> Result<Vec<Warning>> {
    let (ev_weights, ev_columns) = ev_weights_by_input(doc);
    let mut table: HashMap<String, Rekey> = HashMap::new();
    let mut targets: Vec<String> = Vec::new();

    for (index, slot) in slots.iter().enumerate() {
        let position = index + 1;
        match slot {
            Slot::Existing { key, origin } => {
                let group_key = group_membership_key(*origin).to_string();
                if !doc.entries.contains_key(&group_key) {
                    return Err(FsfError::DependentEntryMissing {
                        input: position,
                        key: group_key,
                    });
                }
                table.insert(
                    key.clone(),
                    Rekey {
                        key: Key::input(position),
                        input: position,
                        comment: CommentIndex::Parenthesized,
                    },
                );
                table.insert(
                    group_key,
                    Rekey {
                        key: group_membership_key(position),
                        input: position,
                        comment: CommentIndex::TrailingInput,
                    },
                );
                for (name, ev) in ev_weights.get(origin).into_iter().flatten() {
                    table.insert(
                        name.clone(),
                        Rekey {
                            key: ev_weight_key(position, *ev),
                            input: position,
                            comment: CommentIndex::TrailingInput,
                        },
                    );
                }
            }
            Slot::Fresh(_) => {
                targets.push(Key::input(position).to_string());
                targets.push(group_membership_key(position).to_string());
                targets.extend(
                    ev_columns
                        .iter()
                        .map(|ev| ev_weight_key(position, *ev).to_string()),
                );
            }
        }
    }
    targets.extend(table.values().map(|rekey| rekey.key.to_string()));

    // A target may only be occupied by an entry that is itself moving away.
    for target in &targets {
        if doc.entries.contains_key(target) && !table.contains_key(target) {
            return Err(FsfError::duplicate_key(target.clone()));
        }
    }

    debug!("renumbering {} inputs, {} re-keys", slots.len(), table.len());
    let entries = std::mem::take(&mut doc.entries);
    doc.entries = entries
        .into_iter()
        .map(|(name, mut entry)| match table.get(&name) {
            Some(rekey) => {
                entry.set_key(rekey.key.clone());
                rekey.comment.retarget(entry.comment_mut(), rekey.input);
                (rekey.key.to_string(), entry)
            }
            None => (name, entry),
        })
        .collect::<IndexMap<_, _>>();

    for (index, slot) in slots.iter().enumerate() {
        if let Slot::Fresh(new) = slot {
            synthesize_companions(doc, index + 1, new, &ev_columns)?;
        }
    }

    Ok(patch_length_caches(doc, slots.len()))
}

/// Insert a fresh member and its companions next to their neighbours.
fn synthesize_companions(
    doc: &mut Document,
    position: usize,
    new: &NewInput,
    ev_columns: &BTreeSet<usize>,
) -> Result<()> {
    let (previous, next) = neighbours(position, Key::input);
    let entry = Entry::new(
        Key::input(position),
        Value::text(new.path.clone()),
        input_comment(position),
    );
    place(doc, entry, previous, next, layout::INPUT_MARKER)?;

    let (previous, next) = neighbours(position, group_membership_key);
    let entry = Entry::new(
        group_membership_key(position),
        new.group_membership,
        group_membership_comment(position),
    );
    place(doc, entry, previous, next, layout::GROUP_MEMBERSHIP_MARKER)?;

    for &ev in ev_columns {
        let (previous, next) = neighbours(position, |input| ev_weight_key(input, ev));
        let entry = Entry::new(
            ev_weight_key(position, ev),
            new.ev_weight,
            ev_weight_comment(position, ev),
        );
        place(doc, entry, previous, next, layout::EV_WEIGHT_MARKER)?;
    }
    Ok(())
}

fn neighbours(position: usize, make: impl Fn(usize) -> Key) -> (Option<String>, String) {
    let previous = (position > 1).then(|| make(position - 1).to_string());
    (previous, make(position + 1).to_string())
}

/// After the previous member, else before the next one, else after the
/// family's marker, else at the end.
fn place(
    doc: &mut Document,
    entry: Entry,
    previous: Option<String>,
    next: String,
    marker: &str,
) -> Result<()> {
    if let Some(previous) = previous.filter(|key| doc.contains_key(key)) {
        return doc.insert_after(&previous, entry);
    }
    if doc.contains_key(&next) {
        return doc.insert_before(&next, entry);
    }
    let marker = layout::setting(marker).to_string();
    if doc.contains_key(&marker) {
        return doc.insert_after(&marker, entry);
    }
    doc.append(entry)
}

/// Point both cached length settings at `len`.
pub(crate) fn patch_length_caches(doc: &mut Document, len: usize) -> Vec<Warning> {
    let mut warnings = Vec::new();
    for name in layout::LENGTH_CACHES {
        let key = layout::setting(name).to_string();
        match doc.entry_mut(&key) {
            Some(entry) => entry.set_value(len),
            None => {
                warn!("length cache {} is missing; not updated", key);
                warnings.push(Warning::LengthCacheMissing { key });
            }
        }
    }
    warnings
}

/// Current members in position order, with their positions as origins.
pub(crate) fn current_slots(doc: &Document) -> Vec<Slot> {
    let members: BTreeMap<usize, &String> = doc
        .entries
        .iter()
        .filter(|(_, entry)| entry.key().is_input())
        .filter_map(|(name, entry)| Some((entry.key().local().position()?, name)))
        .collect();
    members
        .into_iter()
        .map(|(origin, key)| Slot::Existing {
            key: key.clone(),
            origin,
        })
        .collect()
}
