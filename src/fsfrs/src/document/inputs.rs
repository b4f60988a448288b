// fsfrs/src/document/inputs.rs

//! Editable view over the input list (`feat_files`).
//!
//! Positions are 1-based. Every operation that changes the number of inputs
//! renumbers the list and its dependent families before it returns; replacing
//! the path of an existing input does not.

use super::core::Document;
use super::layout;
use super::renumber::{self, NewInput, Slot};
use crate::entry::{Entry, Value};
use crate::error::{FsfError, Result, Warning};
use log::debug;

/// Mutable input-list view borrowed from a [`Document`].
#[derive(Debug)]
pub struct InputList<'a> {
    doc: &'a mut Document,
    warnings: Vec<Warning>,
}

impl<'a> InputList<'a> {
    pub(crate) fn new(doc: &'a mut Document) -> Self {
        Self {
            doc,
            warnings: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.doc
            .entries
            .values()
            .filter(|entry| entry.key().is_input())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Member at `position`.
    pub fn get(&self, position: usize) -> Option<&Entry> {
        let index = position.checked_sub(1)?;
        self.doc.inputs().get(index).copied()
    }

    /// Paths of all members in position order.
    pub fn paths(&self) -> Vec<String> {
        self.doc
            .inputs()
            .into_iter()
            .map(|entry| entry.value().to_string())
            .collect()
    }

    /// Replace the path of the member at `position`.
    pub fn replace<S: Into<String>>(&mut self, position: usize, path: S) -> Result<()> {
        let key = self.member_key(position)?;
        if let Some(entry) = self.doc.entry_mut(&key) {
            entry.set_value(Value::text(path));
        }
        Ok(())
    }

    /// Add a member at the end of the list.
    pub fn append(&mut self, input: NewInput) -> Result<()> {
        let position = self.len() + 1;
        self.insert(position, input)
    }

    /// Add several members at the end of the list in one renumbering.
    pub fn extend<I: IntoIterator<Item = NewInput>>(&mut self, inputs: I) -> Result<()> {
        self.restructure(|_, slots| {
            slots.extend(inputs.into_iter().map(Slot::Fresh));
            Ok(())
        })
    }

    /// Insert a member so that it ends up at `position`; later members move
    /// up by one.
    pub fn insert(&mut self, position: usize, input: NewInput) -> Result<()> {
        let len = self.len();
        if position == 0 || position > len + 1 {
            return Err(FsfError::InputOutOfRange { position, len });
        }
        debug!("inserting input {} at {}", input.path, position);
        self.restructure(|_, slots| {
            slots.insert(position - 1, Slot::Fresh(input));
            Ok(())
        })
    }

    /// Remove the member at `position` together with its companions.
    pub fn remove(&mut self, position: usize) -> Result<Entry> {
        let len = self.len();
        if position == 0 || position > len {
            return Err(FsfError::InputOutOfRange { position, len });
        }
        self.restructure(|doc, slots| match slots.remove(position - 1) {
            Slot::Existing { key, origin } => detach(doc, &key, origin),
            Slot::Fresh(_) => Err(FsfError::InputOutOfRange { position, len }),
        })
    }

    /// Remove the last member, if any.
    pub fn pop(&mut self) -> Result<Option<Entry>> {
        match self.len() {
            0 => Ok(None),
            len => self.remove(len).map(Some),
        }
    }

    /// Remove every member for which `predicate` holds, renumbering once.
    pub fn remove_matching<P>(&mut self, mut predicate: P) -> Result<Vec<Entry>>
    where
        P: FnMut(&Entry) -> bool,
    {
        let matched: Vec<(String, usize)> = renumber::current_slots(self.doc)
            .into_iter()
            .filter_map(|slot| match slot {
                Slot::Existing { key, origin } => Some((key, origin)),
                Slot::Fresh(_) => None,
            })
            .filter(|(key, _)| self.doc.entry(key).map_or(false, &mut predicate))
            .collect();
        if matched.is_empty() {
            return Ok(Vec::new());
        }

        self.restructure(|doc, slots| {
            slots.retain(|slot| match slot {
                Slot::Existing { key, .. } => !matched.iter().any(|(name, _)| name == key),
                Slot::Fresh(_) => true,
            });
            matched
                .iter()
                .map(|(key, origin)| detach(doc, key, *origin))
                .collect()
        })
    }

    /// Warnings raised by the operations performed through this view.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }

    fn member_key(&self, position: usize) -> Result<String> {
        self.get(position)
            .map(Entry::name)
            .ok_or(FsfError::InputOutOfRange {
                position,
                len: self.len(),
            })
    }

    /// Run `edit` against a staged copy of the document and the current
    /// member order, renumber if the number of members changed, and commit.
    fn restructure<F, T>(&mut self, edit: F) -> Result<T>
    where
        F: FnOnce(&mut Document, &mut Vec<Slot>) -> Result<T>,
    {
        let mut staged = self.doc.clone();
        let mut slots = renumber::current_slots(&staged);
        let before = slots.len();

        let output = edit(&mut staged, &mut slots)?;
        if slots.len() != before {
            let warnings = renumber::renumber(&mut staged, &slots)?;
            self.warnings.extend(warnings);
        }

        *self.doc = staged;
        Ok(output)
    }
}

/// Take a member and its companions out of the document.
fn detach(doc: &mut Document, key: &str, origin: usize) -> Result<Entry> {
    let member = doc.remove(key)?;
    let companions: Vec<String> = doc
        .entries
        .iter()
        .filter(|(_, entry)| {
            layout::group_membership_input(entry.key()) == Some(origin)
                || layout::ev_weight_indices(entry.key()).map(|(input, _)| input) == Some(origin)
        })
        .map(|(name, _)| name.clone())
        .collect();
    for name in companions {
        doc.remove(&name)?;
    }
    debug!("detached {} with its companions", key);
    Ok(member)
}
