// fsfrs/src/document/core.rs

//! Core Document struct and basic operations.

use super::inputs::InputList;
use crate::entry::{Comment, Entry, Key, LocalIndex, Value};
use crate::error::{FsfError, Result, Warning};
use crate::parser;
use indexmap::IndexMap;
use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Entries of one namespace, ordered by local index.
pub type NamespaceView<'a> = BTreeMap<&'a LocalIndex, &'a Entry>;

/// A parsed fsf document: the ordered directives plus a key lookup.
///
/// The map's insertion order is the output order, so the sequence and the
/// key lookup are a single structure and always agree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub(super) entries: IndexMap<String, Entry>,
    /// Comment lines after the last directive
    pub(super) trailer: Comment,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            trailer: Comment::new(),
        }
    }

    /// Parse a document from its text.
    pub fn build(content: &str) -> Result<Self> {
        parser::parse_document(content)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Get an entry by key.
    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    /// Get a mutable reference to an entry by key.
    ///
    /// Keys themselves cannot be changed through this reference.
    pub fn entry_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.entries.get_mut(key)
    }

    /// Iterate over entries in output order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// Iterate over keys in output order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Position of a key in output order.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.entries.get_index_of(key)
    }

    /// Get the value stored under `key`.
    pub fn get(&self, key: &str) -> Result<&Value> {
        self.entries
            .get(key)
            .map(Entry::value)
            .ok_or_else(|| FsfError::unknown_key(key))
    }

    /// Set the value stored under `key`.
    ///
    /// The key set of a parsed document is meant to be closed, so setting an
    /// unknown key appends a new entry and returns a warning.
    pub fn set<V: Into<Value>>(&mut self, key: &str, value: V) -> Result<Option<Warning>> {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.set_value(value);
            return Ok(None);
        }

        let entry = Entry::new(Key::parse(key)?, value, Comment::new());
        let name = entry.name();
        self.append(entry)?;
        warn!("setting new item [{}]", name);
        Ok(Some(Warning::UnknownKeySet { key: name }))
    }

    /// Remove an entry, returning it.
    pub fn remove(&mut self, key: &str) -> Result<Entry> {
        self.entries
            .shift_remove(key)
            .ok_or_else(|| FsfError::unknown_key(key))
    }

    /// Append an entry at the end of the document.
    pub fn append(&mut self, entry: Entry) -> Result<()> {
        let position = self.entries.len();
        self.insert(position, entry)
    }

    /// Insert an entry at `position` in output order.
    ///
    /// Positions past the end append.
    pub fn insert(&mut self, position: usize, entry: Entry) -> Result<()> {
        let name = entry.name();
        if self.entries.contains_key(&name) {
            return Err(FsfError::duplicate_key(name));
        }
        let position = position.min(self.entries.len());
        debug!("inserting {} at {}", name, position);
        self.entries.shift_insert(position, name, entry);
        Ok(())
    }

    /// Insert an entry directly after `anchor`.
    pub fn insert_after(&mut self, anchor: &str, entry: Entry) -> Result<()> {
        let position = self
            .position(anchor)
            .ok_or_else(|| FsfError::unknown_key(anchor))?;
        self.insert(position + 1, entry)
    }

    /// Insert an entry directly before `anchor`.
    pub fn insert_before(&mut self, anchor: &str, entry: Entry) -> Result<()> {
        let position = self
            .position(anchor)
            .ok_or_else(|| FsfError::unknown_key(anchor))?;
        self.insert(position, entry)
    }

    /// All values whose key matches `pattern` at its start.
    pub fn find(&self, pattern: &str) -> Result<HashMap<String, Value>> {
        let regex = Regex::new(&format!("^(?:{})", pattern))
            .map_err(|err| FsfError::invalid_pattern(pattern, &err))?;
        Ok(self
            .entries
            .iter()
            .filter(|(key, _)| regex.is_match(key))
            .map(|(key, entry)| (key.clone(), entry.value().clone()))
            .collect())
    }

    /// Entries grouped by namespace, then by local index.
    pub fn namespaces(&self) -> BTreeMap<&str, NamespaceView<'_>> {
        let mut grouped: BTreeMap<&str, NamespaceView<'_>> = BTreeMap::new();
        for entry in self.entries.values() {
            grouped
                .entry(entry.key().namespace())
                .or_default()
                .insert(entry.key().local(), entry);
        }
        grouped
    }

    /// Entries of one namespace ordered by local index.
    pub fn namespace(&self, namespace: &str) -> NamespaceView<'_> {
        self.entries
            .values()
            .filter(|entry| entry.key().namespace() == namespace)
            .map(|entry| (entry.key().local(), entry))
            .collect()
    }

    /// Input-list members ordered by position.
    pub fn inputs(&self) -> Vec<&Entry> {
        let mut members: Vec<&Entry> = self
            .entries
            .values()
            .filter(|entry| entry.key().is_input())
            .collect();
        members.sort_by(|a, b| a.key().local().cmp(b.key().local()));
        members
    }

    /// Editable view over the input list.
    pub fn inputs_mut(&mut self) -> InputList<'_> {
        InputList::new(self)
    }

    pub fn trailer(&self) -> &Comment {
        &self.trailer
    }

    pub(crate) fn set_trailer(&mut self, trailer: Comment) {
        self.trailer = trailer;
    }

    /// Render the document: every entry in order, separated by blank lines.
    pub fn serialize(&self) -> String {
        let mut units: Vec<String> = self.entries.values().map(Entry::render).collect();
        if !self.trailer.is_empty() {
            units.push(self.trailer.render());
        }
        let mut output = units.join("\n\n");
        if !output.is_empty() {
            output.push('\n');
        }
        output
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.serialize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# FEAT version number
set fmri(version) 6.00

# TR(s)
set fmri(tr) 2.5

# Total volumes
set fmri(npts) 3

set feat_files(1) \"/data/a.feat\"
";

    #[test]
    fn test_get_and_set() {
        let mut doc = Document::build(SAMPLE).unwrap();
        assert_eq!(doc.get("fmri(tr)").unwrap(), &Value::Float(2.5));

        assert_eq!(doc.set("fmri(tr)", 3.0).unwrap(), None);
        assert_eq!(doc.get("fmri(tr)").unwrap(), &Value::Float(3.0));
        assert!(doc.serialize().contains("set fmri(tr) 3.0"));
    }

    #[test]
    fn test_unknown_key() {
        let mut doc = Document::build(SAMPLE).unwrap();
        assert_eq!(
            doc.get("unknown(1)"),
            Err(FsfError::unknown_key("unknown(1)"))
        );

        let warning = doc.set("unknown(1)", "v").unwrap();
        assert_eq!(
            warning,
            Some(Warning::UnknownKeySet {
                key: "unknown(1)".to_string()
            })
        );
        assert_eq!(doc.get("unknown(1)").unwrap(), &Value::text("v"));
        assert_eq!(doc.keys().last(), Some("unknown(1)"));
    }

    #[test]
    fn test_set_unknown_key_keeps_keys_unique() {
        let mut doc = Document::build(SAMPLE).unwrap();
        let before = doc.clone();
        assert_eq!(
            doc.set("feat_files(01)", "/data/b.feat"),
            Err(FsfError::NonNumericIndex {
                key: "feat_files(01)".to_string(),
                index: "01".to_string(),
            })
        );
        assert_eq!(doc, before);

        doc.set("feat_files(2)", "/data/b.feat").unwrap();
        assert_eq!(doc.inputs().len(), 2);
        for key in doc.keys() {
            assert_eq!(doc.entry(key).unwrap().name(), key);
        }
        let reparsed = Document::build(&doc.serialize()).unwrap();
        assert_eq!(reparsed.serialize(), doc.serialize());
    }

    #[test]
    fn test_set_unknown_malformed_key() {
        let mut doc = Document::build(SAMPLE).unwrap();
        assert!(matches!(
            doc.set("nonsense", 1),
            Err(FsfError::MalformedKey { .. })
        ));
        assert_eq!(doc.len(), 4);
    }

    #[test]
    fn test_remove() {
        let mut doc = Document::build(SAMPLE).unwrap();
        let removed = doc.remove("fmri(tr)").unwrap();
        assert_eq!(removed.value(), &Value::Float(2.5));
        assert!(!doc.contains_key("fmri(tr)"));
        assert_eq!(doc.position("fmri(npts)"), Some(1));
        assert_eq!(
            doc.remove("fmri(tr)").unwrap_err(),
            FsfError::unknown_key("fmri(tr)")
        );
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut doc = Document::build(SAMPLE).unwrap();
        let before = doc.clone();
        let dup = Entry::parse("fmri(tr)", "1.0", Comment::new()).unwrap();
        assert_eq!(
            doc.insert(0, dup.clone()),
            Err(FsfError::duplicate_key("fmri(tr)"))
        );
        assert_eq!(doc.append(dup), Err(FsfError::duplicate_key("fmri(tr)")));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_insert_positions() {
        let mut doc = Document::build(SAMPLE).unwrap();
        let first = Entry::parse("fmri(level)", "2", Comment::new()).unwrap();
        doc.insert(0, first).unwrap();
        assert_eq!(doc.keys().next(), Some("fmri(level)"));

        let after = Entry::parse("fmri(ndelete)", "0", Comment::new()).unwrap();
        doc.insert_after("fmri(tr)", after).unwrap();
        assert_eq!(doc.position("fmri(ndelete)"), Some(3));

        let far = Entry::parse("fmri(zmax)", "0", Comment::new()).unwrap();
        doc.insert(100, far).unwrap();
        assert_eq!(doc.keys().last(), Some("fmri(zmax)"));
    }

    #[test]
    fn test_find_anchors_at_start() {
        let doc = Document::build(SAMPLE).unwrap();
        let found = doc.find(r"fmri\(t").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found["fmri(tr)"], Value::Float(2.5));

        assert!(doc.find(r"tr").unwrap().is_empty());
        assert_eq!(doc.find(r".*tr.*").unwrap().len(), 1);
        assert!(matches!(
            doc.find("fmri("),
            Err(FsfError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_namespaces() {
        let doc = Document::build(SAMPLE).unwrap();
        let grouped = doc.namespaces();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["fmri"].len(), 3);
        let inputs = doc.namespace("feat_files");
        assert_eq!(
            inputs[&LocalIndex::Position(1)].value(),
            &Value::text("/data/a.feat")
        );
    }

    #[test]
    fn test_serialize_round_trip() {
        let doc = Document::build(SAMPLE).unwrap();
        assert_eq!(doc.serialize(), SAMPLE);
    }
}
