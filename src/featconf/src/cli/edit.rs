// featconf/src/cli/edit.rs

use super::{emit, load, Destination};
use anyhow::Context;
use fsfrs::entry::value::parse_number;
use fsfrs::{Entry, RemovalReport, Value, Warning};
use regex::Regex;
use std::io::Write;
use std::path::Path;

/// Read a value given on the command line the way it would be read from a
/// `set` line: quoted text, a number, or a bare word.
pub fn parse_value(raw: &str) -> Value {
    let raw = raw.trim();
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return Value::text(&raw[1..raw.len() - 1]);
    }
    parse_number(raw).unwrap_or_else(|| Value::text(raw))
}

/// Set one value and write the document out.
///
/// Returns the warning raised when `key` was not already in the document.
pub fn set_value<W: Write>(
    path: &Path,
    key: &str,
    raw_value: &str,
    destination: &Destination,
    out: &mut W,
) -> anyhow::Result<Option<Warning>> {
    let mut doc = load(path)?;
    let warning = doc
        .set(key, parse_value(raw_value))
        .with_context(|| format!("Failed to set {}", key))?;
    emit(&doc, destination, out)?;
    Ok(warning)
}

/// Drop every input whose path matches `pattern` and rebuild the
/// input-numbered entries from the survivors.
pub fn remove_inputs<W: Write>(
    path: &Path,
    pattern: &str,
    destination: &Destination,
    out: &mut W,
) -> anyhow::Result<RemovalReport> {
    let regex =
        Regex::new(pattern).with_context(|| format!("Invalid input pattern '{}'", pattern))?;
    let mut doc = load(path)?;
    let report = doc.remove_inputs_matching(&regex)?;
    emit(&doc, destination, out)?;
    Ok(report)
}

/// Remove the input at `position`, renumbering the rest.
pub fn drop_input<W: Write>(
    path: &Path,
    position: usize,
    destination: &Destination,
    out: &mut W,
) -> anyhow::Result<Entry> {
    let mut doc = load(path)?;
    let removed = doc
        .inputs_mut()
        .remove(position)
        .with_context(|| format!("Failed to remove input {} from {}", position, path.display()))?;
    emit(&doc, destination, out)?;
    Ok(removed)
}
