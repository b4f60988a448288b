// featconf/src/cli/list.rs

use super::load;
use fsfrs::Value;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

const INPUTS_PATTERN: &str = r".*feat_files.*";
const CONTRASTS_PATTERN: &str = r".*conname_real.*";

lazy_static! {
    static ref FIRST_NUMBER: Regex = Regex::new(r"\d+").unwrap();
}

/// First number embedded in a key, `0` when there is none.
fn first_number(key: &str) -> u64 {
    FIRST_NUMBER
        .find(key)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// One ` key  : value` row per match, keys padded to a common width and
/// ordered by the first number they contain.
pub fn format_listing(found: &HashMap<String, Value>) -> String {
    let width = found.keys().map(String::len).max().unwrap_or(0) + 2;
    let mut rows: Vec<(&String, &Value)> = found.iter().collect();
    rows.sort_by(|(a, _), (b, _)| first_number(a).cmp(&first_number(b)).then_with(|| a.cmp(b)));
    rows.into_iter()
        .map(|(key, value)| format!(" {:<width$}: {}\n", key, value, width = width))
        .collect()
}

/// Echo the whole document.
pub fn print_document<W: Write>(path: &Path, out: &mut W) -> anyhow::Result<()> {
    let doc = load(path)?;
    fsfrs::write_to_writer(&doc, out)?;
    Ok(())
}

/// List every entry whose key matches `pattern` at its start.
pub fn find_entries<W: Write>(path: &Path, pattern: &str, out: &mut W) -> anyhow::Result<()> {
    let doc = load(path)?;
    let found = doc.find(pattern)?;
    write!(out, "{}", format_listing(&found))?;
    Ok(())
}

pub fn list_inputs<W: Write>(path: &Path, out: &mut W) -> anyhow::Result<()> {
    find_entries(path, INPUTS_PATTERN, out)
}

pub fn list_contrasts<W: Write>(path: &Path, out: &mut W) -> anyhow::Result<()> {
    find_entries(path, CONTRASTS_PATTERN, out)
}
