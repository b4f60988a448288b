// fsfrs/src/document/rebuild.rs

//! Bulk removal of inputs that rebuilds the input-numbered families from the
//! surviving paths instead of renumbering them.
//!
//! Only one group membership column and one EV weighting column are
//! regenerated; a design with more EVs must be edited through
//! [`InputList`](super::InputList) instead.

use super::core::Document;
use super::layout::{self, SETTINGS_NAMESPACE};
use super::renumber;
use crate::entry::{Entry, Key, Value};
use crate::error::{Result, Warning};
use log::{debug, info};
use regex::Regex;

/// Outcome of [`Document::rebuild_on_removal`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemovalReport {
    /// Paths of the removed inputs
    pub removed: Vec<String>,
    /// Paths of the surviving inputs, in their new order
    pub kept: Vec<String>,
    pub warnings: Vec<Warning>,
}

type Synthesize = fn(usize, &str) -> Entry;

/// Markers after which each family is regenerated.
const FAMILIES: [(&str, Synthesize); 3] = [
    (layout::INPUT_MARKER, synthesize_input),
    (layout::EV_WEIGHT_MARKER, synthesize_ev_weight),
    (layout::GROUP_MEMBERSHIP_MARKER, synthesize_group_membership),
];

fn synthesize_input(input: usize, path: &str) -> Entry {
    Entry::new(Key::input(input), Value::text(path), layout::input_comment(input))
}

fn synthesize_ev_weight(input: usize, _: &str) -> Entry {
    Entry::new(
        layout::ev_weight_key(input, 1),
        1.0,
        layout::ev_weight_comment(input, 1),
    )
}

fn synthesize_group_membership(input: usize, _: &str) -> Entry {
    Entry::new(
        layout::group_membership_key(input),
        1,
        layout::group_membership_comment(input),
    )
}

/// Entries dropped wholesale before the families are regenerated, matched by
/// key prefix alone.
fn is_rebuilt(key: &Key) -> bool {
    if key.is_input() {
        return true;
    }
    match key.local().name() {
        Some(name) if key.namespace() == SETTINGS_NAMESPACE => {
            name.starts_with("evg") || name.starts_with("groupmem")
        }
        _ => false,
    }
}

impl Document {
    /// Remove every input whose path satisfies `predicate`, drop all group
    /// membership and EV weighting entries, and regenerate the three families
    /// right after their markers for the surviving inputs.
    ///
    /// A missing marker skips its family. Both length caches end up holding
    /// the number of surviving inputs.
    pub fn rebuild_on_removal<P>(&mut self, mut predicate: P) -> Result<RemovalReport>
    where
        P: FnMut(&str) -> bool,
    {
        let mut report = RemovalReport::default();
        for entry in self.inputs() {
            let path = entry.value().to_string();
            if predicate(&path) {
                info!("removing: {}", path);
                report.removed.push(path);
            } else {
                report.kept.push(path);
            }
        }

        let mut staged = self.clone();
        staged.entries.retain(|_, entry| !is_rebuilt(entry.key()));

        for (marker, synthesize) in FAMILIES {
            let marker = layout::setting(marker).to_string();
            let Some(at) = staged.position(&marker) else {
                debug!("marker {} not found; family not rebuilt", marker);
                continue;
            };
            for (index, path) in report.kept.iter().enumerate() {
                staged.insert(at + 1 + index, synthesize(index + 1, path))?;
            }
        }

        report.warnings = renumber::patch_length_caches(&mut staged, report.kept.len());
        *self = staged;
        Ok(report)
    }

    /// [`rebuild_on_removal`](Self::rebuild_on_removal) for every input whose
    /// path matches `pattern` at its start.
    pub fn remove_inputs_matching(&mut self, pattern: &Regex) -> Result<RemovalReport> {
        self.rebuild_on_removal(|path| pattern.find(path).map_or(false, |m| m.start() == 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESIGN: &str = "\
# Total volumes
set fmri(npts) 4

# Number of first-level analyses
set fmri(multiple) 4

# Add confound EVs text file
set fmri(confoundevs) 0

# 4D AVW data or FEAT directory (1)
set feat_files(1) \"/data/sub-01.feat\"

# 4D AVW data or FEAT directory (2)
set feat_files(2) \"/data/sub-02.feat\"

# 4D AVW data or FEAT directory (3)
set feat_files(3) \"/data/sub-03.feat\"

# 4D AVW data or FEAT directory (4)
set feat_files(4) \"/data/sub-04.feat\"

# Orthogonalise EVs
set fmri(level2orth) 0

# Higher-level EV value for EV 1 and input 1
set fmri(evg1.1) 1.0

# Higher-level EV value for EV 1 and input 2
set fmri(evg2.1) 1.0

# Higher-level EV value for EV 1 and input 3
set fmri(evg3.1) 1.0

# Higher-level EV value for EV 1 and input 4
set fmri(evg4.1) 1.0

# Group membership for input 1
set fmri(groupmem.1) 1

# Group membership for input 2
set fmri(groupmem.2) 1

# Group membership for input 3
set fmri(groupmem.3) 1

# Group membership for input 4
set fmri(groupmem.4) 1

# Contrast & F-tests mode
set fmri(con_mode_old) orig

set fmri(con_mode) orig
";

    fn family(doc: &Document, prefix: &str) -> Vec<String> {
        doc.keys()
            .filter(|key| key.starts_with(prefix))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_rebuild_removes_second_of_four() {
        let mut doc = Document::build(DESIGN).unwrap();
        let report = doc
            .rebuild_on_removal(|path| path.ends_with("sub-02.feat"))
            .unwrap();

        assert_eq!(report.removed, vec!["/data/sub-02.feat"]);
        assert_eq!(
            report.kept,
            vec!["/data/sub-01.feat", "/data/sub-03.feat", "/data/sub-04.feat"]
        );
        assert!(report.warnings.is_empty());

        assert_eq!(
            family(&doc, "feat_files"),
            vec!["feat_files(1)", "feat_files(2)", "feat_files(3)"]
        );
        assert_eq!(
            family(&doc, "fmri(evg"),
            vec!["fmri(evg1.1)", "fmri(evg2.1)", "fmri(evg3.1)"]
        );
        assert_eq!(
            family(&doc, "fmri(groupmem"),
            vec!["fmri(groupmem.1)", "fmri(groupmem.2)", "fmri(groupmem.3)"]
        );
        assert_eq!(doc.get("feat_files(2)").unwrap(), &Value::text("/data/sub-03.feat"));
        assert_eq!(doc.get("fmri(npts)").unwrap(), &Value::Integer(3));
        assert_eq!(doc.get("fmri(multiple)").unwrap(), &Value::Integer(3));
    }

    #[test]
    fn test_rebuilt_entries_follow_their_marker() {
        let mut doc = Document::build(DESIGN).unwrap();
        doc.rebuild_on_removal(|path| path.ends_with("sub-02.feat"))
            .unwrap();

        for (marker, first) in [
            ("fmri(confoundevs)", "feat_files(1)"),
            ("fmri(level2orth)", "fmri(evg1.1)"),
            ("fmri(con_mode_old)", "fmri(groupmem.1)"),
        ] {
            let at = doc.position(marker).unwrap();
            assert_eq!(doc.position(first), Some(at + 1), "{}", marker);
        }
        let keys: Vec<&str> = doc.keys().collect();
        let at = doc.position("fmri(con_mode_old)").unwrap();
        assert_eq!(
            &keys[at..at + 5],
            &[
                "fmri(con_mode_old)",
                "fmri(groupmem.1)",
                "fmri(groupmem.2)",
                "fmri(groupmem.3)",
                "fmri(con_mode)"
            ]
        );

        let text = doc.serialize();
        assert!(text.contains(
            "# 4D AVW data or FEAT directory (3)\nset feat_files(3) \"/data/sub-04.feat\""
        ));
        assert!(text.contains("# Higher-level EV value for EV 1 and input 2\nset fmri(evg2.1) 1.0"));
        assert!(text.contains("# Group membership for input 3\nset fmri(groupmem.3) 1"));
        assert!(text.contains("set fmri(con_mode_old) orig"));
    }

    #[test]
    fn test_missing_marker_skips_family() {
        let text = DESIGN.replace("# Orthogonalise EVs\nset fmri(level2orth) 0\n\n", "");
        let mut doc = Document::build(&text).unwrap();
        let report = doc.rebuild_on_removal(|_| false).unwrap();
        assert_eq!(report.kept.len(), 4);
        assert!(family(&doc, "fmri(evg").is_empty());
        assert_eq!(family(&doc, "fmri(groupmem").len(), 4);
        assert_eq!(family(&doc, "feat_files").len(), 4);
    }

    #[test]
    fn test_remove_inputs_matching_is_anchored() {
        let mut doc = Document::build(DESIGN).unwrap();
        let pattern = Regex::new(r"sub-0[12]").unwrap();
        let report = doc.remove_inputs_matching(&pattern).unwrap();
        assert!(report.removed.is_empty());

        let pattern = Regex::new(r".*sub-0[12]").unwrap();
        let report = doc.remove_inputs_matching(&pattern).unwrap();
        assert_eq!(report.removed.len(), 2);
        assert_eq!(doc.inputs().len(), 2);
        assert_eq!(doc.get("feat_files(1)").unwrap(), &Value::text("/data/sub-03.feat"));
        assert_eq!(doc.get("fmri(npts)").unwrap(), &Value::Integer(2));
    }

    #[test]
    fn test_remove_everything() {
        let mut doc = Document::build(DESIGN).unwrap();
        let report = doc.rebuild_on_removal(|_| true).unwrap();
        assert_eq!(report.removed.len(), 4);
        assert!(doc.inputs().is_empty());
        assert!(family(&doc, "fmri(groupmem").is_empty());
        assert_eq!(doc.get("fmri(multiple)").unwrap(), &Value::Integer(0));
    }
}
