// featconf/src/cli/mod.rs

//! Subcommand handlers. Each handler writes its regular output to the given
//! writer so the binary can hand it stdout and tests can hand it a buffer.

mod edit;
mod list;

pub use edit::{drop_input, parse_value, remove_inputs, set_value};
pub use list::{find_entries, format_listing, list_contrasts, list_inputs, print_document};

use anyhow::Context;
use fsfrs::{Document, WriteOptions};
use log::info;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Where an edited document is written.
#[derive(Debug, Clone, Default)]
pub struct Destination {
    /// Output file; the document goes to the writer when unset
    pub output: Option<PathBuf>,
    /// Overwrite an existing output file
    pub force: bool,
}

/// Read and parse a design file.
pub fn load(path: &Path) -> anyhow::Result<Document> {
    let content = fs_err::read_to_string(path)?;
    fsfrs::reads(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn emit<W: Write>(doc: &Document, destination: &Destination, out: &mut W) -> anyhow::Result<()> {
    match &destination.output {
        Some(path) => {
            let options = WriteOptions {
                force: destination.force,
            };
            fsfrs::write_with_options(doc, path, &options)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => fsfrs::write_to_writer(doc, out)?,
    }
    Ok(())
}
