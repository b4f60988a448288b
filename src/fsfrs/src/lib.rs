// fsfrs/src/lib.rs

//! A Rust-native library for reading and editing FSL FEAT design (fsf) files.
//!
//! This library provides functionality to:
//! - Parse fsf files into an ordered, key-indexed document
//! - Edit values while keeping comments and the existing layout
//! - Add and remove inputs of a higher-level design, keeping the group
//!   membership and EV weighting entries numbered consistently with them
//! - Write the document back out in the same format

pub mod document;
pub mod entry;
pub mod error;
pub mod parser;

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

pub use document::{Document, InputList, NewInput, RemovalReport};
pub use entry::{Comment, Entry, Key, LocalIndex, Value};
pub use error::{FsfError, Result, Warning};

/// Parse an fsf document from a file path.
///
/// # Examples
///
/// ```no_run
/// fn main() -> Result<(), fsfrs::FsfError> {
///     let design = fsfrs::read("design.fsf")?;
///     println!("{} inputs", design.inputs().len());
///     Ok(())
/// }
/// ```
pub fn read<P: AsRef<Path>>(path: P) -> Result<Document> {
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    reads(&contents)
}

/// Parse an fsf document from a string.
///
/// # Examples
///
/// ```
/// fn main() -> Result<(), fsfrs::FsfError> {
///     let design = fsfrs::reads("# TR(s)\nset fmri(tr) 2.5\n")?;
///     assert_eq!(design.get("fmri(tr)")?.as_float()?, 2.5);
///     Ok(())
/// }
/// ```
pub fn reads(content: &str) -> Result<Document> {
    Document::build(content)
}

/// Write a document to a file, refusing to overwrite an existing one.
///
/// # Examples
///
/// ```no_run
/// # fn main() -> Result<(), fsfrs::FsfError> {
/// let mut design = fsfrs::read("design.fsf")?;
/// design.set("fmri(outputdir)", "/data/group.gfeat")?;
/// fsfrs::write(&design, "edited.fsf")?;
/// # Ok(())
/// # }
/// ```
pub fn write<P: AsRef<Path>>(doc: &Document, path: P) -> Result<()> {
    write_with_options(doc, path, &WriteOptions::default())
}

/// Write a document to a file with specific options.
pub fn write_with_options<P: AsRef<Path>>(
    doc: &Document,
    path: P,
    options: &WriteOptions,
) -> Result<()> {
    let path = path.as_ref();

    if !options.force && path.exists() {
        return Err(FsfError::FileAlreadyExists(path.to_path_buf()));
    }

    let mut file = File::create(path)?;
    write_to_writer(doc, &mut file)
}

/// Write a document to any writer implementing the Write trait.
pub fn write_to_writer<W: Write>(doc: &Document, writer: &mut W) -> Result<()> {
    writer.write_all(doc.serialize().as_bytes())?;
    Ok(())
}

/// Options for writing documents to disk.
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Force overwrite existing files
    pub force: bool,
}

#[cfg(feature = "json")]
/// Convert a document to a JSON string.
pub fn to_json(doc: &Document) -> Result<String> {
    serde_json::to_string_pretty(doc).map_err(FsfError::from)
}
