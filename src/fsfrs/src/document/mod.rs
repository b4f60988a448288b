// fsfrs/src/document/mod.rs

//! The document index and the input-list view over it.
//!
//! Structural edits of the input list keep every key family that is numbered
//! by input position consistent with it.

pub mod core;
pub mod inputs;
pub mod layout;
pub mod rebuild;
pub mod renumber;

pub use self::core::{Document, NamespaceView};
pub use inputs::InputList;
pub use rebuild::RemovalReport;
pub use renumber::NewInput;
