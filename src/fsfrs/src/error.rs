// fsfrs/src/error.rs

//! Error and warning types for reading and editing fsf design files.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for fsfrs operations.
pub type Result<T> = std::result::Result<T, FsfError>;

/// Errors that can occur when parsing, editing or writing an fsf document.
///
/// Every variant is raised before the document is touched, so a failed
/// operation leaves the document exactly as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FsfError {
    /// I/O error when reading or writing files
    #[error("I/O error: {0}")]
    Io(String),

    /// Key does not have the `name(index)` shape
    #[error("Malformed key '{key}': expected the form name(index)")]
    MalformedKey { key: String },

    /// Input-list key whose index is not a number
    #[error("Non-numeric index '{index}' in key '{key}'")]
    NonNumericIndex { key: String, index: String },

    /// Non-blank, non-comment line that is not a `set key value` directive
    #[error("Unparseable line {line}: '{content}'")]
    UnparseableLine { line: usize, content: String },

    /// Key not present in the document
    #[error("Unknown key '{key}'")]
    UnknownKey { key: String },

    /// Key already present in the document
    #[error("Duplicate key '{key}'")]
    DuplicateKey { key: String },

    /// An input has no companion entry in a required dependent namespace
    #[error("Input {input} has no dependent entry '{key}'")]
    DependentEntryMissing { input: usize, key: String },

    /// 1-based input position outside the input list
    #[error("Input position {position} is out of range for {len} inputs")]
    InputOutOfRange { position: usize, len: usize },

    /// Key pattern that does not compile
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Value of a different type than requested
    #[error("Cannot convert '{value}' from {from} to {to}")]
    TypeConversion {
        from: String,
        to: String,
        value: String,
    },

    /// File already exists (when force=false)
    #[error("File already exists: {}", .0.display())]
    FileAlreadyExists(PathBuf),

    /// JSON serialization error
    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<io::Error> for FsfError {
    fn from(err: io::Error) -> Self {
        FsfError::Io(err.to_string())
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for FsfError {
    fn from(err: serde_json::Error) -> Self {
        FsfError::Json(err.to_string())
    }
}

impl FsfError {
    /// Create a new unknown key error.
    pub fn unknown_key<S: Into<String>>(key: S) -> Self {
        FsfError::UnknownKey { key: key.into() }
    }

    /// Create a new duplicate key error.
    pub fn duplicate_key<S: Into<String>>(key: S) -> Self {
        FsfError::DuplicateKey { key: key.into() }
    }

    /// Create a new invalid pattern error from a regex compile failure.
    pub fn invalid_pattern<S: Into<String>>(pattern: S, err: &regex::Error) -> Self {
        FsfError::InvalidPattern {
            pattern: pattern.into(),
            message: err.to_string(),
        }
    }

    /// Create a new type conversion error.
    pub fn type_conversion<S: Into<String>>(from: S, to: S, value: S) -> Self {
        FsfError::TypeConversion {
            from: from.into(),
            to: to.into(),
            value: value.into(),
        }
    }

    /// Get the error category for logging purposes.
    pub fn category(&self) -> &'static str {
        match self {
            FsfError::Io(_) => "io",
            FsfError::MalformedKey { .. } => "key",
            FsfError::NonNumericIndex { .. } => "key",
            FsfError::UnparseableLine { .. } => "parse",
            FsfError::UnknownKey { .. } => "not_found",
            FsfError::DuplicateKey { .. } => "duplicate",
            FsfError::DependentEntryMissing { .. } => "consistency",
            FsfError::InputOutOfRange { .. } => "range",
            FsfError::InvalidPattern { .. } => "pattern",
            FsfError::TypeConversion { .. } => "conversion",
            FsfError::FileAlreadyExists(_) => "file_exists",
            #[cfg(feature = "json")]
            FsfError::Json(_) => "json",
        }
    }

    /// Check if the caller can reasonably retry with different input.
    ///
    /// A missing dependent entry means the document itself is structurally
    /// inconsistent; no edit through the input list can succeed on it.
    pub fn is_recoverable(&self) -> bool {
        match self {
            FsfError::Io(_) => false,
            FsfError::UnparseableLine { .. } => false,
            FsfError::DependentEntryMissing { .. } => false,
            FsfError::FileAlreadyExists(_) => true,
            FsfError::MalformedKey { .. }
            | FsfError::NonNumericIndex { .. }
            | FsfError::UnknownKey { .. }
            | FsfError::DuplicateKey { .. }
            | FsfError::InputOutOfRange { .. }
            | FsfError::InvalidPattern { .. }
            | FsfError::TypeConversion { .. } => true,
            #[cfg(feature = "json")]
            FsfError::Json(_) => true,
        }
    }
}

/// Non-fatal anomalies surfaced to the caller alongside a successful edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// `set` was called with a key the parsed document did not contain
    UnknownKeySet { key: String },
    /// A cached input-list length setting was absent and could not be patched
    LengthCacheMissing { key: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnknownKeySet { key } => write!(f, "setting new item [{}]", key),
            Warning::LengthCacheMissing { key } => {
                write!(f, "length cache '{}' is missing and was not updated", key)
            }
        }
    }
}
