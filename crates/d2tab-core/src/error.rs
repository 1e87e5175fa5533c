//! Error types for d2tab-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in d2tab-core
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TXT input has no header line
    #[error("TXT input is empty")]
    EmptyInput,

    /// A data line has a different number of cells than the header
    #[error("line {line} has {found} cells, expected {expected}")]
    RowLengthMismatch {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A cell contains a character that would break the TXT row boundary
    #[error("cell at row {row}, column '{column}' contains a tab or line break")]
    InvalidCellContent { row: usize, column: String },

    /// A cell needs the backtick escape but contains a backtick itself
    #[error("cell at row {row}, column '{column}' cannot be escaped: value contains a backtick")]
    CellEncoding { row: usize, column: String },

    /// Low-level TXT parsing error from the csv crate
    #[error("TXT parse error: {0}")]
    Txt(#[from] csv::Error),

    /// Structured input is not valid UTF-8
    #[error("structured input is not valid UTF-8")]
    InvalidUtf8,

    /// Structured file has no column manifest
    #[error("structured file is missing the 'columns' manifest")]
    ManifestMissing,

    /// Column manifest is present but inconsistent
    #[error("column manifest is corrupt: {0}")]
    ManifestCorrupt(String),

    /// A column group references a column that is not in the manifest
    #[error("column group '{group}' references unknown column '{member}'")]
    DanglingGroupMember { group: String, member: String },

    /// TOML syntax error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// One or more row records could not be decoded
    #[error("{} record(s) could not be decoded; first: {}", .0.len(), .0[0])]
    Records(Vec<RecordError>),

    /// Column name lookup failed
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// Row index out of bounds
    #[error("row index {index} out of range (table has {count} rows)")]
    RowOutOfRange { index: usize, count: usize },
}

/// A problem with a single row record in a structured file.
///
/// Record errors are accumulated per file and reported together via
/// [`Error::Records`]; one bad record never corrupts the others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordError {
    /// 0-based index of the row record
    pub row: usize,
    /// The offending key within the record
    pub key: String,
    /// Human-readable description of the problem
    pub reason: String,
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {}, key '{}': {}", self.row, self.key, self.reason)
    }
}
