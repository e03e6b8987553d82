//! Error types for the data-loader crate.
//!
//! Two enums live here:
//! - `DataLoadError` for everything that can go wrong while reading the
//!   MovieLens text files
//! - `RelationError` for schema mistakes when operating on a `Relation`
//!   (missing columns, wrong row width, ambiguous reshapes)
//!
//! Loading wraps `RelationError` so a single `?` works in both directions.

use thiserror::Error;

/// Errors that can occur during data loading and parsing
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in data file couldn't be parsed
    ///
    /// Carries the file name and the 1-based line number so a bad record
    /// can be located by hand.
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A record had fewer fields than the table layout requires
    #[error("Expected {expected} fields but found {found} in line {line} of {file}")]
    FieldCountMismatch {
        file: String,
        expected: usize,
        found: usize,
        line: usize,
    },

    /// Building a relation from parsed rows failed
    #[error(transparent)]
    Relation(#[from] RelationError),
}

/// Errors raised by relation operations.
///
/// These indicate a programming or configuration mistake (asking for a
/// column that does not exist, pushing a row of the wrong width), never a
/// data problem, and are not retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelationError {
    /// A referenced column is not part of the relation's schema
    #[error("Column not found: {column}")]
    KeyError { column: String },

    /// A column name appears twice in one schema
    #[error("Duplicate column: {column}")]
    DuplicateColumn { column: String },

    /// A row does not have one value per column
    #[error("Row has {found} values but relation has {expected} columns")]
    ArityMismatch { expected: usize, found: usize },

    /// Two input rows landed on the same cell of a wide table
    #[error("Duplicate entry for index ({index}) and column {column} while reshaping")]
    DuplicateEntry { index: String, column: String },

    /// Distinct column key values (or a key and an index column) would
    /// produce the same wide column name
    #[error("Column key values collide on the wide column name '{label}'")]
    AmbiguousColumnKey { label: String },

    /// A natural join was requested between relations with no shared column
    #[error("Relations share no column to join on")]
    NoJoinKeys,

    /// Bin edges/labels do not describe a valid partition
    #[error("Invalid bins: {0}")]
    InvalidBins(String),
}

impl RelationError {
    /// Shorthand for the common missing-column case
    pub fn key(column: impl Into<String>) -> Self {
        RelationError::KeyError {
            column: column.into(),
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;

/// Result alias for relation operations
pub type RelationResult<T> = std::result::Result<T, RelationError>;
