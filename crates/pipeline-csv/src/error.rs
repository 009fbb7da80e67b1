//! Error types for table I/O, transforms and tube assembly.

use std::path::PathBuf;
use thiserror::Error;

use pipeline_model::ModelError;

/// Errors that can occur while reading, transforming or assembling a table.
#[derive(Debug, Error)]
pub enum CsvError {
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A record that cannot belong to a tube was routed into one.
    #[error("tube at dist {tube_start} has wrong record at dist {dist} (type {code})")]
    UnknownObject { tube_start: i64, dist: i64, code: i64 },

    /// A thickness or diameter record whose value is not a number.
    #[error("record at dist {dist} has invalid {field} value '{value}'")]
    InvalidStateValue {
        dist: i64,
        field: &'static str,
        value: String,
    },

    /// A record lies before the first node of a distance table.
    #[error("dist {dist} < node {node}")]
    DistanceBeforeNode { dist: i64, node: i64 },

    #[error("duplicate object id '{id}'")]
    DuplicateId { id: String },

    #[error("invalid distance table: {reason}")]
    InvalidTable { reason: String },

    #[error("shift must be positive, got {shift}")]
    InvalidShift { shift: i64 },

    /// A cell could not be parsed.
    #[error("line {line}, column {column}: {message}")]
    Parse {
        line: u64,
        column: &'static str,
        message: String,
    },

    /// A row with fewer cells than the table layout.
    #[error("line {line}: expected at least {expected} columns, got {actual}")]
    ShortRow {
        line: u64,
        expected: usize,
        actual: usize,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("unknown encoding '{label}'")]
    UnknownEncoding { label: String },

    /// Text that the target encoding cannot represent.
    #[error("text cannot be encoded as {encoding}")]
    Unencodable { encoding: &'static str },

    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CsvError>;
