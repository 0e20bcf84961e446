//! Error types for folder loading.

use std::path::PathBuf;

use thiserror::Error;

use crate::data::{ColumnType, Value};

/// Errors raised while discovering, parsing, merging, or projecting CSV data.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The encoding label is not known to `encoding_rs` or the legacy alias table.
    #[error("unknown encoding '{label}'")]
    UnknownEncoding { label: String },

    #[error("failed to open {path}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV content (ragged rows, broken quoting, I/O while reading).
    #[error("failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Row `row` (1 = header) holds bytes that are invalid for `encoding`.
    #[error("row {row} of {path} is not valid {encoding}")]
    Decode {
        path: PathBuf,
        row: usize,
        encoding: &'static str,
    },

    #[error("CSV file has no header row: {path}")]
    EmptyFile { path: PathBuf },

    /// Nothing to concatenate.
    #[error("no files matching '{extension}' found in {folder}")]
    NoFiles { folder: PathBuf, extension: String },

    #[error("column(s) not found: {}", columns.join(", "))]
    MissingColumn { columns: Vec<String> },

    /// A column name repeated in a header, a mapping's sources, or its targets.
    #[error("duplicate column '{column}'")]
    DuplicateColumn { column: String },

    #[error("column '{column}' has {found} row(s), expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("column '{column}' is declared {expected} but holds {value:?}")]
    ColumnTypeMismatch {
        column: String,
        expected: ColumnType,
        value: Value,
    },

    /// Raised only under [`crate::loader::SchemaPolicy::Strict`].
    #[error("header mismatch in {path}: expected {expected:?}, found {found:?}")]
    SchemaMismatch {
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("invalid column mapping file {path}: {message}")]
    MappingFile { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, LoadError>;
