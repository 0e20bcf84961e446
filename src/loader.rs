//! Folder ingestion: discover → parse → concatenate → select → rename.
//!
//! [`load_folder`] is an all-or-nothing batch load. Files are read one after
//! another in sorted file-name order; the first failure aborts the whole call.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use log::{debug, info};

use crate::{
    discovery::discover_files,
    error::{LoadError, Result},
    io_utils::{self, DEFAULT_CSV_DELIMITER, DEFAULT_ENCODING},
    mapping::ColumnMapping,
    table::{Column, Table},
};

pub const DEFAULT_EXTENSION: &str = ".csv";

/// How files whose headers differ are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemaPolicy {
    /// Union of all columns; cells a file does not provide are null.
    #[default]
    Union,
    /// Every file must carry the same set of columns as the first one.
    Strict,
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub extension: Option<String>,
    pub encoding: String,
    pub delimiter: u8,
    pub schema_policy: SchemaPolicy,
    pub infer_types: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            extension: Some(DEFAULT_EXTENSION.to_string()),
            encoding: DEFAULT_ENCODING.to_string(),
            delimiter: DEFAULT_CSV_DELIMITER,
            schema_policy: SchemaPolicy::Union,
            infer_types: true,
        }
    }
}

impl LoadOptions {
    pub fn with_extension(mut self, extension: Option<&str>) -> Self {
        self.extension = extension.map(str::to_string);
        self
    }

    pub fn with_encoding(mut self, encoding: &str) -> Self {
        self.encoding = encoding.to_string();
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_schema_policy(mut self, policy: SchemaPolicy) -> Self {
        self.schema_policy = policy;
        self
    }

    pub fn with_type_inference(mut self, infer: bool) -> Self {
        self.infer_types = infer;
        self
    }
}

/// Parses one CSV file into a table whose index counts from 0.
///
/// The first row names the columns. Ragged rows, broken quoting, and bytes
/// that are invalid in `encoding` all fail the read.
pub fn read_csv_file(
    path: &Path,
    encoding: &'static Encoding,
    delimiter: u8,
    infer_types: bool,
) -> Result<Table> {
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
    let headers = io_utils::reader_headers(&mut reader, encoding, path)?;
    let mut cells = vec![Vec::new(); headers.len()];

    let mut record = csv::ByteRecord::new();
    let mut row = 1usize;
    loop {
        let more = reader
            .read_byte_record(&mut record)
            .map_err(|source| LoadError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
        if !more {
            break;
        }
        row += 1;
        let decoded =
            io_utils::decode_record(&record, encoding).ok_or_else(|| LoadError::Decode {
                path: path.to_path_buf(),
                row,
                encoding: encoding.name(),
            })?;
        for (column, value) in cells.iter_mut().zip(decoded) {
            column.push(value);
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| Column::from_raw(name, raw, infer_types))
        .collect();
    let table = Table::from_columns(columns)?;
    debug!(
        "Parsed {:?}: {} row(s), {} column(s)",
        path,
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}

/// Loads every `extension` file in `folder` decoded with `encoding`, keeps the
/// columns named by `mapping`'s keys, renames them to its values, and returns
/// the result with a dense 0-based index.
pub fn load_folder(
    folder: &Path,
    mapping: &ColumnMapping,
    extension: Option<&str>,
    encoding: &str,
) -> Result<Table> {
    let options = LoadOptions::default()
        .with_extension(extension)
        .with_encoding(encoding);
    load_folder_with(folder, mapping, &options)
}

pub fn load_folder_with(
    folder: &Path,
    mapping: &ColumnMapping,
    options: &LoadOptions,
) -> Result<Table> {
    let encoding = io_utils::resolve_encoding(&options.encoding)?;
    let files = discover_files(folder, options.extension.as_deref());
    let combined = read_and_concat(folder, &files, encoding, options)?;
    let selected = combined.select_columns(mapping)?;
    let renamed = selected.rename_columns(mapping)?;
    let table = renamed.reset_index();
    info!(
        "Loaded {} row(s) from {} file(s) in {:?}",
        table.row_count(),
        files.len(),
        folder
    );
    Ok(table)
}

fn read_and_concat(
    folder: &Path,
    files: &[PathBuf],
    encoding: &'static Encoding,
    options: &LoadOptions,
) -> Result<Table> {
    let mut baseline: Option<BTreeSet<String>> = None;
    let mut tables = Vec::with_capacity(files.len());
    for path in files {
        let table = read_csv_file(path, encoding, options.delimiter, options.infer_types)?;
        if options.schema_policy == SchemaPolicy::Strict {
            check_headers(&mut baseline, path, &table)?;
        }
        tables.push(table);
    }
    Table::concat(tables).ok_or_else(|| LoadError::NoFiles {
        folder: folder.to_path_buf(),
        extension: options.extension.clone().unwrap_or_else(|| "*".to_string()),
    })
}

fn check_headers(
    baseline: &mut Option<BTreeSet<String>>,
    path: &Path,
    table: &Table,
) -> Result<()> {
    let found = table
        .headers()
        .into_iter()
        .map(str::to_string)
        .collect::<BTreeSet<_>>();
    match baseline {
        Some(expected) if *expected != found => Err(LoadError::SchemaMismatch {
            path: path.to_path_buf(),
            expected: expected.iter().cloned().collect(),
            found: found.into_iter().collect(),
        }),
        Some(_) => Ok(()),
        None => {
            *baseline = Some(found);
            Ok(())
        }
    }
}
