//! Load a folder of CSV files into one table, then keep and rename a chosen
//! set of columns.
//!
//! ```no_run
//! use std::path::Path;
//!
//! use csv_folder::{ColumnMapping, load_folder};
//!
//! let mapping = ColumnMapping::from_pairs([("ID", "id"), ("Val", "value")])?;
//! let table = load_folder(Path::new("data"), &mapping, Some(".csv"), "cp932")?;
//! println!("{table}");
//! # Ok::<(), csv_folder::LoadError>(())
//! ```
//!
//! The library logs through the `log` facade and never installs a logger.

pub mod data;
pub mod discovery;
pub mod error;
pub mod io_utils;
pub mod loader;
pub mod mapping;
pub mod table;

pub use data::{ColumnType, Value};
pub use discovery::discover_files;
pub use error::{LoadError, Result};
pub use loader::{LoadOptions, SchemaPolicy, load_folder, load_folder_with, read_csv_file};
pub use mapping::ColumnMapping;
pub use table::{Column, Table};

/// Keeps the columns named by `mapping`'s keys, in key order.
pub fn select_columns(table: &Table, mapping: &ColumnMapping) -> Result<Table> {
    table.select_columns(mapping)
}

/// Returns a copy of `table` with mapped columns renamed; `table` is untouched.
pub fn rename_columns(table: &Table, mapping: &ColumnMapping) -> Result<Table> {
    table.rename_columns(mapping)
}
