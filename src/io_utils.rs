//! I/O utilities for CSV reading and text decoding.
//!
//! All file reads in csv-folder flow through this module. It provides:
//!
//! - **Encoding resolution**: WHATWG labels via `encoding_rs`, plus the legacy
//!   Windows code page names (`cp932` and friends) that `encoding_rs` does not
//!   register. A blank label means UTF-8.
//! - **Reader construction**: comma-delimited, double-quote aware, strict
//!   record lengths.
//! - **Decoding**: fields are read as raw bytes and decoded without
//!   replacement, so a wrong encoding surfaces as an error instead of U+FFFD.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use encoding_rs::{Encoding, SHIFT_JIS, UTF_8};

use crate::error::{LoadError, Result};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_ENCODING: &str = "cp932";

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Code page names in common use that are not WHATWG labels.
fn legacy_alias(label: &str) -> Option<&'static Encoding> {
    match label.to_ascii_lowercase().as_str() {
        "cp932" | "ms932" | "mskanji" | "windows-932" => Some(SHIFT_JIS),
        _ => None,
    }
}

pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Ok(UTF_8);
    }
    if let Some(encoding) = Encoding::for_label(trimmed.as_bytes()) {
        return Ok(encoding);
    }
    legacy_alias(trimmed).ok_or_else(|| LoadError::UnknownEncoding {
        label: label.to_string(),
    })
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(false);
    builder.from_reader(reader)
}

pub fn open_csv_reader_from_path(
    path: &Path,
    delimiter: u8,
) -> Result<csv::Reader<BufReader<File>>> {
    let file = File::open(path).map_err(|source| LoadError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(open_csv_reader(BufReader::new(file), delimiter))
}

/// Decodes `bytes` strictly; `None` when they are malformed for `encoding`.
pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Option<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

/// Reads and decodes the header row. A leading byte order mark is dropped.
pub fn reader_headers<R>(
    reader: &mut csv::Reader<R>,
    encoding: &'static Encoding,
    path: &Path,
) -> Result<Vec<String>>
where
    R: Read,
{
    let record = reader
        .byte_headers()
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();
    if record.is_empty() {
        return Err(LoadError::EmptyFile {
            path: path.to_path_buf(),
        });
    }
    let mut headers = decode_record(&record, encoding).ok_or_else(|| LoadError::Decode {
        path: path.to_path_buf(),
        row: 1,
        encoding: encoding.name(),
    })?;
    if let Some(first) = headers.first_mut()
        && let Some(stripped) = first.strip_prefix(BYTE_ORDER_MARK)
    {
        *first = stripped.to_string();
    }
    Ok(headers)
}
