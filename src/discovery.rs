//! Non-recursive file discovery.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

/// Lists the regular files directly inside `folder` whose name ends with
/// `extension`. `None` matches every file. Hidden files (names starting with
/// `.`, such as editor lock files) are skipped, as a shell `*` glob does.
///
/// A folder that is missing or unreadable yields an empty list rather than an
/// error; the caller decides whether "nothing found" is fatal. Paths are
/// sorted by file name so downstream concatenation is reproducible.
pub fn discover_files(folder: &Path, extension: Option<&str>) -> Vec<PathBuf> {
    let entries = match fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("Cannot list {:?}: {err}; treating as empty", folder);
            return Vec::new();
        }
    };

    let mut files = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| matches_extension(path, extension))
        .collect::<Vec<_>>();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    debug!(
        "Discovered {} file(s) matching {:?} in {:?}",
        files.len(),
        extension.unwrap_or("*"),
        folder
    );
    files
}

fn matches_extension(path: &Path, extension: Option<&str>) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    if name.starts_with('.') {
        return false;
    }
    extension.is_none_or(|suffix| name.ends_with(suffix))
}
