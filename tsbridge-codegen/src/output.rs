//! Writing generated files and their backups.

use chrono::Local;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// First line of every generated file.
pub const GENERATED_HEADER: &str = "/* Do not change, this code is generated from Rust types */";

/// Timestamp format of backup file names.
const BACKUP_TIMESTAMP: &str = "%Y-%m-%dT%H_%M_%S%.3f";

/// Returns the backup path of `path` for the given timestamp and extension.
#[must_use]
pub fn backup_path(path: &Path, timestamp: &str, extension: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!("-{timestamp}.{extension}"));
    PathBuf::from(name)
}

/// Copies `path` to a timestamped sibling `<path>-<timestamp>.<extension>`.
///
/// # Returns
/// The backup path, or `None` when there is nothing to back up.
///
/// # Errors
/// Returns any IO error other than a missing source file.
pub fn backup(path: &Path, extension: &str) -> io::Result<Option<PathBuf>> {
    let contents = match fs::read(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err),
    };

    let timestamp = Local::now().format(BACKUP_TIMESTAMP).to_string();
    let target = backup_path(path, &timestamp, extension);
    fs::write(&target, contents)?;
    Ok(Some(target))
}

/// Renders the full contents of a generated file.
#[must_use]
pub fn render_generated(converted: &str) -> String {
    format!("{GENERATED_HEADER}\n\n{converted}\n")
}

/// Writes converted definitions to `path`, header included.
///
/// # Errors
/// Returns the IO error of the write.
pub fn write_generated(path: &Path, converted: &str) -> io::Result<()> {
    fs::write(path, render_generated(converted))
}
