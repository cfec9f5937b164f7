//! Distribution version marker handling.
//!
//! The running distribution ships a plain-text `VERSION` file at its library
//! root. Compiled configuration caches carry a copy of it so a cache
//! directory can be matched against the distribution that produced it.

use std::fs;
use std::io;
use std::path::Path;

/// File name of the version marker, in both the library root and the cache
/// directory.
pub const VERSION_FILE_NAME: &str = "VERSION";

/// Read the version marker from `dir`, with surrounding whitespace trimmed.
pub fn read_version_marker(dir: &Path) -> io::Result<String> {
    let raw = fs::read_to_string(dir.join(VERSION_FILE_NAME))?;
    Ok(raw.trim().to_string())
}

/// Copy the version marker from `from_dir` into `to_dir`, byte for byte.
///
/// `to_dir` is created if it does not exist; an existing marker is
/// overwritten.
pub fn copy_version_marker(from_dir: &Path, to_dir: &Path) -> io::Result<()> {
    let data = fs::read(from_dir.join(VERSION_FILE_NAME))?;
    fs::create_dir_all(to_dir)?;
    fs::write(to_dir.join(VERSION_FILE_NAME), data)
}
