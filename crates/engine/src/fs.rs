//! Filesystem helpers shared by the pipeline stages
//!
//! Every helper attaches the offending path to I/O failures.

use retarget_core::{Error, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Recursively list every file under `root`, in file-name order.
///
/// Symlinks to files are listed and read through. Directory symlinks are
/// not descended into and are logged as skipped.
pub fn list_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            Error::io(path, io::Error::from(e))
        })?;
        let file_type = entry.file_type();
        if file_type.is_file() || (file_type.is_symlink() && entry.path().is_file()) {
            files.push(entry.into_path());
        } else if file_type.is_symlink() {
            warn!(path = %entry.path().display(), "skipping symlink that is not a file");
        }
    }
    Ok(files)
}

/// Delete `path` and everything below it, if it exists.
pub fn remove_dir_if_exists(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(path, e)),
    }
}

/// Make `path` an existing, empty directory.
pub fn recreate_dir(path: &Path) -> Result<()> {
    remove_dir_if_exists(path)?;
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))
}

/// Create `path` and its parents if missing.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))
}

/// Copy a file byte for byte, overwriting `to`.
pub fn copy_file(from: &Path, to: &Path) -> Result<u64> {
    fs::copy(from, to).map_err(|e| {
        // blame whichever side is missing
        if from.exists() {
            Error::io(to, e)
        } else {
            Error::io(from, e)
        }
    })
}

/// Append `suffix` to the final component of `path` (`a.dll` -> `a.dll.meta`).
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}
