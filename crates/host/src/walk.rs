//! Tree traversal

use retarget_core::{Error, Result};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Every file and directory below `root` (excluding `root`), parents
/// before children, siblings in file-name order.
pub fn list_entries(root: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            Error::io(path, io::Error::from(e))
        })?;
        entries.push(entry.into_path());
    }
    Ok(entries)
}

/// True for names the asset tracker never indexes: dot-files and
/// backup files ending in `~`.
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .map_or(false, |n| n.starts_with('.') || n.ends_with('~'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn lists_dirs_before_children() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("b/c")).unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        fs::write(dir.path().join("b/c/d.txt"), "").unwrap();

        let rel: Vec<_> = list_entries(dir.path())
            .unwrap()
            .into_iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            rel,
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("b"),
                PathBuf::from("b/c"),
                PathBuf::from("b/c/d.txt"),
            ]
        );
    }

    #[test]
    fn hidden_names() {
        assert!(is_hidden(Path::new("a/.git")));
        assert!(is_hidden(Path::new("a/Thing.cs~")));
        assert!(!is_hidden(Path::new("a/Thing.cs")));
    }
}
