//! Sidecar index over the assets tree
//!
//! A refresh brings the sidecars in line with the tree: every file and
//! directory gets a `.meta` if it lacks one, and every `.meta` whose asset
//! is gone is deleted. Hidden entries are never indexed.

use crate::meta::{MetaFile, META_SUFFIX};
use crate::walk::{is_hidden, list_entries};
use retarget_core::{AssetIndex, Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What one refresh changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Sidecars written for new assets
    pub created: usize,
    /// Orphaned sidecars deleted
    pub removed: usize,
}

/// Sidecar index rooted at the assets directory
#[derive(Debug, Clone)]
pub struct MetaIndex {
    root: PathBuf,
}

impl MetaIndex {
    /// Index the tree under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        MetaIndex { root: root.into() }
    }

    /// Root of the indexed tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Refresh and report what changed
    pub fn refresh_with_summary(&self) -> Result<RefreshSummary> {
        let mut summary = RefreshSummary::default();

        for path in list_entries(&self.root)? {
            let rel = path.strip_prefix(&self.root).unwrap_or(path.as_path());
            if rel.ancestors().any(is_hidden) {
                continue;
            }
            if MetaFile::is_meta(&path) {
                if !asset_of(&path).exists() {
                    fs::remove_file(&path).map_err(|e| Error::io(&path, e))?;
                    debug!(path = %path.display(), "removed orphan sidecar");
                    summary.removed += 1;
                }
            } else if !MetaFile::path_for(&path).exists() {
                let meta = MetaFile::create(&path)?;
                debug!(path = %path.display(), guid = %meta.guid, "created sidecar");
                summary.created += 1;
            }
        }

        if summary != RefreshSummary::default() {
            info!(
                created = summary.created,
                removed = summary.removed,
                "refreshed asset index"
            );
        }
        Ok(summary)
    }
}

impl AssetIndex for MetaIndex {
    fn refresh(&self) -> Result<()> {
        self.refresh_with_summary().map(|_| ())
    }
}

fn asset_of(meta: &Path) -> PathBuf {
    let s = meta.to_string_lossy();
    PathBuf::from(s.strip_suffix(META_SUFFIX).unwrap_or(&*s))
}
