//! Sidecar metadata files
//!
//! Every file and directory in the managed tree has a `<name>.meta` text
//! file beside it. The only field read here is the `guid:` line, which
//! carries the asset's container id.

use once_cell::sync::Lazy;
use regex::Regex;
use retarget_core::{ContainerId, Error, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Sidecar suffix
pub const META_SUFFIX: &str = ".meta";

static GUID_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^guid:\s*([0-9a-fA-F]{32})\s*$").expect("valid regex"));

/// Parsed sidecar of one asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaFile {
    /// Container id of the asset
    pub guid: ContainerId,
}

impl MetaFile {
    /// Sidecar location for `asset`
    pub fn path_for(asset: &Path) -> PathBuf {
        let mut s = asset.as_os_str().to_owned();
        s.push(META_SUFFIX);
        PathBuf::from(s)
    }

    /// True if `path` names a sidecar
    pub fn is_meta(path: &Path) -> bool {
        path.to_string_lossy().ends_with(META_SUFFIX)
    }

    /// Read the sidecar of `asset`.
    ///
    /// Returns `Ok(None)` if there is no sidecar.
    ///
    /// # Errors
    ///
    /// I/O failures, and a sidecar without exactly one well-formed `guid:` line.
    pub fn read(asset: &Path) -> Result<Option<MetaFile>> {
        let path = Self::path_for(asset);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::io(&path, e)),
        };
        Self::parse(&text)
            .map(Some)
            .ok_or_else(|| Error::resolution(&path, "sidecar has no single guid line"))
    }

    /// Extract the guid from sidecar text
    pub fn parse(text: &str) -> Option<MetaFile> {
        let mut guids = GUID_LINE.captures_iter(text);
        let first = guids.next()?;
        if guids.next().is_some() {
            return None;
        }
        Some(MetaFile {
            guid: ContainerId::new(&first[1]),
        })
    }

    /// Write a sidecar with a fresh guid for `asset`, which must exist.
    pub fn create(asset: &Path) -> Result<MetaFile> {
        let is_dir = asset.is_dir();
        let meta = MetaFile {
            guid: ContainerId::new(Uuid::new_v4().simple().to_string()),
        };
        let path = Self::path_for(asset);
        fs::write(&path, meta.render(is_dir)).map_err(|e| Error::io(&path, e))?;
        Ok(meta)
    }

    fn render(&self, folder: bool) -> String {
        let mut text = format!("fileFormatVersion: 2\nguid: {}\n", self.guid);
        if folder {
            text.push_str("folderAsset: yes\n");
        }
        text
    }
}
