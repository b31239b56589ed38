//! Build output directory

use retarget_core::{BuildInfo, CompiledArtifact, Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension of compiled artifacts (without the dot)
pub const ARTIFACT_EXTENSION: &str = "dll";

/// The directory the build writes its binaries to
#[derive(Debug, Clone)]
pub struct BuildDirectory {
    dir: PathBuf,
}

impl BuildDirectory {
    /// Read artifacts from `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        BuildDirectory { dir: dir.into() }
    }

    /// Location of the build output
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl BuildInfo for BuildDirectory {
    /// Every `*.dll` directly inside the build directory, by file name.
    /// The artifact name is the file stem.
    fn compiled_artifacts(&self) -> Result<Vec<CompiledArtifact>> {
        let mut artifacts = Vec::new();

        for entry in fs::read_dir(&self.dir).map_err(|e| Error::io(&self.dir, e))? {
            let entry = entry.map_err(|e| Error::io(&self.dir, e))?;
            let path = entry.path();
            if !path.is_file() || path.extension().map_or(true, |e| e != ARTIFACT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                artifacts.push(CompiledArtifact {
                    name: stem.to_string(),
                    output_path: path.clone(),
                });
            }
        }

        artifacts.sort_by(|a, b| a.output_path.cmp(&b.output_path));
        debug!(dir = %self.dir.display(), count = artifacts.len(), "listed build artifacts");
        Ok(artifacts)
    }
}
