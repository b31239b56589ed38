//! Compiled catalog: fully qualified name -> compiled type identifiers
//!
//! The resolution service only sees files inside the managed tree, so
//! artifacts are staged there first. The sequence is:
//!
//! 1. recreate the staging directory empty
//! 2. copy every artifact matching the name filter into staging
//! 3. refresh the index so the staged artifacts become inspectable
//! 4. recreate the plugins directory empty
//! 5. publish each staged artifact (and its `.meta` sidecar) to the plugins
//!    directory and enumerate the types the resolver finds inside it
//! 6. delete the staging directory and refresh again
//!
//! Step 6 is owned by [`StagingArea`]'s `Drop`, so it runs on every exit
//! path, including errors in steps 2-5.

use crate::fs::{copy_file, recreate_dir, remove_dir_if_exists, with_suffix};
use retarget_core::{
    AssetIndex, BuildInfo, Catalog, CatalogEntry, CatalogKind, CompiledArtifact, Result,
    TypeResolver,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Sidecar suffix the asset tracker writes next to indexed files.
pub const META_SUFFIX: &str = ".meta";

/// Scratch directory inside the managed tree, removed on drop.
///
/// Dropping deletes the directory and triggers a final refresh. Failures
/// during cleanup are logged; they cannot replace the run's own result.
pub struct StagingArea<'a> {
    path: PathBuf,
    index: &'a dyn AssetIndex,
}

impl<'a> StagingArea<'a> {
    /// Create `path` empty, replacing whatever was there.
    pub fn create(path: &Path, index: &'a dyn AssetIndex) -> Result<Self> {
        // guard first, so a failed recreate is still cleaned up
        let area = StagingArea {
            path: path.to_path_buf(),
            index,
        };
        recreate_dir(&area.path)?;
        debug!(path = %area.path.display(), "staging directory created");
        Ok(area)
    }

    /// Location of the staging directory
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagingArea<'_> {
    fn drop(&mut self) {
        if let Err(e) = remove_dir_if_exists(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to remove staging directory");
        }
        // the directory's own sidecar is left behind by the tracker
        if let Err(e) = remove_file_if_exists(&with_suffix(&self.path, META_SUFFIX)) {
            warn!(path = %self.path.display(), error = %e, "failed to remove staging sidecar");
        }
        if let Err(e) = self.index.refresh() {
            warn!(error = %e, "refresh after staging cleanup failed");
        }
    }
}

fn remove_file_if_exists(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Builds the compiled catalog from the build's artifacts
pub struct CompiledCatalogBuilder<'a> {
    resolver: &'a dyn TypeResolver,
    build: &'a dyn BuildInfo,
    index: &'a dyn AssetIndex,
    artifact_filter: &'a str,
}

impl<'a> CompiledCatalogBuilder<'a> {
    /// Create a builder using only artifacts whose name contains `artifact_filter`
    pub fn new(
        resolver: &'a dyn TypeResolver,
        build: &'a dyn BuildInfo,
        index: &'a dyn AssetIndex,
        artifact_filter: &'a str,
    ) -> Self {
        CompiledCatalogBuilder {
            resolver,
            build,
            index,
            artifact_filter,
        }
    }

    /// Matching artifacts, in the order the build reports them
    pub fn matching_artifacts(&self) -> Result<Vec<CompiledArtifact>> {
        Ok(self
            .build
            .compiled_artifacts()?
            .into_iter()
            .filter(|a| a.name.contains(self.artifact_filter))
            .collect())
    }

    /// Stage, index, publish and enumerate the matching artifacts.
    ///
    /// Precondition: `staging_dir` is inside the tree the index watches.
    /// Postcondition: `staging_dir` no longer exists and the index has been
    /// refreshed, whether or not this returns an error; `plugins_dir` holds
    /// exactly the published artifacts and their sidecars.
    ///
    /// # Errors
    ///
    /// Fails on any copy, refresh or resolver error, and on two artifacts
    /// containing the same fully qualified type name.
    pub fn build(&self, staging_dir: &Path, plugins_dir: &Path) -> Result<Catalog> {
        let artifacts = self.matching_artifacts()?;
        info!(
            count = artifacts.len(),
            filter = self.artifact_filter,
            "staging compiled artifacts"
        );

        let staging = StagingArea::create(staging_dir, self.index)?;
        for artifact in &artifacts {
            let staged = staging.path().join(artifact.file_name());
            copy_file(&artifact.output_path, &staged)?;
        }

        self.index.refresh()?;

        recreate_dir(plugins_dir)?;
        let mut catalog = Catalog::new(CatalogKind::Compiled);
        for artifact in &artifacts {
            let staged = staging.path().join(artifact.file_name());
            self.publish(&staged, plugins_dir)?;

            let types = self.resolver.artifact_types(&staged)?;
            debug!(artifact = %artifact.name, types = types.len(), "enumerated artifact");
            for resolved in types {
                catalog.insert(CatalogEntry::from(resolved))?;
            }
        }

        drop(staging);
        Ok(catalog)
    }

    fn publish(&self, staged: &Path, plugins_dir: &Path) -> Result<()> {
        let Some(file_name) = staged.file_name() else {
            return Ok(());
        };
        copy_file(staged, &plugins_dir.join(file_name))?;

        let sidecar = with_suffix(staged, META_SUFFIX);
        if sidecar.exists() {
            copy_file(&sidecar, &with_suffix(&plugins_dir.join(file_name), META_SUFFIX))?;
        }
        Ok(())
    }
}
