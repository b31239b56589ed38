//! The retarget pipeline
//!
//! ```text
//! list files ─┬─> source catalog ───┐
//!             └─> compiled catalog ─┴─> remap table ─> tree transformer
//! ```
//!
//! The two catalog phases run one after the other on the calling thread;
//! neither depends on the other. Any fatal error aborts the rest of the run.

use crate::compiled_catalog::CompiledCatalogBuilder;
use crate::config::{ResolvedPaths, RetargetConfig};
use crate::fs::list_files;
use crate::remap::build_remap_table;
use crate::report::{RetargetReport, TransformSummary};
use crate::source_catalog::build_source_catalog;
use crate::transform::TreeTransformer;
use retarget_core::{AssetIndex, BuildInfo, Result, TypeResolver};
use std::path::{Path, PathBuf};
use tracing::info;

/// One configured retarget run over a project
pub struct Retargeter<'a> {
    config: &'a RetargetConfig,
    paths: ResolvedPaths,
    resolver: &'a dyn TypeResolver,
    build: &'a dyn BuildInfo,
    index: &'a dyn AssetIndex,
}

impl<'a> Retargeter<'a> {
    /// Validate `config` against `project_dir` and bind the collaborators
    pub fn new(
        config: &'a RetargetConfig,
        project_dir: &Path,
        resolver: &'a dyn TypeResolver,
        build: &'a dyn BuildInfo,
        index: &'a dyn AssetIndex,
    ) -> Result<Self> {
        config.validate()?;
        let paths = config.resolve(project_dir)?;
        Ok(Retargeter {
            config,
            paths,
            resolver,
            build,
            index,
        })
    }

    /// Resolved locations for this run
    pub fn paths(&self) -> &ResolvedPaths {
        &self.paths
    }

    /// Run every phase and write the output tree
    pub fn run(&self) -> Result<RetargetReport> {
        let files = self.project_files()?;
        info!(files = files.len(), root = %self.paths.assets_dir.display(), "scanning project");

        let (source, mut diagnostics) = build_source_catalog(&files, self.resolver)?;
        info!("Found {} script file references.", source.len());

        let compiled = CompiledCatalogBuilder::new(
            self.resolver,
            self.build,
            self.index,
            &self.config.artifact_filter,
        )
        .build(&self.paths.staging_dir, &self.paths.plugins_dir)?;
        info!("Found {} compiled class references.", compiled.len());

        let (remap, missing) = build_remap_table(&source, &compiled)?;
        diagnostics.extend(missing);
        info!(entries = remap.len(), "remap table built");

        // the refreshes may have added or removed sidecars
        let files = self.project_files()?;
        let transform = TreeTransformer::from_config(&self.paths, self.config)
            .transform(&files, Some(&remap))?;
        info!(
            documents = transform.documents,
            rewritten = transform.references_rewritten,
            "output tree written to {}",
            self.paths.output_dir.display()
        );

        Ok(RetargetReport {
            script_types: source.len(),
            compiled_types: compiled.len(),
            remapped: remap.len(),
            diagnostics,
            transform,
        })
    }

    /// Classify and copy the tree without building catalogs or rewriting
    pub fn run_dry(&self) -> Result<TransformSummary> {
        let files = self.project_files()?;
        TreeTransformer::from_config(&self.paths, self.config).transform(&files, None)
    }

    // A leftover staging directory from an interrupted run is not project content.
    fn project_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = list_files(&self.paths.assets_dir)?;
        files.retain(|f| !f.starts_with(&self.paths.staging_dir));
        Ok(files)
    }
}
