//! Tree transformer
//!
//! Produces a fresh output tree mirroring the project root:
//! - opaque files are copied byte for byte on the calling thread, except
//!   those with an excluded suffix, which are left out;
//! - structured documents are rewritten concurrently, one rayon task per
//!   document, after every output directory exists.
//!
//! Document tasks share only the read-only [`RemapTable`] and each writes
//! its own output file. The parallel collect joins all of them and
//! surfaces a failure if any task failed.

use crate::config::{ResolvedPaths, RetargetConfig};
use crate::fs::{copy_file, ensure_dir, recreate_dir};
use crate::report::TransformSummary;
use rayon::prelude::*;
use retarget_core::{Error, RemapTable, Result};
use retarget_document::{dotted_extension, Classifier, DocumentRewriter, FileKind, RewriteOutcome};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Copies and rewrites a project tree into an output tree
pub struct TreeTransformer<'a> {
    project_root: &'a Path,
    output_root: &'a Path,
    classifier: Classifier,
    excluded_copy_suffixes: &'a [String],
}

impl<'a> TreeTransformer<'a> {
    /// Create a transformer from explicit settings
    pub fn new(
        project_root: &'a Path,
        output_root: &'a Path,
        excluded_extensions: &[String],
        excluded_copy_suffixes: &'a [String],
    ) -> Self {
        TreeTransformer {
            project_root,
            output_root,
            classifier: Classifier::new(excluded_extensions.iter().cloned()),
            excluded_copy_suffixes,
        }
    }

    /// Create a transformer for the configured assets and output trees
    pub fn from_config(paths: &'a ResolvedPaths, config: &'a RetargetConfig) -> Self {
        Self::new(
            &paths.assets_dir,
            &paths.output_dir,
            &config.excluded_extensions,
            &config.excluded_copy_suffixes,
        )
    }

    /// Output location of `file`
    pub fn target_path(&self, file: &Path) -> Result<PathBuf> {
        file.strip_prefix(self.project_root)
            .map(|rel| self.output_root.join(rel))
            .map_err(|_| Error::PathOutsideRoot {
                path: file.to_path_buf(),
                root: self.project_root.to_path_buf(),
            })
    }

    /// True if `file` must not appear in the output tree
    pub fn is_excluded_from_copy(&self, file: &Path) -> bool {
        let name = file.to_string_lossy();
        self.excluded_copy_suffixes
            .iter()
            .any(|suffix| name.ends_with(suffix.as_str()))
    }

    /// Transform `files` (all under the project root) into the output tree.
    ///
    /// With `remap` absent this is a dry staging pass: documents are
    /// classified and copied verbatim, never scanned.
    ///
    /// The output tree is deleted first. On failure it is left partially
    /// written.
    pub fn transform(
        &self,
        files: &[PathBuf],
        remap: Option<&RemapTable>,
    ) -> Result<TransformSummary> {
        recreate_dir(self.output_root)?;

        let mut summary = TransformSummary::default();
        let mut documents = Vec::new();

        for file in files {
            let target = self.target_path(file)?;
            if let Some(parent) = target.parent() {
                ensure_dir(parent)?;
            }

            match self.classifier.classify(file).map_err(|e| Error::io(file, e))? {
                FileKind::Document => documents.push((file.as_path(), target)),
                FileKind::Opaque => {
                    if !self.classifier.is_excluded_extension(file) {
                        if let Some(ext) = dotted_extension(file) {
                            summary.unrecognized_extensions.insert(ext);
                        }
                    }
                    if self.is_excluded_from_copy(file) {
                        debug!(path = %file.display(), "skipped");
                        summary.files_skipped += 1;
                    } else {
                        copy_file(file, &target)?;
                        summary.files_copied += 1;
                    }
                }
            }
        }

        for ext in &summary.unrecognized_extensions {
            info!(extension = %ext, "not a structured document extension");
        }

        summary.documents = documents.len();
        info!(
            documents = documents.len(),
            copied = summary.files_copied,
            skipped = summary.files_skipped,
            "processing structured documents"
        );

        let outcomes: Vec<RewriteOutcome> = match remap {
            Some(remap) => documents
                .par_iter()
                .map(|(source, target)| DocumentRewriter::new(source, remap).rewrite_file(target))
                .collect::<Result<_>>()?,
            None => documents
                .par_iter()
                .map(|(source, target)| {
                    copy_file(source, target).map(|_| RewriteOutcome::default())
                })
                .collect::<Result<_>>()?,
        };

        for outcome in outcomes {
            summary.references_rewritten += outcome.references_rewritten;
            summary.diagnostics.extend(outcome.diagnostics);
        }

        Ok(summary)
    }
}
