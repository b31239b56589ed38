//! Run reports

use retarget_core::Diagnostic;
use serde::Serialize;
use std::collections::BTreeSet;

/// What one tree transformation did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformSummary {
    /// Structured documents processed
    pub documents: usize,
    /// Script references replaced across all documents
    pub references_rewritten: usize,
    /// Opaque files copied byte for byte
    pub files_copied: usize,
    /// Files left out of the output tree by suffix
    pub files_skipped: usize,
    /// Extensions of opaque files that are not in the excluded set
    pub unrecognized_extensions: BTreeSet<String>,
    /// References left unchanged because they are not remapped
    pub diagnostics: Vec<Diagnostic>,
}

/// Outcome of a full retarget run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RetargetReport {
    /// Types in the source catalog
    pub script_types: usize,
    /// Types in the compiled catalog
    pub compiled_types: usize,
    /// Entries in the remap table
    pub remapped: usize,
    /// Catalog-phase diagnostics (unresolved scripts, missing compiled types)
    pub diagnostics: Vec<Diagnostic>,
    /// Transformation results
    pub transform: TransformSummary,
}

impl RetargetReport {
    /// Every diagnostic of the run, catalog phase first
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.diagnostics
            .iter()
            .chain(self.transform.diagnostics.iter())
    }

    /// True if the run succeeded with warnings
    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retarget_core::ContainerId;
    use std::path::PathBuf;

    #[test]
    fn warnings_cover_both_phases() {
        let mut report = RetargetReport::default();
        assert!(!report.has_warnings());

        report.diagnostics.push(Diagnostic::UnresolvedScript {
            path: PathBuf::from("A.cs"),
        });
        report.transform.diagnostics.push(Diagnostic::MissingRemap {
            path: PathBuf::from("B.prefab"),
            line: 3,
            container_id: ContainerId::from("abc"),
        });

        assert!(report.has_warnings());
        let all: Vec<_> = report.warnings().collect();
        assert_eq!(all.len(), 2);
        assert!(matches!(all[0], Diagnostic::UnresolvedScript { .. }));
    }
}
