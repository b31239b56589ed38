//! Collaborator traits
//!
//! The pipeline does not compile code, track assets or index the project
//! itself. It talks to those services through the traits below, so hosts
//! can be swapped (the filesystem host, in-memory fakes in tests) without
//! touching the pipeline.
//!
//! Thread safety: implementations must be `Send + Sync`; the pipeline holds
//! them by shared reference for the whole run.

use crate::error::Result;
use crate::types::{StableReference, TypeIdentity};
use std::path::{Path, PathBuf};

/// A type declaration as reported by a [`TypeResolver`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    /// Simple type name
    pub name: String,
    /// Declaring namespace, empty for the global namespace
    pub namespace: String,
    /// Stable identifiers of the declaration
    pub reference: StableReference,
}

impl ResolvedType {
    /// Fully qualified identity of the type
    pub fn identity(&self) -> TypeIdentity {
        TypeIdentity::new(&self.namespace, &self.name)
    }
}

/// A compiled binary exposed by the build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledArtifact {
    /// Assembly name, e.g. `Microsoft.MixedReality.Toolkit`
    pub name: String,
    /// Where the build wrote the binary
    pub output_path: PathBuf,
}

impl CompiledArtifact {
    /// File name the artifact is staged under
    pub fn file_name(&self) -> String {
        format!("{}.dll", self.name)
    }
}

/// Resolves files to declared types and their stable identifiers
pub trait TypeResolver: Send + Sync {
    /// Resolve a script file to the public type it declares
    ///
    /// Returns `Ok(None)` when the file declares no resolvable type; the
    /// caller records a warning and moves on.
    ///
    /// # Errors
    ///
    /// Returns an error only when the resolver itself fails.
    fn resolve_script(&self, path: &Path) -> Result<Option<ResolvedType>>;

    /// Enumerate the types contained in a compiled artifact
    ///
    /// `path` is the artifact's location inside the managed tree. The
    /// artifact must have been made visible by [`AssetIndex::refresh`]
    /// before this is called.
    fn artifact_types(&self, path: &Path) -> Result<Vec<ResolvedType>>;
}

/// Build/compilation info provider
pub trait BuildInfo: Send + Sync {
    /// Every compiled artifact the build produced
    fn compiled_artifacts(&self) -> Result<Vec<CompiledArtifact>>;
}

/// Re-index trigger of the asset-tracking service
pub trait AssetIndex: Send + Sync {
    /// Make files added to or removed from the managed tree visible
    fn refresh(&self) -> Result<()>;
}
