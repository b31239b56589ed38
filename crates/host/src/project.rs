//! A project on disk as the pipeline's collaborator
//!
//! `ProjectHost` answers all three collaborator traits from the files of
//! one project:
//! - scripts resolve through their sidecar and their declaration
//! - artifacts enumerate the scripts of the assembly they are named after
//! - the build is a directory of binaries
//! - refresh is a sidecar sweep of the assets tree

use crate::assembly::AssemblyLayout;
use crate::build::BuildDirectory;
use crate::file_id::compiled_file_id;
use crate::index::MetaIndex;
use crate::meta::MetaFile;
use crate::script::{find_declaration, Declaration};
use once_cell::sync::OnceCell;
use retarget_core::{
    AssetIndex, BuildInfo, CompiledArtifact, Error, ResolvedType, Result, StableReference,
    TypeResolver, SCRIPT_EXTENSION, SCRIPT_LOCAL_ID,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Filesystem collaborator for one project
pub struct ProjectHost {
    assets_dir: PathBuf,
    build: BuildDirectory,
    index: MetaIndex,
    // scripts do not move during a run; only binaries are staged
    layout: OnceCell<AssemblyLayout>,
}

impl ProjectHost {
    /// Host the project whose assets live in `assets_dir` and whose build
    /// writes binaries to `build_dir`
    pub fn new(assets_dir: impl Into<PathBuf>, build_dir: impl Into<PathBuf>) -> Self {
        let assets_dir = assets_dir.into();
        ProjectHost {
            index: MetaIndex::new(assets_dir.clone()),
            build: BuildDirectory::new(build_dir),
            assets_dir,
            layout: OnceCell::new(),
        }
    }

    /// Root of the assets tree
    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }

    /// Assembly layout of the assets tree, scanned on first use
    pub fn layout(&self) -> Result<&AssemblyLayout> {
        self.layout
            .get_or_try_init(|| AssemblyLayout::scan(&self.assets_dir, SCRIPT_EXTENSION))
    }
}

/// The public type a script declares under its own file stem
pub fn script_declaration(script: &Path) -> Result<Option<Declaration>> {
    let Some(stem) = script.file_stem().and_then(|s| s.to_str()) else {
        return Ok(None);
    };
    let bytes = fs::read(script).map_err(|e| Error::io(script, e))?;
    Ok(find_declaration(&String::from_utf8_lossy(&bytes), stem))
}

impl TypeResolver for ProjectHost {
    fn resolve_script(&self, path: &Path) -> Result<Option<ResolvedType>> {
        let Some(meta) = MetaFile::read(path)? else {
            debug!(path = %path.display(), "script has no sidecar");
            return Ok(None);
        };
        Ok(script_declaration(path)?.map(|decl| ResolvedType {
            name: decl.name,
            namespace: decl.namespace,
            reference: StableReference::new(meta.guid, SCRIPT_LOCAL_ID),
        }))
    }

    fn artifact_types(&self, path: &Path) -> Result<Vec<ResolvedType>> {
        let assembly = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::resolution(path, "artifact has no file name"))?;
        let meta = MetaFile::read(path)?
            .ok_or_else(|| Error::resolution(path, "artifact has no sidecar; it was never indexed"))?;

        let mut types = Vec::new();
        for script in self.layout()?.scripts_in(assembly) {
            match script_declaration(script)? {
                Some(decl) => types.push(ResolvedType {
                    reference: StableReference::new(
                        meta.guid.clone(),
                        compiled_file_id(&decl.namespace, &decl.name),
                    ),
                    name: decl.name,
                    namespace: decl.namespace,
                }),
                None => debug!(path = %script.display(), "no public type named after script"),
            }
        }
        Ok(types)
    }
}

impl BuildInfo for ProjectHost {
    fn compiled_artifacts(&self) -> Result<Vec<CompiledArtifact>> {
        self.build.compiled_artifacts()
    }
}

impl AssetIndex for ProjectHost {
    fn refresh(&self) -> Result<()> {
        self.index.refresh()
    }
}
