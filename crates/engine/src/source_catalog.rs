//! Source catalog: fully qualified name -> script identifiers

use retarget_core::{
    Catalog, CatalogEntry, CatalogKind, Diagnostic, Result, TypeResolver, SCRIPT_EXTENSION,
};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// True if `path` is a script file
pub fn is_script(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == SCRIPT_EXTENSION)
}

/// Resolve every script in `files` and catalog the declared types.
///
/// Scripts that declare no resolvable type are reported as
/// [`Diagnostic::UnresolvedScript`] and skipped.
///
/// # Errors
///
/// Fails on a resolver error or on two scripts declaring the same fully
/// qualified name.
pub fn build_source_catalog(
    files: &[PathBuf],
    resolver: &dyn TypeResolver,
) -> Result<(Catalog, Vec<Diagnostic>)> {
    let mut catalog = Catalog::new(CatalogKind::Source);
    let mut diagnostics = Vec::new();

    for path in files.iter().filter(|p| is_script(p)) {
        match resolver.resolve_script(path)? {
            Some(resolved) => {
                debug!(path = %path.display(), name = %resolved.identity(), "resolved script");
                catalog.insert(CatalogEntry::from(resolved))?;
            }
            None => {
                warn!(path = %path.display(), "found script that we can't get type from");
                diagnostics.push(Diagnostic::UnresolvedScript { path: path.clone() });
            }
        }
    }

    Ok((catalog, diagnostics))
}
