//! Remap table builder: joins the source and compiled catalogs by name

use retarget_core::{Catalog, Diagnostic, RemapTable, RemapTarget, Result};
use tracing::warn;

/// Join `source` and `compiled` on fully qualified name.
///
/// Every source entry with a compiled counterpart contributes
/// `source container id -> (compiled container id, compiled local id)`.
/// Source entries without one are reported as
/// [`Diagnostic::MissingCompiledType`] and left out; documents referencing
/// them keep their original reference.
pub fn build_remap_table(
    source: &Catalog,
    compiled: &Catalog,
) -> Result<(RemapTable, Vec<Diagnostic>)> {
    let mut table = RemapTable::new();
    let mut diagnostics = Vec::new();

    for entry in source.iter() {
        let name = entry.identity.full_name();
        match compiled.get(name) {
            Some(compiled_entry) => {
                table.insert(
                    entry.reference.container_id.clone(),
                    RemapTarget::from(&compiled_entry.reference),
                )?;
            }
            None => {
                warn!(
                    type_name = name,
                    guid = %entry.reference.container_id,
                    "can't find a compiled version of the script"
                );
                diagnostics.push(Diagnostic::MissingCompiledType {
                    name: name.to_string(),
                    container_id: entry.reference.container_id.clone(),
                });
            }
        }
    }

    Ok((table, diagnostics))
}
