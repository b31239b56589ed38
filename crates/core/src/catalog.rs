//! Catalogs and the remap table
//!
//! A [`Catalog`] is a name-keyed table of discovered type declarations.
//! Two are built per run (source scripts and compiled artifacts); they are
//! never merged in place, only joined into a fresh [`RemapTable`].

use crate::error::{Error, Result};
use crate::traits::ResolvedType;
use crate::types::{ContainerId, StableReference, TypeIdentity};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Which side of the join a catalog describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatalogKind {
    /// Human-authored script files
    Source,
    /// Types found inside compiled artifacts
    Compiled,
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogKind::Source => f.write_str("source"),
            CatalogKind::Compiled => f.write_str("compiled"),
        }
    }
}

/// One discovered type declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Join key
    pub identity: TypeIdentity,
    /// Where the declaration lives
    pub reference: StableReference,
    /// Simple type name
    pub display_name: String,
    /// Declaring namespace, empty for the global namespace
    pub namespace_name: String,
}

impl From<ResolvedType> for CatalogEntry {
    fn from(resolved: ResolvedType) -> Self {
        CatalogEntry {
            identity: TypeIdentity::new(&resolved.namespace, &resolved.name),
            reference: resolved.reference,
            display_name: resolved.name,
            namespace_name: resolved.namespace,
        }
    }
}

/// Name-keyed table of type declarations
///
/// Iteration is ordered by fully qualified name so that runs are reproducible.
#[derive(Debug, Clone)]
pub struct Catalog {
    kind: CatalogKind,
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new(kind: CatalogKind) -> Self {
        Catalog {
            kind,
            entries: BTreeMap::new(),
        }
    }

    /// Which side of the join this catalog describes
    pub fn kind(&self) -> CatalogKind {
        self.kind
    }

    /// Insert an entry
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateType`] if the fully qualified name is
    /// already present. The existing entry is kept.
    pub fn insert(&mut self, entry: CatalogEntry) -> Result<()> {
        let name = entry.identity.full_name().to_string();
        if let Some(existing) = self.entries.get(&name) {
            return Err(Error::DuplicateType {
                catalog: self.kind,
                name,
                first: existing.reference.container_id.clone(),
                second: entry.reference.container_id,
            });
        }
        self.entries.insert(name, entry);
        Ok(())
    }

    /// Look up an entry by fully qualified name
    pub fn get(&self, full_name: &str) -> Option<&CatalogEntry> {
        self.entries.get(full_name)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the catalog has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in name order
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> + '_ {
        self.entries.values()
    }
}

/// Replacement identifiers for one script container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemapTarget {
    /// Container of the compiled artifact
    pub container_id: ContainerId,
    /// Type id inside the compiled artifact
    pub local_id: i64,
}

impl From<&StableReference> for RemapTarget {
    fn from(reference: &StableReference) -> Self {
        RemapTarget {
            container_id: reference.container_id.clone(),
            local_id: reference.local_id,
        }
    }
}

/// Old container id -> replacement identifiers
///
/// Built once per run and read-only afterwards, so it can be shared across
/// document tasks by reference.
#[derive(Debug, Clone, Default)]
pub struct RemapTable {
    entries: HashMap<ContainerId, RemapTarget>,
}

impl RemapTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mapping
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateRemap`] if `old` is already mapped.
    pub fn insert(&mut self, old: ContainerId, target: RemapTarget) -> Result<()> {
        if self.entries.contains_key(&old) {
            return Err(Error::DuplicateRemap { container_id: old });
        }
        self.entries.insert(old, target);
        Ok(())
    }

    /// Look up the replacement for an old container id
    pub fn get(&self, old: &str) -> Option<&RemapTarget> {
        self.entries.get(&ContainerId::from(old))
    }

    /// True if `old` is mapped
    pub fn contains(&self, old: &str) -> bool {
        self.get(old).is_some()
    }

    /// Number of mappings
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table has no mappings
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All mappings, unordered
    pub fn iter(&self) -> impl Iterator<Item = (&ContainerId, &RemapTarget)> + '_ {
        self.entries.iter()
    }
}
