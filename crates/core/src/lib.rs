//! Core types and traits for script reference retargeting
//!
//! This crate defines the foundational types used throughout the system:
//! - ContainerId / StableReference: identifiers assigned by the asset tracker
//! - CatalogEntry / Catalog: name-keyed tables of discovered type declarations
//! - RemapTable: old container id -> new (container id, local id)
//! - Diagnostic: non-fatal conditions collected during a run
//! - Error / ParseError: fatal error hierarchy
//! - Traits: collaborator contracts (TypeResolver, BuildInfo, AssetIndex)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod diagnostic;
pub mod error;
pub mod traits;
pub mod types;

pub use catalog::{Catalog, CatalogEntry, CatalogKind, RemapTable, RemapTarget};
pub use diagnostic::Diagnostic;
pub use error::{Error, ParseError, Result};
pub use traits::{AssetIndex, BuildInfo, CompiledArtifact, ResolvedType, TypeResolver};
pub use types::{ContainerId, StableReference, TypeIdentity, SCRIPT_EXTENSION, SCRIPT_LOCAL_ID};
