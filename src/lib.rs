//! Retarget - rewrite asset script references to compiled assemblies
//!
//! Projects that ship scripts as compiled binaries must repoint every
//! serialized reference from the script's container id to the binary's
//! container id and the type's local id inside it. This crate does that
//! over a whole project tree, writing a rewritten copy to an output tree.
//!
//! # Quick Start
//!
//! ```ignore
//! use retarget::{ProjectHost, RetargetConfig, Retargeter};
//!
//! let config = RetargetConfig::load(project_dir, None)?;
//! let paths = config.resolve(project_dir)?;
//! let host = ProjectHost::new(&paths.assets_dir, &paths.build_dir);
//! let report = Retargeter::new(&config, project_dir, &host, &host, &host)?.run()?;
//! ```
//!
//! # Architecture
//!
//! - `retarget-core`: identifiers, catalogs, errors, collaborator traits
//! - `retarget-document`: document classification and reference rewriting
//! - `retarget-engine`: catalog building, remap join, tree transformation
//! - `retarget-host`: filesystem implementations of the collaborator traits

pub use retarget_core::*;
pub use retarget_document::{Classifier, DocumentRewriter, FileKind, RewriteOutcome};
pub use retarget_engine::{
    build_remap_table, build_source_catalog, CompiledCatalogBuilder, ResolvedPaths,
    RetargetConfig, RetargetReport, Retargeter, TransformSummary, TreeTransformer,
    CONFIG_FILE_NAME,
};
pub use retarget_host::{BuildDirectory, MetaFile, MetaIndex, ProjectHost};
