//! Filesystem host for retargeting
//!
//! Implements the pipeline's collaborator traits on a project directory:
//!
//! - [`MetaFile`]: `.meta` sidecars carrying each asset's container id
//! - [`find_declaration`]: the public type a script declares
//! - [`AssemblyLayout`]: which assembly each script compiles into
//! - [`compiled_file_id`]: local ids of types inside compiled binaries
//! - [`BuildDirectory`]: the build's binaries
//! - [`MetaIndex`]: sidecar refresh over the assets tree
//! - [`ProjectHost`]: all of the above behind one value

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assembly;
pub mod build;
pub mod file_id;
pub mod index;
pub mod meta;
pub mod project;
pub mod script;
pub mod walk;

pub use assembly::{AssemblyLayout, ASMDEF_EXTENSION, DEFAULT_ASSEMBLY};
pub use build::{BuildDirectory, ARTIFACT_EXTENSION};
pub use file_id::compiled_file_id;
pub use index::{MetaIndex, RefreshSummary};
pub use meta::{MetaFile, META_SUFFIX};
pub use project::{script_declaration, ProjectHost};
pub use script::{find_declaration, Declaration};
