//! Retarget engine
//!
//! Builds the source and compiled catalogs, joins them into a remap table
//! and applies it to every structured document of a project tree.
//!
//! # Quick Start
//!
//! ```ignore
//! use retarget_engine::{RetargetConfig, Retargeter};
//!
//! let config = RetargetConfig::load(project_dir, None)?;
//! let report = Retargeter::new(&config, project_dir, &resolver, &build, &index)?.run()?;
//! for warning in report.warnings() {
//!     println!("{}", warning);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compiled_catalog;
pub mod config;
pub mod fs;
pub mod pipeline;
pub mod remap;
pub mod report;
pub mod source_catalog;
pub mod transform;

pub use compiled_catalog::{CompiledCatalogBuilder, StagingArea, META_SUFFIX};
pub use config::{ResolvedPaths, RetargetConfig, CONFIG_FILE_NAME};
pub use pipeline::Retargeter;
pub use remap::build_remap_table;
pub use report::{RetargetReport, TransformSummary};
pub use source_catalog::{build_source_catalog, is_script};
pub use transform::TreeTransformer;
