//! Structured document handling
//!
//! - [`classify`]: decides whether a file is a structured document (header sniff
//!   plus extension exclusions)
//! - [`extract`]: pulls the container id out of a reference record
//! - [`rewrite`]: line scanner that rewrites script reference records
//!
//! Only one record shape is recognized:
//!
//! ```text
//!   m_Script: {fileID: 11500000, guid: 83d9acc7968244a8886f3af591305bcb, type: 3}
//! ```
//!
//! This is not a YAML parser.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod classify;
pub mod extract;
pub mod rewrite;

pub use classify::{dotted_extension, has_document_header, Classifier, FileKind, DOCUMENT_HEADER};
pub use extract::{extract_container_id, ExtractError};
pub use rewrite::{DocumentRewriter, RewriteOutcome, SCRIPT_FIELD_MARKER, SCRIPT_SENTINEL};
