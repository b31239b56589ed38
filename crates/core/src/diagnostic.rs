//! Non-fatal run diagnostics
//!
//! Conditions that leave content unchanged and let the run continue. They
//! are logged where they happen and also returned to the caller, so a run
//! that "succeeded with warnings" can be told apart from a clean one.

use crate::types::ContainerId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A non-fatal condition raised during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// A script file yields no resolvable type
    UnresolvedScript {
        /// Script path
        path: PathBuf,
    },

    /// A source type has no compiled counterpart; references to it stay unchanged
    MissingCompiledType {
        /// Fully qualified type name
        name: String,
        /// Container id of the script
        container_id: ContainerId,
    },

    /// A document references a script container absent from the remap table
    MissingRemap {
        /// Document path
        path: PathBuf,
        /// 1-based line of the record
        line: usize,
        /// Referenced container id
        container_id: ContainerId,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnresolvedScript { path } => {
                write!(f, "found script that we can't get type from: {}", path.display())
            }
            Diagnostic::MissingCompiledType { name, container_id } => write!(
                f,
                "can't find a compiled version of the script: {}; guid: {}",
                name, container_id
            ),
            Diagnostic::MissingRemap {
                path,
                line,
                container_id,
            } => write!(
                f,
                "{}:{}: couldn't find a script remap for {}",
                path.display(),
                line,
                container_id
            ),
        }
    }
}
