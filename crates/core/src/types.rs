//! Identifier types
//!
//! This module defines the identifiers assigned by the asset-tracking service:
//! - ContainerId: stable per-file identifier, independent of file path
//! - StableReference: container id + local id of one declared component
//! - TypeIdentity: fully qualified type name, the join key between catalogs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Local id every script asset uses for its declared type.
///
/// Inside documents this value marks a reference record as a script
/// reference; it is never rewritten as a sentinel, only replaced along with
/// the whole record.
pub const SCRIPT_LOCAL_ID: i64 = 11_500_000;

/// Extension of human-authored script files (without the dot).
pub const SCRIPT_EXTENSION: &str = "cs";

/// Stable per-file identifier assigned by the asset-tracking service
///
/// Usually a 32-character hexadecimal token. The value is opaque: it is
/// compared exactly and never normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContainerId(String);

impl ContainerId {
    /// Wrap a raw identifier string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContainerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ContainerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifies one declared component within a container file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StableReference {
    /// Container (file) the component lives in
    pub container_id: ContainerId,
    /// Component id, unique within the container
    pub local_id: i64,
}

impl StableReference {
    /// Create a reference from its two halves
    pub fn new(container_id: impl Into<ContainerId>, local_id: i64) -> Self {
        Self {
            container_id: container_id.into(),
            local_id,
        }
    }
}

impl fmt::Display for StableReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.container_id, self.local_id)
    }
}

/// Fully qualified type name (`Namespace.Name`, or `Name` in the global namespace)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeIdentity {
    full_name: String,
}

impl TypeIdentity {
    /// Build the identity of `name` declared in `namespace`
    ///
    /// An empty namespace denotes the global namespace.
    pub fn new(namespace: &str, name: &str) -> Self {
        let full_name = if namespace.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", namespace, name)
        };
        Self { full_name }
    }

    /// The fully qualified name
    pub fn full_name(&self) -> &str {
        &self.full_name
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}
