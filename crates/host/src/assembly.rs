//! Assembly layout of a project
//!
//! An `.asmdef` file makes its directory the root of a named assembly. A
//! script belongs to the assembly defined in its nearest ancestor
//! directory; scripts with no such ancestor fall into
//! [`DEFAULT_ASSEMBLY`].

use crate::walk::list_entries;
use retarget_core::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Assembly of scripts outside any assembly definition
pub const DEFAULT_ASSEMBLY: &str = "Assembly-CSharp";

/// Extension of assembly definition files (without the dot)
pub const ASMDEF_EXTENSION: &str = "asmdef";

#[derive(Debug, Deserialize)]
struct AssemblyDefinition {
    name: String,
}

/// Assembly definitions and scripts found under a root
#[derive(Debug, Default)]
pub struct AssemblyLayout {
    root: PathBuf,
    definitions: BTreeMap<PathBuf, String>,
    scripts: Vec<PathBuf>,
}

impl AssemblyLayout {
    /// Scan `root` for assembly definitions and files with `script_extension`.
    ///
    /// # Errors
    ///
    /// I/O failures, unreadable definitions, two definitions in one
    /// directory, and two definitions declaring the same name.
    pub fn scan(root: &Path, script_extension: &str) -> Result<Self> {
        let mut layout = AssemblyLayout {
            root: root.to_path_buf(),
            ..Default::default()
        };
        let mut seen: BTreeMap<String, PathBuf> = BTreeMap::new();

        for path in list_entries(root)?.into_iter().filter(|p| p.is_file()) {
            let ext = path.extension().and_then(|e| e.to_str());
            if ext == Some(script_extension) {
                layout.scripts.push(path);
            } else if ext == Some(ASMDEF_EXTENSION) {
                let name = read_definition(&path)?;
                if let Some(first) = seen.insert(name.clone(), path.clone()) {
                    return Err(Error::resolution(
                        &path,
                        format!("assembly '{}' is already defined by {}", name, first.display()),
                    ));
                }
                let dir = path.parent().unwrap_or(root).to_path_buf();
                if layout.definitions.insert(dir, name).is_some() {
                    return Err(Error::resolution(
                        &path,
                        "directory holds more than one assembly definition",
                    ));
                }
            }
        }

        debug!(
            root = %root.display(),
            assemblies = layout.definitions.len(),
            scripts = layout.scripts.len(),
            "scanned assembly layout"
        );
        Ok(layout)
    }

    /// Assembly `script` compiles into
    pub fn assembly_of(&self, script: &Path) -> &str {
        script
            .ancestors()
            .skip(1)
            .take_while(|dir| dir.starts_with(&self.root))
            .find_map(|dir| self.definitions.get(dir))
            .map_or(DEFAULT_ASSEMBLY, String::as_str)
    }

    /// Scripts compiled into `assembly`, in file-name order
    pub fn scripts_in<'a>(&'a self, assembly: &'a str) -> impl Iterator<Item = &'a Path> + 'a {
        self.scripts
            .iter()
            .map(PathBuf::as_path)
            .filter(move |s| self.assembly_of(s) == assembly)
    }

    /// Names of every defined assembly
    pub fn assemblies(&self) -> impl Iterator<Item = &str> {
        self.definitions.values().map(String::as_str)
    }
}

fn read_definition(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let def: AssemblyDefinition = serde_json::from_str(&text)
        .map_err(|e| Error::resolution(path, format!("invalid assembly definition: {}", e)))?;
    if def.name.is_empty() {
        return Err(Error::resolution(path, "assembly definition has an empty name"));
    }
    Ok(def.name)
}
