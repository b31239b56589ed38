//! Retarget configuration via `retarget.toml`
//!
//! Loaded once at start and passed by reference into the pipeline. The file
//! lives in the project directory; when it is absent every field takes its
//! default. Relative paths are resolved against the project directory.

use retarget_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Config file name placed in the project directory.
pub const CONFIG_FILE_NAME: &str = "retarget.toml";

/// Extensions classified opaque without sniffing their content.
pub const DEFAULT_EXCLUDED_EXTENSIONS: &[&str] = &[
    ".jpg", ".csv", ".meta", ".pfx", ".txt", ".nuspec", ".asmdef", ".yml", ".cs", ".md", ".json",
    ".ttf", ".png", ".shader", ".wav", ".bin", ".gltf", ".glb", ".fbx", ".FBX", ".pdf", ".cginc",
];

/// Path suffixes never copied to the output tree.
pub const DEFAULT_EXCLUDED_COPY_SUFFIXES: &[&str] = &[".cs", ".cs.meta"];

/// Retarget configuration loaded from `retarget.toml`.
///
/// # Example
///
/// ```toml
/// assets_dir = "Assets"
/// output_dir = "NuGet/Output"
/// artifact_filter = "MixedReality"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetargetConfig {
    /// Project root that is scanned and copied.
    pub assets_dir: PathBuf,
    /// Root of the output tree.
    pub output_dir: PathBuf,
    /// Where compiled artifacts (and their sidecars) are published.
    pub plugins_dir: PathBuf,
    /// Name of the staging subdirectory created inside `assets_dir`.
    pub staging_dir: String,
    /// Substring an artifact name must contain to be retargeted to.
    pub artifact_filter: String,
    /// Where the build writes compiled artifacts.
    pub build_dir: PathBuf,
    /// Extensions (with leading dot) never sniffed for the document header.
    pub excluded_extensions: Vec<String>,
    /// Path suffixes never copied to the output tree.
    pub excluded_copy_suffixes: Vec<String>,
}

impl Default for RetargetConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("Assets"),
            output_dir: PathBuf::from("NuGet/Output"),
            plugins_dir: PathBuf::from("NuGet/Plugins"),
            staging_dir: "PackagedAssemblies".to_string(),
            artifact_filter: "MixedReality".to_string(),
            build_dir: PathBuf::from("Library/ScriptAssemblies"),
            excluded_extensions: DEFAULT_EXCLUDED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            excluded_copy_suffixes: DEFAULT_EXCLUDED_COPY_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Absolute locations derived from a config and a project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Project directory everything else is relative to.
    pub project_dir: PathBuf,
    /// Project root that is scanned and copied.
    pub assets_dir: PathBuf,
    /// Root of the output tree.
    pub output_dir: PathBuf,
    /// Compiled artifact output directory.
    pub plugins_dir: PathBuf,
    /// Staging directory, always inside `assets_dir`.
    pub staging_dir: PathBuf,
    /// Build output directory.
    pub build_dir: PathBuf,
}

impl RetargetConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Retarget configuration
#
# All paths are relative to the project directory.

# Tree that is scanned and copied.
assets_dir = "Assets"

# Output tree; deleted and recreated on every run.
output_dir = "NuGet/Output"

# Compiled artifacts and their .meta sidecars are published here.
plugins_dir = "NuGet/Plugins"

# Scratch directory created inside assets_dir while artifacts are indexed.
staging_dir = "PackagedAssemblies"

# Only artifacts whose name contains this substring are used.
artifact_filter = "MixedReality"

# Where the build writes compiled artifacts (*.dll).
build_dir = "Library/ScriptAssemblies"

# Files with these extensions are copied without looking for the document header.
# excluded_extensions = [".jpg", ".png", ".meta", ".cs"]

# Files ending with these suffixes are never copied.
# excluded_copy_suffixes = [".cs", ".cs.meta"]
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: RetargetConfig = toml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `explicit` if given, else `retarget.toml` in the project
    /// directory if present, else the defaults.
    pub fn load(project_dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let path = project_dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `true` if the file was created.
    pub fn write_default_if_missing(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        std::fs::write(path, Self::default_toml()).map_err(|e| Error::io(path, e))?;
        Ok(true)
    }

    /// Check values that would make a run unsafe.
    pub fn validate(&self) -> Result<()> {
        let mut components = Path::new(&self.staging_dir).components();
        let single_normal = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_normal {
            return Err(Error::Config(format!(
                "staging_dir must be a single directory name, got '{}'",
                self.staging_dir
            )));
        }
        if self.artifact_filter.is_empty() {
            return Err(Error::Config(
                "artifact_filter must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve every path against `project_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory that is deleted and recreated during
    /// a run would contain, or live inside, the scanned tree, the build
    /// output or the other recreated directory.
    pub fn resolve(&self, project_dir: &Path) -> Result<ResolvedPaths> {
        let assets_dir = project_dir.join(&self.assets_dir);
        let paths = ResolvedPaths {
            project_dir: project_dir.to_path_buf(),
            staging_dir: assets_dir.join(&self.staging_dir),
            output_dir: project_dir.join(&self.output_dir),
            plugins_dir: project_dir.join(&self.plugins_dir),
            build_dir: project_dir.join(&self.build_dir),
            assets_dir,
        };

        let assets = normalize(&paths.assets_dir)?;
        let output = normalize(&paths.output_dir)?;
        let plugins = normalize(&paths.plugins_dir)?;
        let build = normalize(&paths.build_dir)?;
        check_disjoint(("output_dir", &output), ("assets_dir", &assets))?;
        check_disjoint(("output_dir", &output), ("build_dir", &build))?;
        check_disjoint(("plugins_dir", &plugins), ("assets_dir", &assets))?;
        check_disjoint(("plugins_dir", &plugins), ("output_dir", &output))?;
        check_disjoint(("plugins_dir", &plugins), ("build_dir", &build))?;
        Ok(paths)
    }
}

fn check_disjoint(a: (&str, &Path), b: (&str, &Path)) -> Result<()> {
    if a.1.starts_with(b.1) || b.1.starts_with(a.1) {
        return Err(Error::Config(format!(
            "{} '{}' overlaps {} '{}'",
            a.0,
            a.1.display(),
            b.0,
            b.1.display()
        )));
    }
    Ok(())
}

/// Absolute form of `path` with `.` and `..` removed and symlinks in its
/// existing prefix resolved. Nothing after that prefix needs to exist.
fn normalize(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = std::env::current_dir().map_err(|e| Error::io(path, e))?;
        cwd.join(path)
    };

    let mut lexical = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                lexical.pop();
            }
            other => lexical.push(other.as_os_str()),
        }
    }

    let mut existing = lexical.as_path();
    let mut missing = Vec::new();
    loop {
        if let Ok(real) = existing.canonicalize() {
            let mut out = real;
            out.extend(missing.iter().rev());
            return Ok(out);
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name);
                existing = parent;
            }
            _ => return Ok(lexical),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_documented_values() {
        let config = RetargetConfig::default();
        assert_eq!(config.assets_dir, PathBuf::from("Assets"));
        assert_eq!(config.staging_dir, "PackagedAssemblies");
        assert_eq!(config.artifact_filter, "MixedReality");
        assert!(config.excluded_extensions.iter().any(|e| e == ".FBX"));
        assert_eq!(config.excluded_copy_suffixes, vec![".cs", ".cs.meta"]);
    }

    #[test]
    fn default_toml_parses_to_default() {
        let config: RetargetConfig = toml::from_str(RetargetConfig::default_toml()).unwrap();
        assert_eq!(config, RetargetConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: RetargetConfig =
            toml::from_str("artifact_filter = \"Contoso\"\noutput_dir = \"out\"").unwrap();
        assert_eq!(config.artifact_filter, "Contoso");
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.plugins_dir, PathBuf::from("NuGet/Plugins"));
    }

    #[test]
    fn write_default_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        std::fs::write(&path, "artifact_filter = \"Mine\"\n").unwrap();
        assert!(!RetargetConfig::write_default_if_missing(&path).unwrap());

        let config = RetargetConfig::from_file(&path).unwrap();
        assert_eq!(config.artifact_filter, "Mine");
    }

    #[test]
    fn load_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let config = RetargetConfig::load(dir.path(), None).unwrap();
        assert_eq!(config, RetargetConfig::default());

        assert!(RetargetConfig::write_default_if_missing(&dir.path().join(CONFIG_FILE_NAME)).unwrap());
        let config = RetargetConfig::load(dir.path(), None).unwrap();
        assert_eq!(config, RetargetConfig::default());
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "staging_dir = [").unwrap();
        assert!(matches!(
            RetargetConfig::from_file(&path),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn staging_dir_must_be_single_component() {
        for bad in ["", "a/b", "..", "/abs"] {
            let config = RetargetConfig {
                staging_dir: bad.to_string(),
                ..RetargetConfig::default()
            };
            assert!(config.validate().is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn empty_filter_is_rejected() {
        let config = RetargetConfig {
            artifact_filter: String::new(),
            ..RetargetConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn resolve_joins_paths_and_rejects_overlap() {
        let project = Path::new("/proj");
        let paths = RetargetConfig::default().resolve(project).unwrap();
        assert_eq!(paths.assets_dir, PathBuf::from("/proj/Assets"));
        assert_eq!(paths.staging_dir, PathBuf::from("/proj/Assets/PackagedAssemblies"));
        assert_eq!(paths.output_dir, PathBuf::from("/proj/NuGet/Output"));

        let nested = RetargetConfig {
            output_dir: PathBuf::from("Assets/Out"),
            ..RetargetConfig::default()
        };
        assert!(matches!(nested.resolve(project), Err(Error::Config(_))));
    }

    #[test]
    fn plugins_dir_may_not_overlap_recreated_or_scanned_dirs() {
        let project = Path::new("/proj");
        for plugins in ["Assets", ".", "Assets/Plugins", "NuGet", "NuGet/Output/Plugins", "Library"] {
            let config = RetargetConfig {
                plugins_dir: PathBuf::from(plugins),
                ..RetargetConfig::default()
            };
            assert!(
                matches!(config.resolve(project), Err(Error::Config(_))),
                "accepted plugins_dir {:?}",
                plugins
            );
        }
    }

    #[test]
    fn parent_components_cannot_hide_overlap() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("proj");
        std::fs::create_dir_all(project.join("Assets")).unwrap();

        for output in ["../proj", "NuGet/../Assets/Out", "./Assets"] {
            let config = RetargetConfig {
                output_dir: PathBuf::from(output),
                ..RetargetConfig::default()
            };
            assert!(
                matches!(config.resolve(&project), Err(Error::Config(_))),
                "accepted output_dir {:?}",
                output
            );
        }

        let sibling = RetargetConfig {
            output_dir: PathBuf::from("../Out"),
            ..RetargetConfig::default()
        };
        assert!(sibling.resolve(&project).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_output_into_assets_is_rejected() {
        let dir = TempDir::new().unwrap();
        let project = dir.path();
        std::fs::create_dir_all(project.join("Assets")).unwrap();
        std::os::unix::fs::symlink(project.join("Assets"), project.join("Link")).unwrap();

        let config = RetargetConfig {
            output_dir: PathBuf::from("Link/Out"),
            ..RetargetConfig::default()
        };
        assert!(matches!(config.resolve(project), Err(Error::Config(_))));
    }
}
