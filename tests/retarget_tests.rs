//! Facade-level tests
//!
//! Exercises the public API the way a caller would: load config from a
//! project directory, run with the filesystem host, inspect the report.

use retarget::{
    Error, MetaFile, ProjectHost, RetargetConfig, Retargeter, CONFIG_FILE_NAME, SCRIPT_LOCAL_ID,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// =============================================================================
// HELPERS
// =============================================================================

fn write(path: &Path, text: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(&root.join("Source/Lib/MixedReality.Lib.asmdef"), r#"{"name": "MixedReality.Lib"}"#);
    write(&root.join("Source/Lib/Widget.cs"), "namespace Lib { public class Widget {} }");
    write(
        &root.join("Source/Lib/Widget.cs.meta"),
        "guid: 99999999999999999999999999999999\n",
    );
    write(
        &root.join("Source/Scene.unity"),
        &format!(
            "%YAML 1.1\r\n  m_Script: {{fileID: {}, guid: 99999999999999999999999999999999, type: 3}}\r\n",
            SCRIPT_LOCAL_ID
        ),
    );
    write(&root.join("Bin/MixedReality.Lib.dll"), "MZ");
    write(
        &root.join(CONFIG_FILE_NAME),
        "assets_dir = \"Source\"\nbuild_dir = \"Bin\"\noutput_dir = \"Out\"\nplugins_dir = \"Plugins\"\n",
    );
    dir
}

fn run(dir: &Path) -> Result<retarget::RetargetReport, Error> {
    let config = RetargetConfig::load(dir, None)?;
    let paths = config.resolve(dir)?;
    let host = ProjectHost::new(&paths.assets_dir, &paths.build_dir);
    Retargeter::new(&config, dir, &host, &host, &host)?.run()
}

// =============================================================================
// TESTS
// =============================================================================

#[test]
fn configured_directories_are_used() {
    let dir = project();
    let report = run(dir.path()).unwrap();

    assert_eq!(report.remapped, 1);
    assert_eq!(report.transform.references_rewritten, 1);
    assert!(dir.path().join("Plugins/MixedReality.Lib.dll").exists());
    assert!(!dir.path().join("Source/PackagedAssemblies").exists());

    let guid = MetaFile::read(&dir.path().join("Plugins/MixedReality.Lib.dll"))
        .unwrap()
        .unwrap()
        .guid;
    let out = fs::read_to_string(dir.path().join("Out/Scene.unity")).unwrap();
    assert!(out.starts_with("%YAML 1.1\r\n  m_Script: {fileID: "));
    assert!(out.contains(&format!("guid: {}, type: 3}}\r\n", guid)));
    assert!(!out.contains("99999999999999999999999999999999"));
}

#[test]
fn overlapping_output_is_rejected() {
    let dir = project();
    write(
        &dir.path().join(CONFIG_FILE_NAME),
        "assets_dir = \"Source\"\noutput_dir = \"Source/Out\"\n",
    );
    assert!(matches!(run(dir.path()), Err(Error::Config(_))));
}

#[test]
fn malformed_document_is_fatal() {
    let dir = project();
    write(
        &dir.path().join("Source/Broken.prefab"),
        "%YAML 1.1\nvalue: {fileID: 11500000}\n",
    );
    let err = run(dir.path()).unwrap_err();
    assert!(err.is_parse());
    assert!(!dir.path().join("Source/PackagedAssemblies").exists());
}

#[test]
fn plugins_dir_inside_project_tree_leaves_it_untouched() {
    let dir = project();
    write(&dir.path().join("Source/Precious.prefab"), "%YAML 1.1\n");
    for plugins in ["Source", "."] {
        write(
            &dir.path().join(CONFIG_FILE_NAME),
            &format!("assets_dir = \"Source\"\nbuild_dir = \"Bin\"\nplugins_dir = \"{}\"\n", plugins),
        );
        assert!(matches!(run(dir.path()), Err(Error::Config(_))));
        assert!(dir.path().join("Source/Precious.prefab").exists());
    }
}

#[test]
fn output_dir_reaching_back_into_project_is_rejected() {
    let dir = project();
    let name = dir.path().file_name().unwrap().to_string_lossy().into_owned();
    write(
        &dir.path().join(CONFIG_FILE_NAME),
        &format!("assets_dir = \"Source\"\noutput_dir = \"../{}\"\n", name),
    );
    assert!(matches!(run(dir.path()), Err(Error::Config(_))));
    assert!(dir.path().join("Source/Lib/Widget.cs").exists());
}
