//! Manifest staging against the real filesystem
//!
//! Same code paths as the fake-driven unit tests, run on temp directories.

use deploy_fs::manifests::{self, ManifestError};
use deploy_fs::{Context, FsConfig, HostFilesystem, WriteModes};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn create_manifest_dir(dir: &Path) {
    fs::write(dir.join("deployment.yaml"), "kind: Deployment\n").unwrap();
    fs::write(dir.join("service.yml"), "kind: Service\n").unwrap();
    fs::write(dir.join("README.md"), "# notes\n").unwrap();
    fs::create_dir(dir.join("overlays")).unwrap();
    fs::write(dir.join("overlays/patch.yaml"), "kind: Patch\n").unwrap();
}

#[test]
fn test_collect_and_save() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    create_manifest_dir(source.path());
    let out_dir = target.path().join("out/nested");
    let host = HostFilesystem::new();
    let ctx = Context::background();

    let collected = manifests::collect(&ctx, &host, source.path()).unwrap();
    let written =
        manifests::save(&ctx, &host, &out_dir, &collected, WriteModes::default()).unwrap();

    assert_eq!(
        written,
        vec![out_dir.join("deployment.yaml"), out_dir.join("service.yml")]
    );
    assert_eq!(
        fs::read_to_string(out_dir.join("service.yml")).unwrap(),
        "kind: Service\n"
    );
    assert!(!out_dir.join("README.md").exists());
    assert!(!out_dir.join("patch.yaml").exists());
}

#[test]
fn test_save_refuses_non_empty_output() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    create_manifest_dir(source.path());
    fs::write(target.path().join("stale.yaml"), "old").unwrap();
    let host = HostFilesystem::new();
    let ctx = Context::background();

    let collected = manifests::collect(&ctx, &host, source.path()).unwrap();
    let err = manifests::save(&ctx, &host, target.path(), &collected, WriteModes::default())
        .unwrap_err();

    assert_eq!(
        err,
        ManifestError::DirectoryNotEmpty(target.path().to_path_buf())
    );
}

#[test]
fn test_stage_into_temp_root() {
    let source = TempDir::new().unwrap();
    let temp_root = TempDir::new().unwrap();
    create_manifest_dir(source.path());
    let config = FsConfig {
        temp_root: temp_root.path().to_path_buf(),
        temp_pattern: "stage-*".to_string(),
        ..Default::default()
    };
    let host = HostFilesystem::new();
    let ctx = config.context();

    let collected = manifests::collect(&ctx, &host, source.path()).unwrap();
    let staged = manifests::stage(&ctx, &host, &collected, &config).unwrap();

    assert_eq!(staged.directory.parent().unwrap(), temp_root.path());
    assert!(staged
        .directory
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("stage-"));
    assert_eq!(staged.files.len(), 2);
    assert!(staged.files.iter().all(|f| f.is_file()));
}

#[test]
fn test_collect_missing_path() {
    let missing = PathBuf::from("/definitely/not/here/deploy-fs");
    let err = manifests::collect(&Context::background(), &HostFilesystem::new(), &missing)
        .unwrap_err();

    assert!(matches!(err, ManifestError::Fs { op: "stat", .. }));
}

#[test]
fn test_cancelled_context_stops_collection() {
    let source = TempDir::new().unwrap();
    create_manifest_dir(source.path());
    let (ctx, handle) = Context::with_cancel();
    handle.cancel();

    let err = manifests::collect(&ctx, &HostFilesystem::new(), source.path()).unwrap_err();

    assert!(err.to_string().starts_with("failed to stat"));
}
