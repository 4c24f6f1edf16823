//! Collecting and staging deployment manifests
//!
//! Everything here goes through [`FilesystemService`], so the same code
//! runs against the host filesystem in the binary and against
//! [`FakeFilesystem`](crate::fs::FakeFilesystem) in tests.

use crate::config::{FsConfig, WriteModes};
use crate::context::Context;
use crate::fs::{FilesystemService, FsError};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

const MANIFEST_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    #[error("no manifests found in {}", .0.display())]
    NoManifests(PathBuf),

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("output directory {} is not empty", .0.display())]
    DirectoryNotEmpty(PathBuf),

    #[error("failed to {op} {}", .path.display())]
    Fs {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: FsError,
    },
}

impl ManifestError {
    fn fs(op: &'static str, path: &Path) -> impl FnOnce(FsError) -> Self {
        let path = path.to_path_buf();
        move |source| ManifestError::Fs { op, path, source }
    }
}

/// A configuration file read for deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// File name, used as the name of the staged copy
    pub name: String,
    pub contents: Vec<u8>,
}

/// Where a staging run put its files
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagedManifests {
    pub directory: PathBuf,
    pub files: Vec<PathBuf>,
}

fn is_manifest(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            MANIFEST_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Reads the manifest at `path`, or every manifest directly inside it.
///
/// A file is taken as-is whatever its extension. In a directory only
/// `.yaml`, `.yml` and `.json` files are read, in name order;
/// subdirectories are skipped.
pub fn collect(
    ctx: &Context,
    fs: &dyn FilesystemService,
    path: &Path,
) -> Result<Vec<Manifest>, ManifestError> {
    let info = fs
        .stat(ctx, path)
        .map_err(ManifestError::fs("stat", path))?;

    if !info.is_dir() {
        let contents = fs
            .read_file(ctx, path)
            .map_err(ManifestError::fs("read", path))?;
        debug!(path = %path.display(), bytes = contents.len(), "collected manifest");
        return Ok(vec![Manifest {
            name: info.name().to_string(),
            contents,
        }]);
    }

    let mut entries = fs
        .read_dir(ctx, path)
        .map_err(ManifestError::fs("list", path))?;
    entries.sort_by(|a, b| a.name().cmp(b.name()));

    let mut manifests = Vec::new();
    for entry in entries {
        if entry.is_dir() {
            debug!(dir = entry.name(), "skipping subdirectory");
            continue;
        }
        if !is_manifest(entry.name()) {
            debug!(file = entry.name(), "skipping non-manifest file");
            continue;
        }

        let file = path.join(entry.name());
        let contents = fs
            .read_file(ctx, &file)
            .map_err(ManifestError::fs("read", &file))?;
        manifests.push(Manifest {
            name: entry.name().to_string(),
            contents,
        });
    }

    if manifests.is_empty() {
        return Err(ManifestError::NoManifests(path.to_path_buf()));
    }

    info!(count = manifests.len(), path = %path.display(), "collected manifests");
    Ok(manifests)
}

/// Writes `manifests` into `out_dir`, creating it when missing.
///
/// An existing `out_dir` must be an empty directory.
pub fn save(
    ctx: &Context,
    fs: &dyn FilesystemService,
    out_dir: &Path,
    manifests: &[Manifest],
    modes: WriteModes,
) -> Result<Vec<PathBuf>, ManifestError> {
    match fs.stat(ctx, out_dir) {
        Ok(info) if !info.is_dir() => {
            return Err(ManifestError::NotADirectory(out_dir.to_path_buf()));
        }
        Ok(_) => {
            let entries = fs
                .read_dir(ctx, out_dir)
                .map_err(ManifestError::fs("list", out_dir))?;
            if !entries.is_empty() {
                return Err(ManifestError::DirectoryNotEmpty(out_dir.to_path_buf()));
            }
        }
        Err(err) if err.is_not_found() => {
            fs.mkdir_all(ctx, out_dir, modes.dir_mode)
                .map_err(ManifestError::fs("create", out_dir))?;
        }
        Err(err) => return Err(ManifestError::fs("stat", out_dir)(err)),
    }

    let mut written = Vec::with_capacity(manifests.len());
    for manifest in manifests {
        let target = out_dir.join(&manifest.name);
        fs.write_file(ctx, &target, &manifest.contents, modes.file_mode)
            .map_err(ManifestError::fs("write", &target))?;
        debug!(path = %target.display(), "wrote manifest");
        written.push(target);
    }

    Ok(written)
}

/// Saves `manifests` into a fresh temp directory named after the
/// configured pattern. The directory is removed again if saving fails.
pub fn stage(
    ctx: &Context,
    fs: &dyn FilesystemService,
    manifests: &[Manifest],
    config: &FsConfig,
) -> Result<StagedManifests, ManifestError> {
    let directory = fs
        .temp_dir(ctx, &config.temp_root, &config.temp_pattern)
        .map_err(ManifestError::fs("create temp dir in", &config.temp_root))?;

    match save(ctx, fs, &directory, manifests, config.write_modes()) {
        Ok(files) => {
            info!(dir = %directory.display(), count = files.len(), "staged manifests");
            Ok(StagedManifests { directory, files })
        }
        Err(err) => {
            if let Err(cleanup) = fs.remove_all(ctx, &directory) {
                warn!(dir = %directory.display(), error = %cleanup, "failed to clean up staging directory");
            }
            Err(err)
        }
    }
}
