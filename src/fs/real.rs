use super::{FileInfo, FileMode, FilesystemService, FsError};
use crate::context::Context;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, trace};

/// Metadata of a host filesystem entry
#[derive(Debug, Clone)]
pub struct HostFileInfo {
    name: String,
    metadata: fs::Metadata,
}

impl HostFileInfo {
    pub fn len(&self) -> u64 {
        self.metadata.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.len() == 0
    }

    pub fn modified(&self) -> Option<SystemTime> {
        self.metadata.modified().ok()
    }

    pub fn metadata(&self) -> &fs::Metadata {
        &self.metadata
    }
}

impl FileInfo for HostFileInfo {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_dir(&self) -> bool {
        self.metadata.is_dir()
    }
}

/// [`FilesystemService`] backed by `std::fs`.
pub struct HostFilesystem;

impl HostFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HostFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Splits a temp dir pattern at its last `*` into prefix and suffix.
fn split_pattern(pattern: &str) -> Result<(&str, &str), FsError> {
    if pattern.chars().any(std::path::is_separator) {
        return Err(FsError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: "pattern contains path separator".to_string(),
        });
    }

    Ok(match pattern.rfind('*') {
        Some(idx) => (&pattern[..idx], &pattern[idx + 1..]),
        None => (pattern, ""),
    })
}

impl FilesystemService for HostFilesystem {
    fn stat(&self, ctx: &Context, path: &Path) -> Result<Arc<dyn FileInfo>, FsError> {
        ctx.check()?;
        trace!(path = %path.display(), "stat");

        let metadata = fs::metadata(path).map_err(|e| FsError::from_io(path, e))?;

        Ok(Arc::new(HostFileInfo {
            name: base_name(path),
            metadata,
        }))
    }

    fn read_dir(&self, ctx: &Context, path: &Path) -> Result<Vec<Arc<dyn FileInfo>>, FsError> {
        ctx.check()?;
        trace!(path = %path.display(), "read_dir");

        let entries = fs::read_dir(path).map_err(|e| FsError::from_io(path, e))?;

        let mut infos = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FsError::from_io(path, e))?;
            let metadata = entry
                .metadata()
                .map_err(|e| FsError::from_io(&entry.path(), e))?;

            infos.push(HostFileInfo {
                name: entry.file_name().to_string_lossy().to_string(),
                metadata,
            });
        }
        infos.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(infos
            .into_iter()
            .map(|info| Arc::new(info) as Arc<dyn FileInfo>)
            .collect())
    }

    fn read_file(&self, ctx: &Context, path: &Path) -> Result<Vec<u8>, FsError> {
        ctx.check()?;
        trace!(path = %path.display(), "read_file");

        fs::read(path).map_err(|e| FsError::from_io(path, e))
    }

    fn write_file(
        &self,
        ctx: &Context,
        path: &Path,
        data: &[u8],
        mode: FileMode,
    ) -> Result<(), FsError> {
        ctx.check()?;
        debug!(path = %path.display(), bytes = data.len(), %mode, "write_file");

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(mode.bits());
        }
        #[cfg(not(unix))]
        let _ = mode;

        let mut file = options.open(path).map_err(|e| FsError::from_io(path, e))?;
        file.write_all(data)
            .map_err(|e| FsError::from_io(path, e))?;
        Ok(())
    }

    fn mkdir_all(&self, ctx: &Context, path: &Path, mode: FileMode) -> Result<(), FsError> {
        ctx.check()?;
        debug!(path = %path.display(), %mode, "mkdir_all");

        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(mode.bits());
        }
        #[cfg(not(unix))]
        let _ = mode;

        builder.create(path).map_err(|e| FsError::from_io(path, e))
    }

    fn remove_all(&self, ctx: &Context, path: &Path) -> Result<(), FsError> {
        ctx.check()?;
        debug!(path = %path.display(), "remove_all");

        let metadata = match fs::symlink_metadata(path) {
            Ok(metadata) => metadata,
            // Nothing to remove
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(FsError::from_io(path, e)),
        };

        let result = if metadata.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        };
        result.map_err(|e| FsError::from_io(path, e))
    }

    fn temp_dir(&self, ctx: &Context, dir: &Path, pattern: &str) -> Result<PathBuf, FsError> {
        ctx.check()?;
        let (prefix, suffix) = split_pattern(pattern)?;

        let parent = if dir.as_os_str().is_empty() {
            std::env::temp_dir()
        } else {
            dir.to_path_buf()
        };

        let created = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempdir_in(&parent)
            .map_err(|e| FsError::from_io(&parent, e))?;
        let path = created.keep();

        debug!(path = %path.display(), pattern, "temp_dir");
        Ok(path)
    }
}
