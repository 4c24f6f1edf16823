//! FilesystemService trait definition

use super::FsError;
use crate::context::Context;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Unix permission bits applied when creating files and directories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileMode(u32);

impl FileMode {
    pub const MAX: u32 = 0o777;

    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Parses octal digits such as `"644"` or `"0o755"`.
    pub fn parse_octal(s: &str) -> Option<Self> {
        let digits = s.trim();
        let digits = digits.strip_prefix("0o").unwrap_or(digits);
        u32::from_str_radix(digits, 8).ok().map(Self)
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04o}", self.0)
    }
}

/// The two metadata queries callers rely on.
///
/// Implementations may carry more (the host implementation keeps the native
/// metadata), but nothing behind this trait depends on it.
pub trait FileInfo: fmt::Debug + Send + Sync {
    /// Base name of the entry
    fn name(&self) -> &str;

    fn is_dir(&self) -> bool;
}

/// Abstraction over the filesystem operations deployment code performs.
///
/// Every operation takes a [`Context`] first. Implementations that do real
/// I/O must refuse to start once the context is cancelled or past its
/// deadline; in-memory doubles may ignore it.
pub trait FilesystemService: Send + Sync {
    /// Describe the entry at `path`
    fn stat(&self, ctx: &Context, path: &Path) -> Result<Arc<dyn FileInfo>, FsError>;

    /// List the entries of directory `path`
    fn read_dir(&self, ctx: &Context, path: &Path) -> Result<Vec<Arc<dyn FileInfo>>, FsError>;

    /// Read the whole file at `path`
    fn read_file(&self, ctx: &Context, path: &Path) -> Result<Vec<u8>, FsError>;

    /// Create or truncate `path` and write `data` to it
    fn write_file(
        &self,
        ctx: &Context,
        path: &Path,
        data: &[u8],
        mode: FileMode,
    ) -> Result<(), FsError>;

    /// Create `path` and any missing parents
    fn mkdir_all(&self, ctx: &Context, path: &Path, mode: FileMode) -> Result<(), FsError>;

    /// Remove `path` and everything below it
    fn remove_all(&self, ctx: &Context, path: &Path) -> Result<(), FsError>;

    /// Create a fresh directory inside `dir` named after `pattern`
    fn temp_dir(&self, ctx: &Context, dir: &Path, pattern: &str) -> Result<PathBuf, FsError>;
}

impl<T: FilesystemService + ?Sized> FilesystemService for Arc<T> {
    fn stat(&self, ctx: &Context, path: &Path) -> Result<Arc<dyn FileInfo>, FsError> {
        (**self).stat(ctx, path)
    }

    fn read_dir(&self, ctx: &Context, path: &Path) -> Result<Vec<Arc<dyn FileInfo>>, FsError> {
        (**self).read_dir(ctx, path)
    }

    fn read_file(&self, ctx: &Context, path: &Path) -> Result<Vec<u8>, FsError> {
        (**self).read_file(ctx, path)
    }

    fn write_file(
        &self,
        ctx: &Context,
        path: &Path,
        data: &[u8],
        mode: FileMode,
    ) -> Result<(), FsError> {
        (**self).write_file(ctx, path, data, mode)
    }

    fn mkdir_all(&self, ctx: &Context, path: &Path, mode: FileMode) -> Result<(), FsError> {
        (**self).mkdir_all(ctx, path, mode)
    }

    fn remove_all(&self, ctx: &Context, path: &Path) -> Result<(), FsError> {
        (**self).remove_all(ctx, path)
    }

    fn temp_dir(&self, ctx: &Context, dir: &Path, pattern: &str) -> Result<PathBuf, FsError> {
        (**self).temp_dir(ctx, dir, pattern)
    }
}
