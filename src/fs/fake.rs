use super::{FileInfo, FileMode, FilesystemService, FsError};
use crate::context::Context;
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::trace;

type Response<T> = Result<T, FsError>;

/// Lookup key for `temp_dir`, kept as a pair so `("/tmp", "x-*")` and
/// `("/tm", "px-*")` never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TempDirKey {
    dir: OsString,
    pattern: String,
}

/// Deterministic [`FilesystemService`] answering from canned responses.
///
/// Each operation has its own map keyed by the call's path, compared
/// verbatim (`"/a/b"` and `"/a/b/"` are different keys). A call whose key
/// was never registered panics with the operation name and the key: the
/// test is wrong, not the simulated filesystem. The context and any
/// data or mode arguments are ignored.
///
/// ```
/// use deploy_fs::{Context, FakeFilesystem, FilesystemService, StubFileInfo};
/// use std::path::Path;
///
/// let fs = FakeFilesystem::new().on_stat("/a/b", Ok(StubFileInfo::file("b")));
/// let info = fs.stat(&Context::background(), Path::new("/a/b")).unwrap();
/// assert_eq!(info.name(), "b");
/// ```
#[derive(Debug, Default)]
pub struct FakeFilesystem {
    stat: HashMap<OsString, Response<Arc<dyn FileInfo>>>,
    read_dir: HashMap<OsString, Response<Vec<Arc<dyn FileInfo>>>>,
    read_file: HashMap<OsString, Response<Vec<u8>>>,
    write_file: HashMap<OsString, Response<()>>,
    mkdir_all: HashMap<OsString, Response<()>>,
    remove_all: HashMap<OsString, Response<()>>,
    temp_dir: HashMap<TempDirKey, Response<PathBuf>>,
}

fn key(path: impl AsRef<Path>) -> OsString {
    path.as_ref().as_os_str().to_os_string()
}

fn lookup<K, T>(map: &HashMap<K, Response<T>>, key: &K, op: &str, arg: &str) -> Response<T>
where
    K: std::hash::Hash + Eq + std::fmt::Debug,
    T: Clone,
{
    match map.get(key) {
        Some(response) => {
            trace!(op, ?key, ok = response.is_ok(), "fake filesystem response");
            response.clone()
        }
        None => panic!("{} has no response for {} {:?}", op, arg, key),
    }
}

impl FakeFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_stat<I>(mut self, path: impl AsRef<Path>, response: Response<I>) -> Self
    where
        I: FileInfo + 'static,
    {
        let response = response.map(|info| Arc::new(info) as Arc<dyn FileInfo>);
        self.stat.insert(key(path), response);
        self
    }

    pub fn on_read_dir<I>(mut self, path: impl AsRef<Path>, response: Response<Vec<I>>) -> Self
    where
        I: FileInfo + 'static,
    {
        let response = response.map(|entries| {
            entries
                .into_iter()
                .map(|info| Arc::new(info) as Arc<dyn FileInfo>)
                .collect()
        });
        self.read_dir.insert(key(path), response);
        self
    }

    pub fn on_read_file(mut self, path: impl AsRef<Path>, response: Response<Vec<u8>>) -> Self {
        self.read_file.insert(key(path), response);
        self
    }

    pub fn on_write_file(mut self, path: impl AsRef<Path>, response: Response<()>) -> Self {
        self.write_file.insert(key(path), response);
        self
    }

    pub fn on_mkdir_all(mut self, path: impl AsRef<Path>, response: Response<()>) -> Self {
        self.mkdir_all.insert(key(path), response);
        self
    }

    pub fn on_remove_all(mut self, path: impl AsRef<Path>, response: Response<()>) -> Self {
        self.remove_all.insert(key(path), response);
        self
    }

    pub fn on_temp_dir(
        mut self,
        dir: impl AsRef<Path>,
        pattern: impl Into<String>,
        response: Response<PathBuf>,
    ) -> Self {
        let key = TempDirKey {
            dir: key(dir),
            pattern: pattern.into(),
        };
        self.temp_dir.insert(key, response);
        self
    }
}

impl FilesystemService for FakeFilesystem {
    fn stat(&self, _ctx: &Context, path: &Path) -> Result<Arc<dyn FileInfo>, FsError> {
        lookup(&self.stat, &key(path), "stat", "path")
    }

    fn read_dir(&self, _ctx: &Context, path: &Path) -> Result<Vec<Arc<dyn FileInfo>>, FsError> {
        lookup(&self.read_dir, &key(path), "read_dir", "dirname")
    }

    fn read_file(&self, _ctx: &Context, path: &Path) -> Result<Vec<u8>, FsError> {
        lookup(&self.read_file, &key(path), "read_file", "filename")
    }

    fn write_file(
        &self,
        _ctx: &Context,
        path: &Path,
        _data: &[u8],
        _mode: FileMode,
    ) -> Result<(), FsError> {
        lookup(&self.write_file, &key(path), "write_file", "filename")
    }

    fn mkdir_all(&self, _ctx: &Context, path: &Path, _mode: FileMode) -> Result<(), FsError> {
        lookup(&self.mkdir_all, &key(path), "mkdir_all", "dirname")
    }

    fn remove_all(&self, _ctx: &Context, path: &Path) -> Result<(), FsError> {
        lookup(&self.remove_all, &key(path), "remove_all", "path")
    }

    fn temp_dir(&self, _ctx: &Context, dir: &Path, pattern: &str) -> Result<PathBuf, FsError> {
        let key = TempDirKey {
            dir: key(dir),
            pattern: pattern.to_string(),
        };
        lookup(&self.temp_dir, &key, "temp_dir", "dir and pattern")
    }
}
