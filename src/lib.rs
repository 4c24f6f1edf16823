//! deploy-fs - substitutable filesystem layer for deployment tooling
//!
//! Deployment code performs all disk I/O through the [`FilesystemService`]
//! trait. The binary wires in [`HostFilesystem`]; tests wire in
//! [`FakeFilesystem`], which answers each call from responses registered
//! for that exact input and panics on anything it was not told about.
//!
//! # Example
//!
//! ```
//! use deploy_fs::{Context, FakeFilesystem, FilesystemService, FsError, StubFileInfo};
//! use std::path::{Path, PathBuf};
//!
//! let fs = FakeFilesystem::new()
//!     .on_stat("/a/b", Ok(StubFileInfo::file("b")))
//!     .on_write_file("/out.txt", Err(FsError::io("/out.txt", "disk full")))
//!     .on_temp_dir("/tmp", "build-*", Ok(PathBuf::from("/tmp/build-123")));
//! let ctx = Context::background();
//!
//! assert!(!fs.stat(&ctx, Path::new("/a/b")).unwrap().is_dir());
//! assert_eq!(
//!     fs.temp_dir(&ctx, Path::new("/tmp"), "build-*").unwrap(),
//!     PathBuf::from("/tmp/build-123")
//! );
//! ```
//!
//! # Project Structure
//!
//! - [`fs`]: the trait, host implementation, fake and metadata stub
//! - [`context`]: deadline and cancellation passed to every operation
//! - [`manifests`]: collecting and staging deployment manifests
//! - [`config`]: `DEPLOY_FS_*` environment configuration
//! - [`cli`]: command-line surface of the `deploy-fs` binary

pub mod cli;
pub mod config;
pub mod context;
pub mod fs;
pub mod manifests;
pub mod util;

pub use config::{ConfigError, FsConfig, WriteModes};
pub use context::{CancelHandle, Context, ContextError};
pub use fs::{
    FakeFilesystem, FileInfo, FileMode, FilesystemService, FsError, HostFileInfo, HostFilesystem,
    StubFileInfo,
};
pub use manifests::{Manifest, ManifestError, StagedManifests};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_deploy_fs() {
        assert_eq!(NAME, "deploy-fs");
    }
}
