//! Filesystem abstraction for testable deployment code
//!
//! [`HostFilesystem`] does real I/O; [`FakeFilesystem`] answers from canned,
//! input-keyed responses and panics on any call a test did not register.

mod error;
mod fake;
mod real;
mod stub;
mod r#trait;

pub use error::FsError;
pub use fake::FakeFilesystem;
pub use r#trait::{FileInfo, FileMode, FilesystemService};
pub use real::{HostFileInfo, HostFilesystem};
pub use stub::StubFileInfo;
