use super::FileInfo;
use std::sync::Arc;

/// Metadata record for tests: a name and a directory flag, nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubFileInfo {
    pub name: String,
    pub is_dir: bool,
}

impl StubFileInfo {
    pub fn new(name: impl Into<String>, is_dir: bool) -> Self {
        Self {
            name: name.into(),
            is_dir,
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self::new(name, false)
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self::new(name, true)
    }

    /// Shared form, as returned by `stat` and `read_dir`.
    pub fn shared(self) -> Arc<dyn FileInfo> {
        Arc::new(self)
    }
}

impl FileInfo for StubFileInfo {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_dir(&self) -> bool {
        self.is_dir
    }
}
