// src/pipeline/file.rs

use std::path::{Path, PathBuf};

/// A file flowing through a pipeline.
///
/// `contents` is `None` for directory placeholders; transforms skip those.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualFile {
    pub path: PathBuf,
    pub base: PathBuf,
    pub contents: Option<Vec<u8>>,
}

/// Files produced by one pipeline stage, in path order.
pub type FileSet = Vec<VirtualFile>;

impl VirtualFile {
    /// A file with contents, based at `""` so its relative path is `path`.
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            base: PathBuf::new(),
            contents: Some(contents.into()),
        }
    }

    /// A directory placeholder.
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            base: PathBuf::new(),
            contents: None,
        }
    }

    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = base.into();
        self
    }

    pub fn is_directory(&self) -> bool {
        self.contents.is_none()
    }

    /// Path relative to `base`; falls back to the full path when `base` is
    /// not a prefix.
    pub fn relative(&self) -> &Path {
        self.path.strip_prefix(&self.base).unwrap_or(&self.path)
    }
}
