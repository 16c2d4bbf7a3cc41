// src/pipeline/source.rs

//! File-set source and sink on top of the [`FileSystem`] seam.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};
use crate::patterns::{collect_matching, glob_parent, Matched};
use crate::pipeline::file::{FileSet, VirtualFile};

/// Reads and writes file sets relative to a project root.
#[derive(Debug, Clone)]
pub struct FileSets {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
}

impl FileSets {
    pub fn new(fs: Arc<dyn FileSystem>, root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            root: root.into(),
        }
    }

    /// File sets backed by the real filesystem.
    pub fn real(root: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(RealFileSystem), root)
    }

    /// Files matching `pattern`, based at `base` (or the glob parent).
    pub fn src(&self, pattern: &str, base: Option<&Path>) -> Result<FileSet> {
        let base = self.resolve(base.map(Path::to_path_buf).unwrap_or_else(|| glob_parent(pattern)));
        let matched = collect_matching(self.fs.as_ref(), &self.root, &[pattern.to_string()])?;

        let mut files = Vec::with_capacity(matched.len());
        for entry in matched {
            let file = match entry {
                Matched::File(path) => {
                    let contents = self.fs.read(&path)?;
                    VirtualFile::new(path, contents)
                }
                Matched::Dir(path) => VirtualFile::directory(path),
            };
            files.push(file.with_base(base.clone()));
        }

        debug!(pattern, count = files.len(), "file set acquired");
        Ok(files)
    }

    /// A single-file set from an inline payload.
    pub fn inline(&self, file: VirtualFile) -> FileSet {
        vec![file]
    }

    /// Write every file under `dir`, keeping its path relative to its base.
    ///
    /// Returned files point at their written location, based at `dir`.
    pub fn dest(&self, files: FileSet, dir: &Path) -> Result<FileSet> {
        let dir = self.resolve(dir.to_path_buf());
        let mut written = Vec::with_capacity(files.len());

        for mut file in files {
            let target = dir.join(file.relative());
            match &file.contents {
                Some(contents) => self.fs.write(&target, contents)?,
                None => self.fs.create_dir_all(&target)?,
            }
            debug!(path = ?target, "file written");
            file.path = target;
            file.base = dir.clone();
            written.push(file);
        }

        Ok(written)
    }

    fn resolve(&self, path: PathBuf) -> PathBuf {
        if path.as_os_str().is_empty() || path == Path::new(".") {
            self.root.clone()
        } else {
            self.root.join(path)
        }
    }
}
