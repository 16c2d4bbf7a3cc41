// src/pipeline/rename.rs

//! Path renaming applied after all transforms.
//!
//! Works on the path relative to the file's `base`, split into
//! `dirname` / `basename` / `extname` the way gulp-rename does.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::pipeline::file::VirtualFile;

/// Editable parts of a relative path: `dirname/basename + extname`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParts {
    pub dirname: String,
    pub basename: String,
    pub extname: String,
}

/// Overrides for [`Rename::Parts`]. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameParts {
    pub dirname: Option<String>,
    pub basename: Option<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub extname: Option<String>,
}

#[derive(Clone)]
pub enum Rename {
    /// Replace the relative path outright.
    Path(String),
    Parts(RenameParts),
    With(Arc<dyn Fn(&mut PathParts) + Send + Sync>),
}

impl fmt::Debug for Rename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rename::Path(p) => f.debug_tuple("Path").field(p).finish(),
            Rename::Parts(parts) => f.debug_tuple("Parts").field(parts).finish(),
            Rename::With(_) => f.write_str("With(..)"),
        }
    }
}

impl PathParts {
    pub fn from_relative(rel: &Path) -> Self {
        let dirname = match rel.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_string_lossy().replace('\\', "/"),
            _ => ".".to_string(),
        };
        let basename = rel
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extname = rel
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        Self {
            dirname,
            basename,
            extname,
        }
    }

    pub fn to_relative(&self) -> PathBuf {
        let file_name = format!("{}{}", self.basename, self.extname);
        if self.dirname.is_empty() || self.dirname == "." {
            PathBuf::from(file_name)
        } else {
            Path::new(&self.dirname).join(file_name)
        }
    }
}

impl Rename {
    /// Rename a file in place, keeping its base.
    pub fn apply(&self, file: &mut VirtualFile) {
        let new_rel = match self {
            Rename::Path(path) => PathBuf::from(path),
            Rename::Parts(overrides) => {
                let mut parts = PathParts::from_relative(file.relative());
                if let Some(dirname) = &overrides.dirname {
                    parts.dirname = dirname.clone();
                }
                if let Some(basename) = &overrides.basename {
                    parts.basename = basename.clone();
                }
                if let Some(prefix) = &overrides.prefix {
                    parts.basename = format!("{prefix}{}", parts.basename);
                }
                if let Some(suffix) = &overrides.suffix {
                    parts.basename = format!("{}{suffix}", parts.basename);
                }
                if let Some(extname) = &overrides.extname {
                    parts.extname = extname.clone();
                }
                parts.to_relative()
            }
            Rename::With(f) => {
                let mut parts = PathParts::from_relative(file.relative());
                f(&mut parts);
                parts.to_relative()
            }
        };

        file.path = file.base.join(new_rel);
    }
}
