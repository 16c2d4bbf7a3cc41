// src/pipeline/mod.rs

//! File-transform pipelines.
//!
//! A pipeline acquires a file set, runs its transforms in declared order,
//! optionally renames, and optionally writes to a destination directory.
//!
//! - [`file`] holds the in-flight file type.
//! - [`source`] reads and writes file sets.
//! - [`transform`] defines per-file and whole-set transforms.
//! - [`rename`] implements path renaming.

pub mod file;
pub mod rename;
pub mod source;
pub mod transform;

use std::path::PathBuf;

use tracing::debug;

use crate::errors::Result;

pub use file::{FileSet, VirtualFile};
pub use rename::{PathParts, Rename, RenameParts};
pub use source::FileSets;
pub use transform::{StreamTransform, Transform, TransformOutput};

/// Where a pipeline's files come from, after validation.
#[derive(Debug, Clone)]
pub enum PipelineSource {
    Glob {
        pattern: String,
        base: Option<PathBuf>,
    },
    Inline(VirtualFile),
}

/// Everything the pipeline builder needs for one transform task.
#[derive(Debug, Clone)]
pub struct PipelineSpec {
    pub source: PipelineSource,
    pub transforms: Vec<Transform>,
    pub rename: Option<Rename>,
    pub destination: Option<PathBuf>,
}

/// Run a pipeline to completion and return the resulting file set.
pub async fn build(spec: &PipelineSpec, files: &FileSets) -> Result<FileSet> {
    let mut set = match &spec.source {
        PipelineSource::Glob { pattern, base } => files.src(pattern, base.as_deref())?,
        PipelineSource::Inline(file) => files.inline(file.clone()),
    };

    for (index, transform) in spec.transforms.iter().enumerate() {
        debug!(index, files = set.len(), "applying transform");
        set = transform.apply(set).await?;
    }

    if let Some(rename) = &spec.rename {
        for file in set.iter_mut() {
            rename.apply(file);
        }
    }

    if let Some(destination) = &spec.destination {
        set = files.dest(set, destination)?;
    }

    Ok(set)
}
