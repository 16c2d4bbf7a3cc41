// src/task/normalize.rs

//! Turn raw declarations into [`TaskNode`]s.
//!
//! Name references stay unresolved here so that tasks may refer to names
//! declared later; resolution happens at composition time.

use std::sync::Arc;

use tracing::trace;

use crate::errors::{ConfigViolation, PipedagError, Result};
use crate::pipeline::{PipelineSource, PipelineSpec};
use crate::task::node::{TaskKind, TaskNode};
use crate::task::raw::{Descriptor, Destination, RawTask, Source, Watch};
use crate::task::template::expand;

/// Normalize one declaration (recursively for nested members).
///
/// `name` is the top-level task the declaration belongs to and is only
/// used for error reporting.
pub fn normalize(name: &str, raw: RawTask, template: &Descriptor) -> Result<TaskNode> {
    match raw {
        RawTask::Name(target) => Ok(TaskNode::new(TaskKind::Alias(target))),
        RawTask::Callback(callback) => Ok(TaskNode::new(TaskKind::Callback(callback))),
        RawTask::Descriptor(mut descriptor) => {
            expand(&mut descriptor, template);
            normalize_descriptor(name, *descriptor, template)
        }
    }
}

/// Check the structural rules in order; the first one broken is reported.
pub fn validate(descriptor: &Descriptor) -> std::result::Result<(), ConfigViolation> {
    let has_source = descriptor.source.is_some();
    let compositions = descriptor.composition_count();

    if !has_source && compositions == 0 {
        return Err(ConfigViolation::NothingToDo);
    }
    if has_source && compositions > 0 {
        return Err(ConfigViolation::SourceWithComposition);
    }
    if compositions > 1 {
        return Err(ConfigViolation::MultipleCompositions);
    }
    if let Some(Source::Unsupported(found)) = &descriptor.source {
        return Err(ConfigViolation::InvalidSource(found.clone()));
    }
    if descriptor.watch == Some(Watch::Source) && !has_source {
        return Err(ConfigViolation::WatchWithoutSource);
    }
    Ok(())
}

fn normalize_descriptor(name: &str, d: Descriptor, template: &Descriptor) -> Result<TaskNode> {
    validate(&d).map_err(|violation| PipedagError::InvalidTaskConfiguration {
        task: name.to_string(),
        violation,
    })?;

    let watch = match d.watch {
        None | Some(Watch::Off) => Vec::new(),
        Some(Watch::Paths(paths)) => paths,
        Some(Watch::Source) => match &d.source {
            Some(Source::Glob(pattern)) => vec![pattern.clone()],
            Some(Source::Inline(file)) => vec![file.path.to_string_lossy().into_owned()],
            // Rejected by `validate`.
            Some(Source::Unsupported(_)) | None => Vec::new(),
        },
    };

    let nest = |raw: RawTask| normalize(name, raw, template).map(Arc::new);

    let kind = if let Some(source) = d.source {
        let source = match source {
            Source::Glob(pattern) => PipelineSource::Glob {
                pattern,
                base: d.base,
            },
            Source::Inline(file) => PipelineSource::Inline(file),
            Source::Unsupported(found) => {
                return Err(PipedagError::InvalidTaskConfiguration {
                    task: name.to_string(),
                    violation: ConfigViolation::InvalidSource(found),
                });
            }
        };
        let destination = match d.destination {
            Some(Destination::Directory(dir)) => Some(dir),
            Some(Destination::Skip) | None => None,
        };
        TaskKind::Pipeline(Arc::new(PipelineSpec {
            source,
            transforms: d.transforms.unwrap_or_default(),
            rename: d.rename,
            destination,
        }))
    } else if let Some(inner) = d.task {
        TaskKind::Wrapper(nest(*inner)?)
    } else if let Some(members) = d.series {
        TaskKind::Series(members.into_iter().map(nest).collect::<Result<_>>()?)
    } else if let Some(members) = d.parallel {
        TaskKind::Parallel(members.into_iter().map(nest).collect::<Result<_>>()?)
    } else {
        // Rejected by `validate`.
        return Err(PipedagError::InvalidTaskConfiguration {
            task: name.to_string(),
            violation: ConfigViolation::NothingToDo,
        });
    };

    trace!(task = name, ?watch, "descriptor normalized");
    Ok(TaskNode::with_watch(kind, watch))
}
