// src/task/node.rs

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::action::Action;
use crate::pipeline::{PipelineSource, PipelineSpec};
use crate::task::raw::Callback;
use crate::types::TaskName;

/// The single shape a normalized task takes.
#[derive(Debug)]
pub enum TaskKind {
    Alias(TaskName),
    Callback(Callback),
    Pipeline(Arc<PipelineSpec>),
    Wrapper(Arc<TaskNode>),
    Series(Vec<Arc<TaskNode>>),
    Parallel(Vec<Arc<TaskNode>>),
}

/// A normalized task plus the memo slot for its composed action.
///
/// Nodes are shared through `Arc`, and the slot belongs to the node, so
/// memoization follows node identity rather than task names.
pub struct TaskNode {
    kind: TaskKind,
    watch: Vec<String>,
    action: OnceLock<Action>,
}

impl fmt::Debug for TaskNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskNode")
            .field("kind", &self.kind)
            .field("watch", &self.watch)
            .field("composed", &self.action.get().is_some())
            .finish()
    }
}

impl TaskNode {
    pub fn new(kind: TaskKind) -> Self {
        Self::with_watch(kind, Vec::new())
    }

    pub fn with_watch(kind: TaskKind, watch: Vec<String>) -> Self {
        Self {
            kind,
            watch,
            action: OnceLock::new(),
        }
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    /// Paths/patterns this task wants to be re-run for. Empty if none.
    pub fn watch(&self) -> &[String] {
        &self.watch
    }

    /// The composed action, once composition has reached this node.
    pub fn action(&self) -> Option<&Action> {
        self.action.get()
    }

    /// Store the composed action; the first write wins.
    pub(crate) fn memoize(&self, action: Action) -> Action {
        self.action.get_or_init(|| action).clone()
    }

    /// One-line summary used by `--dry-run`.
    pub fn describe(&self) -> String {
        match &self.kind {
            TaskKind::Alias(name) => format!("alias -> {name}"),
            TaskKind::Callback(_) => "callback".to_string(),
            TaskKind::Pipeline(spec) => match &spec.source {
                PipelineSource::Glob { pattern, .. } => format!("pipeline from '{pattern}'"),
                PipelineSource::Inline(file) => format!("pipeline from inline {:?}", file.path),
            },
            TaskKind::Wrapper(inner) => format!("task ({})", inner.describe()),
            TaskKind::Series(members) => format!("series of {}", members.len()),
            TaskKind::Parallel(members) => format!("parallel of {}", members.len()),
        }
    }
}
