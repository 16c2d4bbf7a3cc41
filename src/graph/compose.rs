// src/graph/compose.rs

//! Compose normalized tasks into invocable actions.
//!
//! Composition is synchronous and runs once per `compile`. Each node's
//! action is memoized in the node itself, so a task referenced from several
//! places (by alias or from several series/parallel lists) composes once and
//! every reference shares one [`Action`].

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::action::Action;
use crate::errors::{PipedagError, Result};
use crate::graph::resolve::resolve;
use crate::graph::TaskTable;
use crate::pipeline::{self, FileSets, PipelineSpec};
use crate::services::Services;
use crate::task::{Callback, Done, TaskKind, TaskNode};
use crate::types::TaskName;

/// Composes tasks of one table against one set of services.
pub struct Composer<'a> {
    table: &'a TaskTable,
    services: &'a Services,
    /// Nodes whose composition has started but not finished.
    in_progress: HashSet<*const TaskNode>,
    /// Names entered through aliases, innermost last; used in cycle errors.
    trail: Vec<TaskName>,
}

impl<'a> Composer<'a> {
    pub fn new(table: &'a TaskTable, services: &'a Services) -> Self {
        Self {
            table,
            services,
            in_progress: HashSet::new(),
            trail: Vec::new(),
        }
    }

    /// Compose the top-level task `name`.
    pub fn compose_named(&mut self, name: &str) -> Result<Action> {
        let node = self
            .table
            .get(name)
            .ok_or_else(|| PipedagError::UnknownTask(name.to_string()))?;

        self.trail.push(name.to_string());
        let result = self.compose(node);
        self.trail.pop();
        result
    }

    /// Compose one node, reusing its memoized action if it has one.
    pub fn compose(&mut self, node: &Arc<TaskNode>) -> Result<Action> {
        if let Some(action) = node.action() {
            return Ok(action.clone());
        }

        // A node reached again while still being composed refers to itself
        // through its own members.
        let key = Arc::as_ptr(node);
        if !self.in_progress.insert(key) {
            let name = self
                .trail
                .last()
                .cloned()
                .unwrap_or_else(|| "<anonymous>".to_string());
            return Err(PipedagError::CircularAlias(name));
        }

        let result = self.build(node);
        self.in_progress.remove(&key);

        Ok(node.memoize(result?))
    }

    fn build(&mut self, node: &Arc<TaskNode>) -> Result<Action> {
        match node.kind() {
            TaskKind::Alias(name) => {
                let target = resolve(name, self.table)?;
                trace!(alias = %name, "alias resolved");
                self.trail.push(name.clone());
                let result = self.compose(&target);
                self.trail.pop();
                result
            }
            TaskKind::Callback(callback) => Ok(callback_action(callback)),
            TaskKind::Pipeline(spec) => Ok(pipeline_action(spec, &self.services.files)),
            TaskKind::Wrapper(inner) => self.compose(inner),
            TaskKind::Series(members) => {
                let actions = self.compose_all(members)?;
                Ok(self.services.scheduler.series(actions))
            }
            TaskKind::Parallel(members) => {
                let actions = self.compose_all(members)?;
                Ok(self.services.scheduler.parallel(actions))
            }
        }
    }

    fn compose_all(&mut self, members: &[Arc<TaskNode>]) -> Result<Vec<Action>> {
        members.iter().map(|member| self.compose(member)).collect()
    }
}

fn callback_action(callback: &Callback) -> Action {
    match callback.clone() {
        Callback::Sync(f) => Action::new(move || {
            let f = Arc::clone(&f);
            async move { f().map_err(PipedagError::from) }
        }),
        Callback::Future(f) => Action::new(move || {
            let fut = f();
            async move { fut.await.map_err(PipedagError::from) }
        }),
        Callback::WithDone(f) => Action::new(move || {
            let f = Arc::clone(&f);
            async move {
                let (done, rx) = Done::channel();
                f(done);
                Done::wait(rx).await.map_err(PipedagError::from)
            }
        }),
    }
}

fn pipeline_action(spec: &Arc<PipelineSpec>, files: &FileSets) -> Action {
    let spec = Arc::clone(spec);
    let files = files.clone();
    Action::new(move || {
        let spec = Arc::clone(&spec);
        let files = files.clone();
        async move {
            let output = pipeline::build(&spec, &files).await?;
            debug!(files = output.len(), "pipeline finished");
            Ok(())
        }
    })
}
