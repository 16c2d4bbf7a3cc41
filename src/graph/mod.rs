// src/graph/mod.rs

//! The per-compile task table and its composition into actions.
//!
//! - [`resolve`] follows alias chains with cycle detection.
//! - [`compose`] turns normalized tasks into memoized actions.

pub mod compose;
pub mod resolve;

use std::sync::Arc;

use indexmap::IndexMap;

use crate::task::TaskNode;
use crate::types::TaskName;

pub use compose::Composer;
pub use resolve::resolve;

/// Task name -> normalized task, in declaration order.
///
/// Built fresh by every `compile` call; never shared between calls.
#[derive(Debug, Default)]
pub struct TaskTable {
    tasks: IndexMap<TaskName, Arc<TaskNode>>,
}

impl TaskTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a task, returning the node it replaced, if any.
    pub fn insert(&mut self, name: impl Into<TaskName>, node: TaskNode) -> Option<Arc<TaskNode>> {
        self.tasks.insert(name.into(), Arc::new(node))
    }

    pub fn get(&self, name: &str) -> Option<&Arc<TaskNode>> {
        self.tasks.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TaskName, &Arc<TaskNode>)> {
        self.tasks.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
