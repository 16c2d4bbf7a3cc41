// src/watch/watch_set.rs

use std::sync::Arc;

use anyhow::anyhow;
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::action::Action;
use crate::graph::TaskTable;
use crate::services::Services;
use crate::task::{Callback, TaskKind, TaskNode};
use crate::types::{timestamp, TaskName, WATCH_TASK_NAME};
use crate::watch::watcher::ChangeHook;

/// Watched path/pattern -> names of the tasks it re-runs.
///
/// Paths keep the order in which they were first declared, and names keep
/// task declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchIndex {
    paths: IndexMap<String, Vec<TaskName>>,
}

impl WatchIndex {
    /// Scan the top-level tasks of `table` for `watch` declarations.
    pub fn from_table(table: &TaskTable) -> Self {
        let mut paths: IndexMap<String, Vec<TaskName>> = IndexMap::new();

        for (name, node) in table.iter() {
            for path in node.watch() {
                let names = paths.entry(path.clone()).or_default();
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
        }

        Self { paths }
    }

    pub fn get(&self, path: &str) -> Option<&[TaskName]> {
        self.paths.get(path).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<TaskName>)> {
        self.paths.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }
}

/// Build the synthetic task that starts one watcher per watched path.
///
/// Returns `None` when no task declares `watch`, or when a task named
/// `watch` already exists. In the latter case every other task's `watch`
/// declaration is dropped as well; a warning says so.
pub fn build_watch_task(table: &TaskTable, services: &Services) -> Option<TaskNode> {
    if table.contains(WATCH_TASK_NAME) {
        warn!(
            "`{}` task redefined; other tasks' `watch` declarations are ignored",
            WATCH_TASK_NAME
        );
        return None;
    }

    let index = WatchIndex::from_table(table);
    if index.is_empty() {
        return None;
    }

    // Resolve names to nodes now; their actions are read when the task runs,
    // after composition has filled every node's memo slot.
    let entries: Vec<(String, Vec<(TaskName, Arc<TaskNode>)>)> = index
        .iter()
        .map(|(path, names)| {
            let nodes = names
                .iter()
                .filter_map(|name| table.get(name).map(|node| (name.clone(), Arc::clone(node))))
                .collect();
            (path.clone(), nodes)
        })
        .collect();

    debug!(paths = index.len(), "watch task created");

    let scheduler = Arc::clone(&services.scheduler);
    let watcher = Arc::clone(&services.watcher);

    let callback = Callback::sync(move || {
        for (path, nodes) in &entries {
            let actions = nodes
                .iter()
                .map(|(name, node)| {
                    node.action()
                        .cloned()
                        .ok_or_else(|| anyhow!("task '{name}' was never composed"))
                })
                .collect::<anyhow::Result<Vec<Action>>>()?;

            let names: Vec<TaskName> = nodes.iter().map(|(name, _)| name.clone()).collect();
            let on_change: ChangeHook = Arc::new(move |changed: &str| {
                println!("{} '{}' was changed, running tasks...", timestamp(), changed);
                debug!(path = changed, tasks = ?names, "watch triggered");
            });

            watcher.watch(vec![path.clone()], scheduler.parallel(actions), on_change)?;
        }
        Ok(())
    });

    Some(TaskNode::new(TaskKind::Callback(callback)))
}
