// src/graph/resolve.rs

use std::collections::HashSet;
use std::sync::Arc;

use crate::errors::{PipedagError, Result};
use crate::graph::TaskTable;
use crate::task::{TaskKind, TaskNode};

/// Follow a chain of aliases starting at `name` to the first task that is
/// not an alias.
///
/// Fails with `UnknownTask` when a name in the chain is missing and with
/// `CircularAlias` when the chain comes back to a name it already passed,
/// including a task that names itself.
pub fn resolve(name: &str, table: &TaskTable) -> Result<Arc<TaskNode>> {
    let mut seen: HashSet<&str> = HashSet::from([name]);
    let mut current = name;

    loop {
        let node = table
            .get(current)
            .ok_or_else(|| PipedagError::UnknownTask(current.to_string()))?;

        match node.kind() {
            TaskKind::Alias(next) => {
                if !seen.insert(next.as_str()) {
                    return Err(PipedagError::CircularAlias(next.clone()));
                }
                current = next;
            }
            _ => return Ok(Arc::clone(node)),
        }
    }
}
