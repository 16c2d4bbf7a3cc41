// src/exec/scheduler.rs

//! Pluggable scheduler abstraction.
//!
//! The compiler only needs four capabilities from whatever runs its
//! actions: named registration, lookup, and sequential/concurrent
//! composition. [`Registry`] is the in-process implementation used by the
//! binary and the tests.

use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::try_join_all;
use indexmap::IndexMap;
use tracing::{debug, info};

use crate::action::Action;
use crate::errors::{PipedagError, Result};
use crate::types::TaskName;

/// Trait abstracting how composed actions are registered and combined.
pub trait Scheduler: Send + Sync {
    /// Register `action` under `name`, replacing any earlier registration.
    fn register(&self, name: &str, action: Action);

    /// A previously registered action.
    fn task(&self, name: &str) -> Option<Action>;

    /// Run `actions` one after another; each completes before the next
    /// starts. Stops at the first failure.
    fn series(&self, actions: Vec<Action>) -> Action;

    /// Run `actions` concurrently. Fails as soon as any member fails.
    fn parallel(&self, actions: Vec<Action>) -> Action;
}

/// In-process scheduler with a per-instance name table.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    tasks: Arc<Mutex<IndexMap<TaskName, Action>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<TaskName> {
        self.lock().keys().cloned().collect()
    }

    /// Run a registered action to completion.
    pub async fn run(&self, name: &str) -> Result<()> {
        let action = self
            .task(name)
            .ok_or_else(|| PipedagError::UnknownTask(name.to_string()))?;

        info!(task = name, "starting task");
        action.run().await?;
        info!(task = name, "finished task");
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, IndexMap<TaskName, Action>> {
        match self.tasks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Scheduler for Registry {
    fn register(&self, name: &str, action: Action) {
        debug!(task = name, "registering task");
        self.lock().insert(name.to_string(), action);
    }

    fn task(&self, name: &str) -> Option<Action> {
        self.lock().get(name).cloned()
    }

    fn series(&self, actions: Vec<Action>) -> Action {
        let actions = Arc::new(actions);
        Action::new(move || {
            let actions = Arc::clone(&actions);
            async move {
                for action in actions.iter() {
                    action.run().await?;
                }
                Ok(())
            }
        })
    }

    fn parallel(&self, actions: Vec<Action>) -> Action {
        let actions = Arc::new(actions);
        Action::new(move || {
            let runs: Vec<_> = actions.iter().map(Action::run).collect();
            async move {
                try_join_all(runs).await?;
                Ok(())
            }
        })
    }
}
