// src/compiler.rs

//! The compiler entry point.
//!
//! `compile` runs in two phases so tasks may reference names declared after
//! them: every declaration is normalized into a fresh [`TaskTable`] first,
//! and only then is anything resolved or composed.

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::action::Action;
use crate::errors::Result;
use crate::graph::{Composer, TaskTable};
use crate::services::Services;
use crate::task::template::builtin_defaults;
use crate::task::{expand, normalize, Descriptor, RawTask};
use crate::types::{TaskName, WATCH_TASK_NAME};
use crate::watch::build_watch_task;

/// Declarative task configuration.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    /// Task declarations, in declaration order.
    pub tasks: IndexMap<TaskName, RawTask>,
    /// Defaults merged into every descriptor.
    pub template: Descriptor,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn task(mut self, name: impl Into<TaskName>, task: impl Into<RawTask>) -> Self {
        self.tasks.insert(name.into(), task.into());
        self
    }

    pub fn template(mut self, template: Descriptor) -> Self {
        self.template = template;
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
    /// Also register every produced action with the scheduler.
    pub register: bool,
}

/// Normalize every declaration and add the synthetic watch task.
///
/// This is the whole compile phase short of composition; `--dry-run` stops
/// here.
pub fn build_table(configuration: Configuration, services: &Services) -> Result<TaskTable> {
    let Configuration { tasks, mut template } = configuration;
    expand(&mut template, &builtin_defaults());

    let mut table = TaskTable::new();
    for (name, raw) in tasks {
        let node = normalize(&name, raw, &template)?;
        table.insert(name, node);
    }

    if let Some(watch) = build_watch_task(&table, services) {
        table.insert(WATCH_TASK_NAME, watch);
    }

    debug!(tasks = table.len(), "task table built");
    Ok(table)
}

/// Compile a configuration into one action per task name.
///
/// Any compile-time error aborts the whole call; nothing is registered
/// unless every task composed.
pub fn compile(
    configuration: Configuration,
    options: &CompileOptions,
    services: &Services,
) -> Result<IndexMap<TaskName, Action>> {
    let table = build_table(configuration, services)?;

    let mut composer = Composer::new(&table, services);
    let mut actions = IndexMap::with_capacity(table.len());
    for name in table.names() {
        actions.insert(name.to_string(), composer.compose_named(name)?);
    }

    if options.register {
        for (name, action) in &actions {
            services.scheduler.register(name, action.clone());
        }
    }

    info!(tasks = actions.len(), registered = options.register, "configuration compiled");
    Ok(actions)
}
