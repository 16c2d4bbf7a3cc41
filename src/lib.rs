// src/lib.rs

pub mod action;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod graph;
pub mod logging;
pub mod patterns;
pub mod pipeline;
pub mod services;
pub mod task;
pub mod types;
pub mod watch;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{config_root_dir, default_config_path, load_configuration};
use crate::graph::TaskTable;
use crate::watch::WatchIndex;

pub use crate::action::Action;
pub use crate::compiler::{build_table, compile, CompileOptions, Configuration};
pub use crate::errors::{ConfigViolation, PipedagError};
pub use crate::exec::{Registry, Scheduler};
pub use crate::services::Services;
pub use crate::task::{Callback, Descriptor, Destination, Done, RawTask, Source, Watch};
pub use crate::types::{TaskName, WATCH_TASK_NAME};

/// Task run when none are named on the command line.
pub const DEFAULT_TASK: &str = "default";

/// High-level entry point used by `main.rs`.
///
/// Loads the config, compiles it against the real filesystem, runs the
/// requested tasks in order and, if any of them started watchers, waits
/// for Ctrl-C.
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let configuration = load_configuration(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let root = config_root_dir(&config_path);
    let registry = Registry::new();
    let services = Services::local(root, registry.clone());

    if args.dry_run {
        let table = build_table(configuration, &services)?;
        print_dry_run(&table);
        return Ok(());
    }

    compile(configuration, &CompileOptions { register: true }, &services)?;

    let tasks = if args.tasks.is_empty() {
        vec![DEFAULT_TASK.to_string()]
    } else {
        args.tasks.clone()
    };
    info!(?tasks, "running tasks");

    for task in &tasks {
        registry.run(task).await?;
    }

    if services.watcher.active() > 0 {
        info!(watchers = services.watcher.active(), "watching for changes (Ctrl-C to stop)");
        tokio::signal::ctrl_c()
            .await
            .context("failed to listen for Ctrl+C")?;
        info!("shutting down");
    }

    Ok(())
}

/// Dry-run output: every task's shape and the watch index.
fn print_dry_run(table: &TaskTable) {
    println!("pipedag dry-run");
    println!();

    println!("tasks ({}):", table.len());
    for (name, node) in table.iter() {
        println!("  - {name}: {}", node.describe());
        if !node.watch().is_empty() {
            println!("      watch: {:?}", node.watch());
        }
    }

    let index = WatchIndex::from_table(table);
    if !index.is_empty() {
        println!();
        println!("watched paths ({}):", index.len());
        for (path, names) in index.iter() {
            println!("  - {path} -> {names:?}");
        }
    }

    debug!("dry-run complete (no execution)");
}
