// src/watch/mod.rs

//! Watching paths and the synthetic `watch` task.
//!
//! - [`watcher`] defines the `PathWatcher` seam and the `notify`-backed
//!   implementation.
//! - [`watch_set`] scans normalized tasks for `watch` declarations and
//!   builds the task that starts one watcher per declared path.
//!
//! Nothing here knows how tasks are composed; the watch task only reads
//! actions that composition has already memoized.

pub mod watch_set;
pub mod watcher;

pub use watch_set::{build_watch_task, WatchIndex};
pub use watcher::{ChangeHook, NotifyWatcher, PathWatcher};
