// src/types.rs

/// Canonical task name type used throughout the crate.
pub type TaskName = String;

/// Name reserved for the synthetic task that starts all declared watchers.
pub const WATCH_TASK_NAME: &str = "watch";

/// Wall-clock prefix for user-facing lines, e.g. `[09:41:07]`.
pub fn timestamp() -> String {
    chrono::Local::now().format("[%H:%M:%S]").to_string()
}
