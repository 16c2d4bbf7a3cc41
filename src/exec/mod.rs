// src/exec/mod.rs

//! Execution collaborators.
//!
//! - [`scheduler`] provides the `Scheduler` trait and the in-process
//!   `Registry` that runs composed actions.
//! - [`command`] runs shell commands for tasks declared in TOML.

pub mod command;
pub mod scheduler;

pub use command::{filter_through, run_command};
pub use scheduler::{Registry, Scheduler};
