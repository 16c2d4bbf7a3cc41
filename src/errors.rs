// src/errors.rs

//! Crate-wide error type.
//!
//! Compile-time failures (`InvalidTaskShape`, `InvalidTaskConfiguration`,
//! `UnknownTask`, `CircularAlias`) abort the whole `compile` call.
//! `InvalidTransformResult` and `CommandFailed` only surface when an action
//! runs, as that action's failure.

use thiserror::Error;

use crate::types::TaskName;

#[derive(Error, Debug)]
pub enum PipedagError {
    #[error("a task must be a name, a callback or a descriptor (task '{task}' is {found})")]
    InvalidTaskShape { task: TaskName, found: String },

    #[error("invalid task '{task}': {violation}")]
    InvalidTaskConfiguration {
        task: TaskName,
        violation: ConfigViolation,
    },

    #[error("invalid task '{task}': `{field}` must be {expected} (got {found})")]
    InvalidField {
        task: TaskName,
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("task \"{0}\" does not exist")]
    UnknownTask(TaskName),

    #[error("circular aliases involving task \"{0}\"")]
    CircularAlias(TaskName),

    #[error("transforms must return a file, bytes or text (got {0})")]
    InvalidTransformResult(String),

    #[error("command `{cmd}` failed with exit code {code}")]
    CommandFailed { cmd: String, code: i32 },

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] globset::Error),

    #[error("file watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// The structural rule a descriptor broke.
///
/// Rules are checked in declaration order, so the first violation found is
/// the most specific one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigViolation {
    #[error("a task must do something")]
    NothingToDo,

    #[error("a task can't have both `source` and `task`/`series`/`parallel`")]
    SourceWithComposition,

    #[error("a task can only have one of `task`/`series`/`parallel`")]
    MultipleCompositions,

    #[error("a task's `source` must be a glob pattern or an inline file (got {0})")]
    InvalidSource(String),

    #[error("no path given to watch")]
    WatchWithoutSource,
}

pub type Result<T> = std::result::Result<T, PipedagError>;
