// src/services.rs

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::exec::{Registry, Scheduler};
use crate::pipeline::FileSets;
use crate::watch::{NotifyWatcher, PathWatcher};

/// The collaborators compiled actions run against.
#[derive(Clone)]
pub struct Services {
    pub scheduler: Arc<dyn Scheduler>,
    pub files: FileSets,
    pub watcher: Arc<dyn PathWatcher>,
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services")
            .field("files", &self.files)
            .finish_non_exhaustive()
    }
}

impl Services {
    pub fn new(
        scheduler: Arc<dyn Scheduler>,
        files: FileSets,
        watcher: Arc<dyn PathWatcher>,
    ) -> Self {
        Self {
            scheduler,
            files,
            watcher,
        }
    }

    /// Real filesystem and `notify` watcher rooted at `root`, scheduled by
    /// `registry`.
    pub fn local(root: impl Into<PathBuf>, registry: Registry) -> Self {
        let root = root.into();
        Self {
            scheduler: Arc::new(registry),
            files: FileSets::real(root.clone()),
            watcher: Arc::new(NotifyWatcher::new(root)),
        }
    }
}
