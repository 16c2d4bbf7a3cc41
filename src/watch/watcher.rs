// src/watch/watcher.rs

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::anyhow;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::action::Action;
use crate::errors::Result;
use crate::patterns::{build_globset, glob_parent, relative_slash};

/// Called with the changed path (relative to the project root) before the
/// watcher runs its action.
pub type ChangeHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Something that can observe paths and run an action on change.
pub trait PathWatcher: Send + Sync {
    /// Start watching `patterns`; on each matching change call `on_change`
    /// and then run `action`.
    fn watch(&self, patterns: Vec<String>, action: Action, on_change: ChangeHook) -> Result<()>;

    /// Number of watches currently active.
    fn active(&self) -> usize;
}

/// Filesystem watcher backed by `notify`.
///
/// Each call to [`PathWatcher::watch`] owns one `RecommendedWatcher`, kept
/// alive for as long as this value lives. Changes for one watch are handled
/// one at a time, so a slow rebuild is not started twice concurrently.
pub struct NotifyWatcher {
    root: PathBuf,
    handles: Mutex<Vec<RecommendedWatcher>>,
}

impl std::fmt::Debug for NotifyWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyWatcher")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl NotifyWatcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        // Event paths are compared against the canonical root.
        let root = root.canonicalize().unwrap_or(root);
        Self {
            root,
            handles: Mutex::new(Vec::new()),
        }
    }

    fn handles(&self) -> MutexGuard<'_, Vec<RecommendedWatcher>> {
        match self.handles.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn watch_dir(&self, pattern: &str) -> PathBuf {
        let dir = self.root.join(glob_parent(pattern));
        if dir.is_dir() {
            dir
        } else {
            self.root.clone()
        }
    }
}

impl PathWatcher for NotifyWatcher {
    fn watch(&self, patterns: Vec<String>, action: Action, on_change: ChangeHook) -> Result<()> {
        let matcher = build_globset(&patterns)?;
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| anyhow!("watching requires a tokio runtime: {e}"))?;

        // notify calls back on its own thread; events cross into tokio here.
        let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if let Err(err) = event_tx.send(event) {
                        eprintln!("pipedag: failed to forward notify event: {err}");
                    }
                }
                Err(err) => {
                    eprintln!("pipedag: file watch error: {err}");
                }
            },
            Config::default(),
        )?;

        let mut dirs: Vec<PathBuf> = patterns.iter().map(|p| self.watch_dir(p)).collect();
        dirs.sort();
        dirs.dedup();
        for dir in &dirs {
            watcher.watch(dir, RecursiveMode::Recursive)?;
        }

        info!(?patterns, ?dirs, "file watcher started");

        let root = self.root.clone();
        runtime.spawn(async move {
            while let Some(event) = event_rx.recv().await {
                if event.kind.is_access() {
                    continue;
                }
                debug!(?event, "received notify event");

                for path in &event.paths {
                    let Some(rel) = relative_to_root(&root, path) else {
                        warn!("could not relativize path {:?} against root {:?}", path, root);
                        continue;
                    };
                    if !matcher.is_match(&rel) {
                        continue;
                    }

                    on_change(&rel);
                    if let Err(err) = action.run().await {
                        warn!(path = %rel, error = %err, "watch-triggered run failed");
                    }
                    // One run per event, however many of its paths matched.
                    break;
                }
            }
            debug!("watcher event loop finished");
        });

        self.handles().push(watcher);
        Ok(())
    }

    fn active(&self) -> usize {
        self.handles().len()
    }
}

/// Event paths may arrive canonicalized (macOS reports `/private/var/...`
/// for a `/var/...` root); `root` is canonical already.
fn relative_to_root(root: &Path, path: &Path) -> Option<String> {
    relative_slash(root, path).or_else(|| relative_slash(root, &path.canonicalize().ok()?))
}
