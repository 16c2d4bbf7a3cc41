// crates/test-utils/src/fakes.rs

use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use pipedag::action::Action;
use pipedag::errors::Result;
use pipedag::watch::{ChangeHook, PathWatcher};
use pipedag::Callback;

/// One `watch` call recorded by [`FakeWatcher`].
#[derive(Clone)]
pub struct Registration {
    pub patterns: Vec<String>,
    pub action: Action,
    pub on_change: ChangeHook,
}

/// Watcher that records registrations instead of touching the filesystem.
///
/// Tests fire changes by hand with [`FakeWatcher::trigger`].
#[derive(Clone, Default)]
pub struct FakeWatcher {
    registrations: Arc<Mutex<Vec<Registration>>>,
}

impl FakeWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patterns of every registration, in registration order.
    pub fn patterns(&self) -> Vec<Vec<String>> {
        self.lock().iter().map(|r| r.patterns.clone()).collect()
    }

    pub fn registrations(&self) -> Vec<Registration> {
        self.lock().clone()
    }

    /// Simulate a change to `path`: every registration whose patterns
    /// contain it exactly gets its hook called and its action run.
    pub fn trigger(&self, path: &str) -> BoxFuture<'static, Vec<Result<()>>> {
        let runs: Vec<_> = self
            .lock()
            .iter()
            .filter(|r| r.patterns.iter().any(|p| p == path))
            .map(|r| {
                (r.on_change)(path);
                r.action.run()
            })
            .collect();
        join_all(runs).boxed()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Registration>> {
        self.registrations.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl PathWatcher for FakeWatcher {
    fn watch(&self, patterns: Vec<String>, action: Action, on_change: ChangeHook) -> Result<()> {
        self.lock().push(Registration {
            patterns,
            action,
            on_change,
        });
        Ok(())
    }

    fn active(&self) -> usize {
        self.lock().len()
    }
}

/// Append-only log shared between callbacks, for asserting run order.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.entries
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// A sync callback that records `entry` each time it runs.
    pub fn record(&self, entry: &str) -> Callback {
        let journal = self.clone();
        let entry = entry.to_string();
        Callback::sync(move || {
            journal.push(entry.clone());
            Ok(())
        })
    }

    /// A future callback that records `start:<entry>`, sleeps `millis`,
    /// then records `end:<entry>`.
    pub fn record_slow(&self, entry: &str, millis: u64) -> Callback {
        let journal = self.clone();
        let entry = entry.to_string();
        Callback::future(move || {
            let journal = journal.clone();
            let entry = entry.clone();
            async move {
                journal.push(format!("start:{entry}"));
                tokio::time::sleep(std::time::Duration::from_millis(millis)).await;
                journal.push(format!("end:{entry}"));
                Ok::<(), anyhow::Error>(())
            }
        })
    }

    /// A sync callback that always fails.
    pub fn failing(&self, entry: &str) -> Callback {
        let journal = self.clone();
        let entry = entry.to_string();
        Callback::sync(move || {
            journal.push(entry.clone());
            Err(anyhow::anyhow!("{entry} failed"))
        })
    }
}
