// src/task/raw.rs

//! Task declarations as authored in a configuration.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::oneshot;

use crate::pipeline::{Rename, Transform, VirtualFile};

/// A task declaration: a name reference, a callback or a descriptor.
#[derive(Debug, Clone)]
pub enum RawTask {
    Name(String),
    Callback(Callback),
    Descriptor(Box<Descriptor>),
}

impl From<&str> for RawTask {
    fn from(name: &str) -> Self {
        RawTask::Name(name.to_string())
    }
}

impl From<String> for RawTask {
    fn from(name: String) -> Self {
        RawTask::Name(name)
    }
}

impl From<Callback> for RawTask {
    fn from(callback: Callback) -> Self {
        RawTask::Callback(callback)
    }
}

impl From<Descriptor> for RawTask {
    fn from(descriptor: Descriptor) -> Self {
        RawTask::Descriptor(Box::new(descriptor))
    }
}

/// A user function run as a task.
#[derive(Clone)]
pub enum Callback {
    Sync(Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>),
    Future(Arc<dyn Fn() -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>),
    /// Receives a [`Done`] signal and completes when it fires.
    WithDone(Arc<dyn Fn(Done) + Send + Sync>),
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Sync(_) => f.write_str("Callback::Sync"),
            Callback::Future(_) => f.write_str("Callback::Future"),
            Callback::WithDone(_) => f.write_str("Callback::WithDone"),
        }
    }
}

impl Callback {
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Callback::Sync(Arc::new(f))
    }

    pub fn future<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Callback::Future(Arc::new(move || f().boxed()))
    }

    pub fn with_done<F>(f: F) -> Self
    where
        F: Fn(Done) + Send + Sync + 'static,
    {
        Callback::WithDone(Arc::new(f))
    }
}

/// One-shot completion signal handed to [`Callback::WithDone`].
///
/// Dropping it without calling [`Done::finish`] or [`Done::fail`] fails the
/// task.
#[derive(Debug)]
pub struct Done {
    tx: oneshot::Sender<anyhow::Result<()>>,
}

impl Done {
    pub fn channel() -> (Self, oneshot::Receiver<anyhow::Result<()>>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    pub fn finish(self) {
        let _ = self.tx.send(Ok(()));
    }

    pub fn fail(self, err: impl Into<anyhow::Error>) {
        let _ = self.tx.send(Err(err.into()));
    }

    /// Await the signal, treating a dropped sender as failure.
    pub async fn wait(rx: oneshot::Receiver<anyhow::Result<()>>) -> anyhow::Result<()> {
        rx.await
            .unwrap_or_else(|_| Err(anyhow!("completion signal dropped without being called")))
    }
}

/// Structured task declaration. Every field is optional; the normalizer
/// decides which combinations are valid.
#[derive(Debug, Clone, Default)]
pub struct Descriptor {
    pub source: Option<Source>,
    pub base: Option<PathBuf>,
    pub transforms: Option<Vec<Transform>>,
    pub rename: Option<Rename>,
    pub destination: Option<Destination>,
    pub watch: Option<Watch>,
    pub task: Option<Box<RawTask>>,
    pub series: Option<Vec<RawTask>>,
    pub parallel: Option<Vec<RawTask>>,
}

impl Descriptor {
    /// A transform task reading `pattern`.
    pub fn source(pattern: impl Into<String>) -> Self {
        Self {
            source: Some(Source::Glob(pattern.into())),
            ..Self::default()
        }
    }

    pub fn series<I, T>(tasks: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RawTask>,
    {
        Self {
            series: Some(tasks.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn parallel<I, T>(tasks: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RawTask>,
    {
        Self {
            parallel: Some(tasks.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn wrap(task: impl Into<RawTask>) -> Self {
        Self {
            task: Some(Box::new(task.into())),
            ..Self::default()
        }
    }

    /// Number of `task`/`series`/`parallel` fields present.
    pub fn composition_count(&self) -> usize {
        usize::from(self.task.is_some())
            + usize::from(self.series.is_some())
            + usize::from(self.parallel.is_some())
    }
}

#[derive(Debug, Clone)]
pub enum Source {
    Glob(String),
    Inline(VirtualFile),
    /// Produced by loosely typed loaders for values of any other kind.
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Watch {
    /// Watch whatever `source` reads.
    Source,
    Paths(Vec<String>),
    /// Not watched, even if the template says otherwise.
    Off,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Directory(PathBuf),
    /// Do not write, even if the template supplies a destination.
    Skip,
}
