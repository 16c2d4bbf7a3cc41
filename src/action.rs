// src/action.rs

//! Zero-argument invocable actions.
//!
//! An [`Action`] is what the compiler hands to the scheduler: calling
//! [`Action::run`] starts one execution and returns its completion future.
//! Clones share the same underlying closure, so identity survives cloning.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::errors::Result;

type ActionFn = dyn Fn() -> BoxFuture<'static, Result<()>> + Send + Sync;

#[derive(Clone)]
pub struct Action {
    inner: Arc<ActionFn>,
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("ptr", &Arc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}

impl Action {
    /// Wrap a closure that produces a fresh future per run.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Self {
            inner: Arc::new(move || f().boxed()),
        }
    }

    /// Start one execution.
    pub fn run(&self) -> BoxFuture<'static, Result<()>> {
        (self.inner)()
    }

    /// True if both handles point at the same composed action.
    pub fn ptr_eq(&self, other: &Action) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
