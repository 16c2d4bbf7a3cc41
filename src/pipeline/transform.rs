// src/pipeline/transform.rs

//! Transform primitives applied by the pipeline builder.
//!
//! A [`Transform`] is either a per-file function or a pre-built
//! [`StreamTransform`] that sees the whole file set at once.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{try_join_all, BoxFuture};
use futures::FutureExt;
use tracing::trace;

use crate::errors::{PipedagError, Result};
use crate::pipeline::file::{FileSet, VirtualFile};

type FileFn =
    dyn Fn(Vec<u8>, VirtualFile) -> BoxFuture<'static, Result<TransformOutput>> + Send + Sync;

/// What a per-file transform resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformOutput {
    /// Replaces the current file wholesale. A replacement without a base
    /// takes the current file's base, so it lands under the destination.
    File(VirtualFile),
    /// Replaces the current file's contents.
    Bytes(Vec<u8>),
    /// Replaces the current file's contents with the UTF-8 encoding.
    Text(String),
    /// Anything else; rejected with `InvalidTransformResult`.
    Unsupported(&'static str),
}

impl From<VirtualFile> for TransformOutput {
    fn from(file: VirtualFile) -> Self {
        TransformOutput::File(file)
    }
}

impl From<Vec<u8>> for TransformOutput {
    fn from(bytes: Vec<u8>) -> Self {
        TransformOutput::Bytes(bytes)
    }
}

impl From<&[u8]> for TransformOutput {
    fn from(bytes: &[u8]) -> Self {
        TransformOutput::Bytes(bytes.to_vec())
    }
}

impl From<String> for TransformOutput {
    fn from(text: String) -> Self {
        TransformOutput::Text(text)
    }
}

impl From<&str> for TransformOutput {
    fn from(text: &str) -> Self {
        TransformOutput::Text(text.to_string())
    }
}

impl From<()> for TransformOutput {
    fn from(_: ()) -> Self {
        TransformOutput::Unsupported("()")
    }
}

macro_rules! unsupported_output {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for TransformOutput {
                fn from(_: $ty) -> Self {
                    TransformOutput::Unsupported(stringify!($ty))
                }
            }
        )*
    };
}

unsupported_output!(bool, i32, i64, u32, u64, usize, f32, f64);

/// A transform over a whole file set.
pub trait StreamTransform: Send + Sync {
    fn apply(&self, files: FileSet) -> BoxFuture<'static, Result<FileSet>>;
}

#[derive(Clone)]
pub enum Transform {
    PerFile(Arc<FileFn>),
    Stream(Arc<dyn StreamTransform>),
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::PerFile(_) => f.write_str("Transform::PerFile"),
            Transform::Stream(_) => f.write_str("Transform::Stream"),
        }
    }
}

impl Transform {
    /// Wrap a per-file function `(contents, file) -> output`.
    pub fn per_file<F, Fut, O>(f: F) -> Self
    where
        F: Fn(Vec<u8>, VirtualFile) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<O>> + Send + 'static,
        O: Into<TransformOutput>,
    {
        Transform::PerFile(Arc::new(move |contents, file| {
            let fut = f(contents, file);
            async move {
                let output = fut.await?;
                Ok::<_, PipedagError>(output.into())
            }
            .boxed()
        }))
    }

    pub fn stream(transform: impl StreamTransform + 'static) -> Self {
        Transform::Stream(Arc::new(transform))
    }

    /// Apply this transform to every file of the set.
    pub async fn apply(&self, files: FileSet) -> Result<FileSet> {
        match self {
            Transform::Stream(stream) => stream.apply(files).await,
            Transform::PerFile(f) => {
                try_join_all(files.into_iter().map(|file| apply_to_file(f, file))).await
            }
        }
    }
}

async fn apply_to_file(f: &Arc<FileFn>, mut file: VirtualFile) -> Result<VirtualFile> {
    let Some(contents) = file.contents.clone() else {
        trace!(path = ?file.path, "directory placeholder passed through");
        return Ok(file);
    };

    match f(contents, file.clone()).await? {
        TransformOutput::File(mut replacement) => {
            if replacement.base.as_os_str().is_empty() {
                replacement.base = file.base;
            }
            Ok(replacement)
        }
        TransformOutput::Bytes(bytes) => {
            file.contents = Some(bytes);
            Ok(file)
        }
        TransformOutput::Text(text) => {
            file.contents = Some(text.into_bytes());
            Ok(file)
        }
        TransformOutput::Unsupported(found) => {
            Err(PipedagError::InvalidTransformResult(found.to_string()))
        }
    }
}
