// src/task/mod.rs

//! Task declarations and their normalized form.
//!
//! - [`raw`] is what configurations author.
//! - [`template`] merges shared defaults into descriptors.
//! - [`normalize`] validates and converts declarations.
//! - [`node`] is the normalized, composable representation.

pub mod node;
pub mod normalize;
pub mod raw;
pub mod template;

pub use node::{TaskKind, TaskNode};
pub use normalize::normalize;
pub use raw::{Callback, Descriptor, Destination, Done, RawTask, Source, Watch};
pub use template::expand;
