// src/task/template.rs

use std::path::PathBuf;

use crate::task::raw::{Descriptor, Destination};

/// Copy every field set on `defaults` but unset on `target` into `target`.
///
/// Fields already present on `target` are never overwritten.
pub fn expand(target: &mut Descriptor, defaults: &Descriptor) {
    fill(&mut target.source, &defaults.source);
    fill(&mut target.base, &defaults.base);
    fill(&mut target.transforms, &defaults.transforms);
    fill(&mut target.rename, &defaults.rename);
    fill(&mut target.destination, &defaults.destination);
    fill(&mut target.watch, &defaults.watch);
    fill(&mut target.task, &defaults.task);
    fill(&mut target.series, &defaults.series);
    fill(&mut target.parallel, &defaults.parallel);
}

fn fill<T: Clone>(slot: &mut Option<T>, default: &Option<T>) {
    if slot.is_none() {
        slot.clone_from(default);
    }
}

/// Built-in defaults seeded into every shared template: no transforms and
/// output to the project root.
pub fn builtin_defaults() -> Descriptor {
    Descriptor {
        transforms: Some(Vec::new()),
        destination: Some(Destination::Directory(PathBuf::from("."))),
        ..Descriptor::default()
    }
}
