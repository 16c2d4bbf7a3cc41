// tests/common/mod.rs

#![allow(dead_code)]

pub use pipedag_test_utils::fakes::{FakeWatcher, Journal};
pub use pipedag_test_utils::fixtures::{TestServices, ROOT};
pub use pipedag_test_utils::{init_tracing, with_timeout};

use pipedag::{compile, Action, CompileOptions, Configuration, PipedagError};
use indexmap::IndexMap;

/// Compile without registering.
pub fn compile_plain(
    configuration: Configuration,
    t: &TestServices,
) -> Result<IndexMap<String, Action>, PipedagError> {
    compile(configuration, &CompileOptions::default(), &t.services)
}
