// crates/test-utils/src/fixtures.rs

use std::sync::Arc;

use pipedag::fs::mock::MockFileSystem;
use pipedag::pipeline::FileSets;
use pipedag::{Registry, Services};

use crate::fakes::FakeWatcher;

/// Project root used by every in-memory fixture.
pub const ROOT: &str = "/project";

/// Services wired to an in-memory filesystem and a fake watcher, with
/// handles to each so tests can seed files and inspect results.
#[derive(Clone)]
pub struct TestServices {
    pub services: Services,
    pub registry: Registry,
    pub fs: MockFileSystem,
    pub watcher: FakeWatcher,
}

impl TestServices {
    pub fn new() -> Self {
        let registry = Registry::new();
        let fs = MockFileSystem::new();
        fs.add_dir(ROOT);
        let watcher = FakeWatcher::new();

        let services = Services::new(
            Arc::new(registry.clone()),
            FileSets::new(Arc::new(fs.clone()), ROOT),
            Arc::new(watcher.clone()),
        );

        Self {
            services,
            registry,
            fs,
            watcher,
        }
    }

    /// Add a file at `rel` under the project root.
    pub fn add_file(&self, rel: &str, contents: &str) {
        self.fs.add_file(format!("{ROOT}/{rel}"), contents.as_bytes());
    }

    /// Text of the file at `rel` under the project root, if any.
    pub fn read(&self, rel: &str) -> Option<String> {
        self.fs
            .contents(format!("{ROOT}/{rel}"))
            .map(|c| String::from_utf8_lossy(&c).into_owned())
    }
}

impl Default for TestServices {
    fn default() -> Self {
        Self::new()
    }
}
