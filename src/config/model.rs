// src/config/model.rs

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::compiler::Configuration;
use crate::config::convert::{descriptor, raw_task};
use crate::errors::Result;
use crate::types::TaskName;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [template]
/// destination = "dist"
///
/// [tasks]
/// default = { series = ["clean", "styles"] }
/// clean = { cmd = "rm -rf dist" }
///
/// [tasks.styles]
/// source = "src/**/*.css"
/// transforms = ["tr a-z A-Z"]
/// rename = { suffix = ".min" }
/// watch = true
/// ```
///
/// Both sections are optional. Task values stay untyped here; their shape
/// is checked when converting to a [`Configuration`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Defaults merged into every descriptor task.
    #[serde(default)]
    pub template: toml::Table,

    /// All tasks from `[tasks]`, in file order.
    #[serde(default)]
    pub tasks: IndexMap<TaskName, toml::Value>,
}

impl ConfigFile {
    /// Convert into a [`Configuration`]. Shell commands and relative paths
    /// run against `root`.
    pub fn into_configuration(self, root: &Path) -> Result<Configuration> {
        let template = descriptor("template", &self.template, root)?;

        let mut tasks = IndexMap::with_capacity(self.tasks.len());
        for (name, value) in &self.tasks {
            tasks.insert(name.clone(), raw_task(name, value, root)?);
        }

        Ok(Configuration { tasks, template })
    }
}
