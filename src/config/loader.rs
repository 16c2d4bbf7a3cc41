// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::compiler::Configuration;
use crate::config::model::ConfigFile;
use crate::errors::Result;

/// Environment variable overriding the default config location.
pub const CONFIG_ENV_VAR: &str = "PIPEDAG_CONFIG";

/// Read and deserialize a configuration file.
///
/// This only performs TOML deserialization; task shapes are checked by
/// [`load_configuration`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: ConfigFile = toml::from_str(&contents)?;
    debug!(path = %path.display(), tasks = config.tasks.len(), "config file parsed");

    Ok(config)
}

/// Load a configuration file and convert it for the compiler.
///
/// Shell commands declared in the file run in the file's directory.
pub fn load_configuration(path: impl AsRef<Path>) -> Result<Configuration> {
    let path = path.as_ref();
    let file = load_from_path(path)?;
    file.into_configuration(&config_root_dir(path))
}

/// `$PIPEDAG_CONFIG` if set, otherwise `Pipedag.toml` in the current
/// working directory.
pub fn default_config_path() -> PathBuf {
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from("Pipedag.toml"),
    }
}

/// Directory that relative paths in a config file are resolved against.
///
/// A bare filename like `Pipedag.toml` has an empty parent; that falls back
/// to the current working directory.
pub fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
