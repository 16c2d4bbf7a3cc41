// src/config/mod.rs

//! TOML configuration files.
//!
//! - [`model`] is the serde view of a file.
//! - [`convert`] turns task values into [`crate::task::RawTask`]s.
//! - [`loader`] reads files from disk.

pub mod convert;
pub mod loader;
pub mod model;

pub use loader::{config_root_dir, default_config_path, load_configuration, load_from_path};
pub use model::ConfigFile;
