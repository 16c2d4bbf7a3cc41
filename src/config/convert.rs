// src/config/convert.rs

//! Conversion from untyped TOML values into task declarations.
//!
//! - a string is a name reference;
//! - `{ cmd = "..." }` is a callback running a shell command;
//! - any other table is a descriptor.
//!
//! Descriptor fields are converted one by one; unknown keys are ignored
//! with a warning. Structural rules are left to the normalizer.

use std::path::{Path, PathBuf};

use toml::Value;
use tracing::warn;

use crate::errors::{PipedagError, Result};
use crate::exec::{filter_through, run_command};
use crate::pipeline::{Rename, RenameParts, Transform, VirtualFile};
use crate::task::{Callback, Descriptor, Destination, RawTask, Source, Watch};

/// Convert the TOML value declared for task `name`.
pub fn raw_task(name: &str, value: &Value, root: &Path) -> Result<RawTask> {
    match value {
        Value::String(target) => Ok(RawTask::Name(target.clone())),
        Value::Table(table) if table.contains_key("cmd") => command_task(name, table, root),
        Value::Table(table) => Ok(RawTask::from(descriptor(name, table, root)?)),
        other => Err(PipedagError::InvalidTaskShape {
            task: name.to_string(),
            found: kind(other).to_string(),
        }),
    }
}

fn command_task(name: &str, table: &toml::Table, root: &Path) -> Result<RawTask> {
    if table.len() > 1 {
        return Err(PipedagError::InvalidTaskShape {
            task: name.to_string(),
            found: "a `cmd` table with other keys".to_string(),
        });
    }
    let cmd = match table.get("cmd") {
        Some(Value::String(cmd)) => cmd.clone(),
        Some(other) => return Err(invalid(name, "cmd", "a string", other)),
        None => unreachable!("checked by the caller"),
    };

    let root = root.to_path_buf();
    Ok(RawTask::Callback(Callback::future(move || {
        let cmd = cmd.clone();
        let root = root.clone();
        async move {
            run_command(&cmd, &root).await?;
            Ok::<(), anyhow::Error>(())
        }
    })))
}

/// Convert a descriptor table. Also used for `[template]`.
pub fn descriptor(name: &str, table: &toml::Table, root: &Path) -> Result<Descriptor> {
    let mut d = Descriptor::default();

    for (key, value) in table {
        match key.as_str() {
            "source" => d.source = Some(source(value)),
            "base" => d.base = Some(PathBuf::from(string(name, key, value)?)),
            "transforms" => d.transforms = Some(transforms(name, value, root)?),
            "rename" => d.rename = Some(rename(name, value)?),
            "destination" => d.destination = Some(destination(name, value)?),
            "watch" => d.watch = Some(watch(name, value)?),
            "task" => d.task = Some(Box::new(raw_task(name, value, root)?)),
            "series" => d.series = Some(members(name, key, value, root)?),
            "parallel" => d.parallel = Some(members(name, key, value, root)?),
            other => warn!(task = name, key = other, "ignoring unknown task field"),
        }
    }

    Ok(d)
}

fn source(value: &Value) -> Source {
    match value {
        Value::String(pattern) => Source::Glob(pattern.clone()),
        Value::Table(t) => match (t.get("path"), t.get("contents")) {
            (Some(Value::String(path)), Some(Value::String(contents))) => {
                let file = VirtualFile::new(path.as_str(), contents.as_bytes());
                match t.get("base") {
                    Some(Value::String(base)) => Source::Inline(file.with_base(base.as_str())),
                    _ => Source::Inline(file),
                }
            }
            _ => Source::Unsupported("a table without string `path` and `contents`".to_string()),
        },
        other => Source::Unsupported(kind(other).to_string()),
    }
}

fn transforms(name: &str, value: &Value, root: &Path) -> Result<Vec<Transform>> {
    let Value::Array(items) = value else {
        return Err(invalid(name, "transforms", "an array of commands", value));
    };

    items
        .iter()
        .map(|item| {
            let cmd = string(name, "transforms", item)?.to_string();
            let root = root.to_path_buf();
            Ok(Transform::per_file(move |contents, _file| {
                let cmd = cmd.clone();
                let root = root.clone();
                async move {
                    let output = filter_through(&cmd, &root, contents).await?;
                    Ok::<_, anyhow::Error>(output)
                }
            }))
        })
        .collect()
}

fn rename(name: &str, value: &Value) -> Result<Rename> {
    match value {
        Value::String(path) => Ok(Rename::Path(path.clone())),
        Value::Table(t) => {
            let part = |key: &str| -> Result<Option<String>> {
                t.get(key)
                    .map(|v| string(name, "rename", v).map(str::to_string))
                    .transpose()
            };
            Ok(Rename::Parts(RenameParts {
                dirname: part("dirname")?,
                basename: part("basename")?,
                prefix: part("prefix")?,
                suffix: part("suffix")?,
                extname: part("extname")?,
            }))
        }
        other => Err(invalid(name, "rename", "a path or a table of parts", other)),
    }
}

fn destination(name: &str, value: &Value) -> Result<Destination> {
    match value {
        Value::String(dir) => Ok(Destination::Directory(PathBuf::from(dir))),
        Value::Boolean(false) => Ok(Destination::Skip),
        other => Err(invalid(name, "destination", "a directory or `false`", other)),
    }
}

fn watch(name: &str, value: &Value) -> Result<Watch> {
    match value {
        Value::Boolean(true) => Ok(Watch::Source),
        Value::Boolean(false) => Ok(Watch::Off),
        Value::String(path) => Ok(Watch::Paths(vec![path.clone()])),
        Value::Array(items) => {
            let paths = items
                .iter()
                .map(|item| string(name, "watch", item).map(str::to_string))
                .collect::<Result<Vec<_>>>()?;
            Ok(Watch::Paths(paths))
        }
        other => Err(invalid(name, "watch", "a boolean, a path or a list of paths", other)),
    }
}

fn members(name: &str, key: &str, value: &Value, root: &Path) -> Result<Vec<RawTask>> {
    let Value::Array(items) = value else {
        return Err(invalid(name, key, "an array of tasks", value));
    };
    items.iter().map(|item| raw_task(name, item, root)).collect()
}

fn string<'v>(name: &str, field: &str, value: &'v Value) -> Result<&'v str> {
    value
        .as_str()
        .ok_or_else(|| invalid(name, field, "a string", value))
}

fn invalid(name: &str, field: &str, expected: &'static str, value: &Value) -> PipedagError {
    PipedagError::InvalidField {
        task: name.to_string(),
        field: field.to_string(),
        expected,
        found: kind(value),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "a string",
        Value::Integer(_) => "an integer",
        Value::Float(_) => "a float",
        Value::Boolean(_) => "a boolean",
        Value::Datetime(_) => "a datetime",
        Value::Array(_) => "an array",
        Value::Table(_) => "a table",
    }
}
