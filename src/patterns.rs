// src/patterns.rs

//! Glob handling shared by the file-set source and the watcher.
//!
//! Patterns are relative to a project root and matched against
//! forward-slash relative paths such as `"src/main.css"`. A single `*`
//! never crosses a `/`; `**` does.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::errors::Result;
use crate::fs::FileSystem;

const GLOB_META: &[char] = &['*', '?', '[', ']', '{', '}', '!'];

/// Build a GlobSet from simple string patterns.
///
/// A leading `./` is dropped, since matched paths never carry one.
pub fn build_globset<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = GlobBuilder::new(strip_dot_slash(pat.as_ref()))
            .literal_separator(true)
            .build()?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

fn strip_dot_slash(pattern: &str) -> &str {
    pattern.strip_prefix("./").unwrap_or(pattern)
}

/// True if the pattern contains glob syntax.
pub fn is_glob(pattern: &str) -> bool {
    pattern.contains(GLOB_META)
}

/// The non-magic directory prefix of a pattern.
///
/// `"src/**/*.css"` -> `"src"`, `"*.txt"` -> `""`, and for a plain path
/// `"src/a.txt"` the parent directory `"src"`.
pub fn glob_parent(pattern: &str) -> PathBuf {
    let mut parent = PathBuf::new();
    let mut segments = pattern.split('/').peekable();

    while let Some(segment) = segments.next() {
        // The last segment names the file (or is magic); never part of the parent.
        if segments.peek().is_none() || is_glob(segment) {
            break;
        }
        if !segment.is_empty() && segment != "." {
            parent.push(segment);
        }
    }

    parent
}

/// An entry found while walking for a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matched {
    File(PathBuf),
    Dir(PathBuf),
}

/// Collect everything under `root` whose root-relative path matches one of
/// `patterns`. Results are sorted by path.
pub fn collect_matching(
    fs: &dyn FileSystem,
    root: &Path,
    patterns: &[String],
) -> Result<Vec<Matched>> {
    let set = build_globset(patterns)?;
    let mut found = Vec::new();

    let mut stack: Vec<PathBuf> = Vec::new();
    for pattern in patterns {
        let parent = glob_parent(pattern);
        let start = if parent.as_os_str().is_empty() {
            root.to_path_buf()
        } else {
            root.join(parent)
        };
        if fs.is_dir(&start) && !stack.contains(&start) {
            stack.push(start);
        }
    }

    while let Some(dir) = stack.pop() {
        for path in fs.read_dir(&dir)? {
            let Some(rel) = relative_slash(root, &path) else {
                continue;
            };
            let is_dir = fs.is_dir(&path);
            let matched = set.is_match(&rel);

            if is_dir {
                // Symlinked directories are listed but not descended into.
                if !fs.is_symlink(&path) {
                    stack.push(path.clone());
                }
                if matched {
                    found.push(Matched::Dir(path));
                }
            } else if matched && fs.is_file(&path) {
                found.push(Matched::File(path));
            }
        }
    }

    found.sort_by(|a, b| matched_path(a).cmp(matched_path(b)));
    found.dedup();
    Ok(found)
}

fn matched_path(m: &Matched) -> &Path {
    match m {
        Matched::File(p) | Matched::Dir(p) => p,
    }
}

/// `path` relative to `root`, with forward slashes.
pub fn relative_slash(root: &Path, path: &Path) -> Option<String> {
    path.strip_prefix(root)
        .ok()
        .map(|rel| rel.to_string_lossy().replace('\\', "/"))
}
