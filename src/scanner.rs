//! Source-root scanning: walks directory trees and applies include/exclude
//! glob patterns to pick the files worth cross-referencing.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::error::Error;

/// Include pattern applied when the caller supplies none.
pub const DEFAULT_INCLUDES: [&str; 1] = ["**/*.java"];

/// Always-on excludes, composed with the caller's list at build time.
/// `package-info.java` files carry no linkable declarations and the
/// generated pages for them would shadow real content.
const BUILTIN_EXCLUDES: [&str; 1] = ["**/package-info.java"];

/// Compiled include/exclude filter for one run.
#[derive(Debug)]
pub struct SourceFilter {
    exclude: GlobSet,
    include: GlobSet,
}

impl SourceFilter {
    /// Build a filter from caller patterns, substituting the default
    /// include when the list is empty and always appending the built-in
    /// excludes.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPattern` for a pattern globset rejects.
    pub fn with_defaults(includes: &[String], excludes: &[String]) -> Result<Self, Error> {
        let mut include_patterns: Vec<&str> = includes.iter().map(String::as_str).collect();
        if include_patterns.is_empty() {
            include_patterns.extend(DEFAULT_INCLUDES);
        }

        let mut exclude_patterns: Vec<&str> = excludes.iter().map(String::as_str).collect();
        exclude_patterns.extend(BUILTIN_EXCLUDES);

        Ok(SourceFilter {
            include: build_globset(&include_patterns)?,
            exclude: build_globset(&exclude_patterns)?,
        })
    }

    /// Whether a path, relative to its source root, passes the filter.
    pub fn matches(&self, relative: &Path) -> bool {
        self.include.is_match(relative) && !self.exclude.is_match(relative)
    }

    /// Walk a source root and collect every matching file, sorted by path
    /// so runs over the same tree are deterministic. Hidden (dot-prefixed)
    /// directories are never descended into.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the walk cannot read a directory.
    pub fn find_sources(&self, root: &Path) -> Result<Vec<PathBuf>, Error> {
        let mut files = Vec::new();

        let walk = WalkDir::new(root)
            .into_iter()
            .filter_entry(|e| !is_hidden(e.path(), root));
        for entry in walk {
            let entry = entry.map_err(|e| {
                Error::Io(e.into_io_error().unwrap_or_else(|| {
                    std::io::Error::other("walkdir loop")
                }))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let relative = path.strip_prefix(root).unwrap_or(path);
            if self.matches(relative) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    /// Keep only roots that actually contain matching source files,
    /// preserving order and dropping duplicates. Roots that fail to read
    /// are dropped rather than failing the run — a configured-but-absent
    /// directory is routine in multi-module builds.
    pub fn prune_roots(&self, roots: &[PathBuf]) -> Vec<PathBuf> {
        let mut pruned: Vec<PathBuf> = Vec::with_capacity(roots.len());
        for root in roots {
            if pruned.contains(root) {
                continue;
            }
            let has_sources = self
                .find_sources(root)
                .map(|files| !files.is_empty())
                .unwrap_or(false);
            if has_sources {
                pruned.push(root.clone());
            }
        }
        pruned
    }
}

/// Compile a pattern list into a single matcher.
fn build_globset(patterns: &[&str]) -> Result<GlobSet, Error> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| Error::InvalidPattern {
            pattern: (*pattern).to_owned(),
            reason: e.to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| Error::InvalidPattern {
        pattern: patterns.join(", "),
        reason: e.to_string(),
    })
}

/// Whether a path below the root starts with a dot component.
fn is_hidden(path: &Path, root: &Path) -> bool {
    if path == root {
        return false;
    }
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}
