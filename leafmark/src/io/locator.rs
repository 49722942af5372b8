//! Leaf directory discovery under a package source tree.
//!
//! A directory is a leaf when it directly contains a source file. Leaves are
//! emitted and never descended into; every other directory is a container
//! whose subdirectories are visited in file-name order.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::core::types::Classification;
use crate::io::config::MarkerConfig;

/// Direct-children view of one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirListing {
    pub classification: Classification,
    /// Subdirectories sorted by file name. Empty for leaves.
    pub subdirs: Vec<PathBuf>,
}

/// Classify `dir` by looking only at its direct children.
pub fn classify_dir(dir: &Path, config: &MarkerConfig) -> Result<DirListing> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("read directory {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("read entries of {}", dir.display()))?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut subdirs = Vec::new();
    for entry in entries {
        let path = entry.path();
        let file_type = entry
            .file_type()
            .with_context(|| format!("stat {}", path.display()))?;
        let (is_file, is_dir) = if file_type.is_symlink() {
            match fs::metadata(&path) {
                Ok(meta) => (meta.is_file(), meta.is_dir()),
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    warn!(path = %path.display(), "skipping dangling symlink");
                    continue;
                }
                Err(err) => {
                    return Err(err)
                        .with_context(|| format!("stat symlink target {}", path.display()));
                }
            }
        } else {
            (file_type.is_file(), file_type.is_dir())
        };

        if is_file && is_source_file(&path, config) {
            return Ok(DirListing {
                classification: Classification::LeafWithSources,
                subdirs: Vec::new(),
            });
        }
        if is_dir {
            subdirs.push(path);
        }
    }

    Ok(DirListing {
        classification: Classification::Container,
        subdirs,
    })
}

fn is_source_file(path: &Path, config: &MarkerConfig) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| config.is_source_extension(ext))
}

/// Lazy, depth-first iterator over leaf directories.
///
/// Yields directories in sorted pre-order. The first error ends iteration.
pub struct LeafDirs<'a> {
    config: &'a MarkerConfig,
    stack: Vec<PathBuf>,
    visited: HashSet<PathBuf>,
}

/// Walk `root` and yield every leaf directory beneath it (including `root`).
pub fn leaf_dirs<'a>(root: &Path, config: &'a MarkerConfig) -> LeafDirs<'a> {
    LeafDirs {
        config,
        stack: vec![root.to_path_buf()],
        visited: HashSet::new(),
    }
}

impl LeafDirs<'_> {
    fn fail(&mut self, err: anyhow::Error) -> Option<Result<PathBuf>> {
        self.stack.clear();
        Some(Err(err))
    }
}

impl Iterator for LeafDirs<'_> {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(dir) = self.stack.pop() {
            let canonical = match fs::canonicalize(&dir)
                .with_context(|| format!("resolve {}", dir.display()))
            {
                Ok(path) => path,
                Err(err) => return self.fail(err),
            };
            if !self.visited.insert(canonical) {
                debug!(dir = %dir.display(), "already visited, skipping");
                continue;
            }

            let listing = match classify_dir(&dir, self.config) {
                Ok(listing) => listing,
                Err(err) => return self.fail(err),
            };
            match listing.classification {
                Classification::LeafWithSources => {
                    debug!(dir = %dir.display(), "leaf directory");
                    return Some(Ok(dir));
                }
                Classification::Container => {
                    self.stack.extend(listing.subdirs.into_iter().rev());
                }
            }
        }
        None
    }
}
