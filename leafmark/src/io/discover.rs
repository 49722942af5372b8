//! Package manifest discovery.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;
use walkdir::WalkDir;

use crate::io::config::MarkerConfig;

/// A package manifest and the source tree it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub manifest: PathBuf,
    /// `<manifest dir>/<source_dir>`; `None` when that directory does not exist.
    pub source_tree: Option<PathBuf>,
}

/// Find every manifest under `root`, sorted by path.
///
/// Directories named in `exclude_dirs` are pruned. Symlinks are not followed.
pub fn discover_manifests(root: &Path, config: &MarkerConfig) -> Result<Vec<PathBuf>> {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            !(entry.depth() > 0
                && entry.file_type().is_dir()
                && config
                    .exclude_dirs
                    .iter()
                    .any(|name| entry.file_name() == name.as_str()))
        });

    let mut manifests = Vec::new();
    for entry in walker {
        let entry = entry.with_context(|| format!("walk {}", root.display()))?;
        if entry.file_type().is_file() && entry.file_name() == config.manifest_file.as_str() {
            manifests.push(entry.into_path());
        }
    }
    manifests.sort();
    manifests.dedup();
    debug!(root = %root.display(), count = manifests.len(), "discovered manifests");
    Ok(manifests)
}

/// Resolve the source tree sibling to `manifest`.
pub fn resolve_package(manifest: PathBuf, config: &MarkerConfig) -> Package {
    let source_tree = manifest
        .parent()
        .map(|dir| dir.join(&config.source_dir))
        .filter(|dir| dir.is_dir());
    Package {
        manifest,
        source_tree,
    }
}

/// Discover manifests and resolve each one's source tree.
pub fn discover_packages(root: &Path, config: &MarkerConfig) -> Result<Vec<Package>> {
    Ok(discover_manifests(root, config)?
        .into_iter()
        .map(|manifest| resolve_package(manifest, config))
        .collect())
}
