//! Test-only helpers for building throwaway package repositories.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::io::config::MarkerConfig;

/// A temporary repository laid out with the default conventions.
pub struct TestRepo {
    temp: TempDir,
    config: MarkerConfig,
}

impl TestRepo {
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create tempdir")?;
        Ok(Self {
            temp,
            config: MarkerConfig::default(),
        })
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Write `contents` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, contents: &str) -> Result<PathBuf> {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    pub fn read(&self, rel: &str) -> Result<String> {
        let path = self.root().join(rel);
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))
    }

    /// Create a package at `dir` with a manifest and an empty source tree.
    pub fn package(&self, dir: &str, version: &str) -> Result<PathBuf> {
        let manifest = self.write(
            &format!("{dir}/{}", self.config.manifest_file),
            &format!(
                "[tool.poetry]\nname = \"{}\"\nversion = \"{version}\"\n\n[tool.poetry.dependencies]\npython = \">=3.8.1,<4.0\"\n",
                dir.replace('/', "-")
            ),
        )?;
        let source = self.root().join(dir).join(&self.config.source_dir);
        fs::create_dir_all(&source)
            .with_context(|| format!("create directory {}", source.display()))?;
        Ok(manifest)
    }

    /// Add an empty source file at `rel` inside the package's source tree.
    pub fn source(&self, package_dir: &str, rel: &str) -> Result<PathBuf> {
        self.write(
            &format!("{package_dir}/{}/{rel}", self.config.source_dir),
            "",
        )
    }

    /// Path of the marker file inside `dir` (relative to the repo root).
    pub fn marker(&self, dir: &str) -> PathBuf {
        self.root().join(dir).join(&self.config.marker_file)
    }

    /// Set unix permission bits on `rel`.
    #[cfg(unix)]
    pub fn set_mode(&self, rel: &str, mode: u32) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let path = self.root().join(rel);
        fs::set_permissions(&path, fs::Permissions::from_mode(mode))
            .with_context(|| format!("chmod {}", path.display()))
    }
}

/// True when permission bits are not enforced for this process (e.g. root).
///
/// Creates and removes a file inside `dir`, which the caller has made
/// read-only.
pub fn ignores_permissions(dir: &Path) -> bool {
    let check = dir.join(".leafmark-write-check");
    match fs::File::create(&check) {
        Ok(_) => {
            fs::remove_file(&check).ok();
            true
        }
        Err(_) => false,
    }
}
