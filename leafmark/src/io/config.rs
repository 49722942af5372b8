//! Marker conventions stored in `leafmark.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::types::BumpPolicy;

/// Config file looked up at the repository root when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "leafmark.toml";

/// Marker conventions (TOML).
///
/// Every field is optional in the file; missing fields take the defaults of a
/// Python namespace-package monorepo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MarkerConfig {
    /// Name of the zero-byte sentinel placed in each leaf directory.
    pub marker_file: String,

    /// Extensions (without the dot) that make a file a source file.
    pub source_extensions: Vec<String>,

    /// Source tree directory name, sibling to each manifest.
    pub source_dir: String,

    /// File name identifying a package manifest.
    pub manifest_file: String,

    /// Directory names never descended into while discovering manifests.
    pub exclude_dirs: Vec<String>,

    /// When create mode bumps a manifest's patch version.
    pub bump: BumpPolicy,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            marker_file: "py.typed".to_string(),
            source_extensions: vec!["py".to_string()],
            source_dir: "llama_index".to_string(),
            manifest_file: "pyproject.toml".to_string(),
            exclude_dirs: vec![".git".to_string()],
            bump: BumpPolicy::default(),
        }
    }
}

impl MarkerConfig {
    pub fn validate(&self) -> Result<()> {
        validate_file_name("marker_file", &self.marker_file)?;
        validate_file_name("source_dir", &self.source_dir)?;
        validate_file_name("manifest_file", &self.manifest_file)?;
        if self.source_extensions.is_empty() {
            return Err(anyhow!("source_extensions must not be empty"));
        }
        for ext in &self.source_extensions {
            if ext.trim().is_empty() {
                return Err(anyhow!("source_extensions entries must not be empty"));
            }
            if ext.starts_with('.') {
                return Err(anyhow!(
                    "source_extensions entries must not start with '.' (got '{ext}')"
                ));
            }
        }
        Ok(())
    }

    /// True if `ext` (no leading dot) is a configured source extension.
    pub fn is_source_extension(&self, ext: &str) -> bool {
        self.source_extensions.iter().any(|candidate| candidate == ext)
    }
}

fn validate_file_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(anyhow!("{field} must not be empty"));
    }
    if value.contains('/') || value.contains('\\') {
        return Err(anyhow!("{field} must be a bare name (got '{value}')"));
    }
    if value == "." || value == ".." {
        return Err(anyhow!("{field} must not be '{value}'"));
    }
    Ok(())
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `MarkerConfig::default()`.
pub fn load_config(path: &Path) -> Result<MarkerConfig> {
    if !path.exists() {
        let cfg = MarkerConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: MarkerConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Resolve the config for a run.
///
/// An explicit path must exist; otherwise `<root>/leafmark.toml` is used when
/// present, falling back to defaults.
pub fn resolve_config(root: &Path, explicit: Option<&Path>) -> Result<MarkerConfig> {
    let path: PathBuf = match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(anyhow!("config file not found: {}", path.display()));
            }
            path.to_path_buf()
        }
        None => root.join(CONFIG_FILE_NAME),
    };
    debug!(path = %path.display(), exists = path.exists(), "loading config");
    load_config(&path)
}
