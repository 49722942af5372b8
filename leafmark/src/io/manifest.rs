//! Patch version bumps for package manifests on disk.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::core::report::BumpOutcome;
use crate::core::version::bump_manifest_text;

/// Bump the first `version = "X.Y.Z"` line of the manifest at `path`.
///
/// Manifests without a usable version are left untouched and reported as
/// `Skipped`. Read and write failures are errors.
pub fn bump_manifest(path: &Path) -> Result<BumpOutcome> {
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let rewrite = match bump_manifest_text(&contents) {
        Ok(rewrite) => rewrite,
        Err(reason) => {
            warn!(manifest = %path.display(), %reason, "skipping version bump");
            return Ok(BumpOutcome::Skipped { reason });
        }
    };
    write_atomic(path, &rewrite.contents)?;
    info!(
        manifest = %path.display(),
        old = %rewrite.old,
        new = %rewrite.new,
        "bumped version"
    );
    Ok(BumpOutcome::Bumped {
        old: rewrite.old,
        new: rewrite.new,
    })
}

/// Replace `path` via a sibling temp file and rename, keeping its permissions.
///
/// The temp file is removed again if any step fails.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let tmp_path = temp_sibling(path);
    let permissions = fs::metadata(path)
        .with_context(|| format!("stat {}", path.display()))?
        .permissions();
    let replaced = fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp manifest {}", tmp_path.display()))
        .and_then(|()| {
            fs::set_permissions(&tmp_path, permissions)
                .with_context(|| format!("set permissions on {}", tmp_path.display()))
        })
        .and_then(|()| {
            fs::rename(&tmp_path, path)
                .with_context(|| format!("replace manifest {}", path.display()))
        });
    if replaced.is_err() && tmp_path.exists() {
        fs::remove_file(&tmp_path).ok();
    }
    replaced
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("manifest"));
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::version::{SkipReason, Version};

    const PYPROJECT: &str = "[tool.poetry]\nname = \"llama-index-llms-demo\"\nversion = \"0.1.2\"\n\n[tool.poetry.dependencies]\npython = \">=3.8.1,<4.0\"\n";

    #[test]
    fn bumps_twice_and_preserves_other_lines() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("pyproject.toml");
        fs::write(&path, PYPROJECT).expect("write");

        let first = bump_manifest(&path).expect("bump");
        assert_eq!(
            first,
            BumpOutcome::Bumped {
                old: Version::parse("0.1.2").expect("parse"),
                new: Version::parse("0.1.3").expect("parse"),
            }
        );
        bump_manifest(&path).expect("bump");

        let contents = fs::read_to_string(&path).expect("read");
        assert_eq!(
            contents,
            PYPROJECT.replace("version = \"0.1.2\"", "version = \"0.1.4\"")
        );
        assert!(!temp.path().join("pyproject.toml.tmp").exists());
    }

    #[test]
    fn unparseable_version_is_left_untouched() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("pyproject.toml");
        let doc = "[project]\nversion = \"latest\"\n";
        fs::write(&path, doc).expect("write");

        let outcome = bump_manifest(&path).expect("bump");
        assert_eq!(
            outcome,
            BumpOutcome::Skipped {
                reason: SkipReason::Unparseable("latest".to_string())
            }
        );
        assert_eq!(fs::read_to_string(&path).expect("read"), doc);
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = bump_manifest(&temp.path().join("pyproject.toml")).expect_err("should fail");
        assert!(err.to_string().starts_with("read "));
    }

    /// Verifies a failed rename does not leave the temp sibling behind.
    ///
    /// A non-empty directory sits where the manifest should be, so the final
    /// rename fails after the temp file has been written.
    #[cfg(unix)]
    #[test]
    fn failed_replace_removes_temp_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("pyproject.toml");
        fs::create_dir_all(&path).expect("mkdir");
        fs::write(path.join("keep"), "").expect("write");

        let err = write_atomic(&path, "version = \"0.1.0\"\n").expect_err("should fail");
        assert!(format!("{err:#}").contains("replace manifest"));
        assert!(!temp.path().join("pyproject.toml.tmp").exists());
    }

    #[test]
    fn temp_sibling_appends_suffix() {
        assert_eq!(
            temp_sibling(Path::new("pkg/pyproject.toml")),
            PathBuf::from("pkg/pyproject.toml.tmp")
        );
    }
}
