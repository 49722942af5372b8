//! Orchestration for `leafmark check` and `leafmark create`.
//!
//! Packages are processed one after another in manifest path order. Each
//! package's leaves are located, the marker policy is applied to each, and in
//! create mode the manifest is bumped. Report lines are written as events
//! happen; the accumulated `RunReport` is returned for the exit policy.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::core::report::{BumpOutcome, LeafRecord, PackageReport, RunReport};
use crate::core::types::Mode;
use crate::io::config::MarkerConfig;
use crate::io::discover::{Package, discover_packages};
use crate::io::locator::leaf_dirs;
use crate::io::manifest::bump_manifest;
use crate::io::marker::apply_marker;

/// Run marker maintenance over every package under `root`.
///
/// Fatal I/O errors abort the run; markers and manifests already written by
/// earlier packages stay as written.
pub fn run_markers<W: Write>(
    root: &Path,
    mode: Mode,
    config: &MarkerConfig,
    out: &mut W,
) -> Result<RunReport> {
    info!(root = %root.display(), %mode, "starting run");
    let packages = discover_packages(root, config)
        .with_context(|| format!("discover manifests under {}", root.display()))?;

    let report = packages
        .iter()
        .try_fold(RunReport::new(mode), |report, package| {
            let processed = process_package(root, package, mode, config, &mut *out)
                .with_context(|| format!("process package {}", package.manifest.display()))?;
            Ok::<_, anyhow::Error>(match processed {
                Some(package_report) => report.with_package(package_report),
                None => report,
            })
        })?;

    writeln!(out, "{}", report.summary_line(&config.marker_file)).context("write summary")?;
    info!(
        leaves = report.leaf_count(),
        exit_code = report.exit_code(),
        "run finished"
    );
    Ok(report)
}

/// Process one package. Returns `None` when it has no source tree.
fn process_package<W: Write>(
    root: &Path,
    package: &Package,
    mode: Mode,
    config: &MarkerConfig,
    out: &mut W,
) -> Result<Option<PackageReport>> {
    let Some(source_tree) = &package.source_tree else {
        debug!(manifest = %package.manifest.display(), "no source tree, skipping");
        return Ok(None);
    };

    let mut leaves = Vec::new();
    for dir in leaf_dirs(source_tree, config) {
        let dir = dir?;
        let outcome = apply_marker(&dir, &config.marker_file, mode)?;
        let rel = relative(root, &dir);
        writeln!(out, "{}: {}", outcome.label(), rel.display()).context("write report")?;
        leaves.push(LeafRecord { dir: rel, outcome });
    }

    let mut report = PackageReport {
        manifest: relative(root, &package.manifest),
        leaves,
        bump: None,
    };

    if mode == Mode::Create && config.bump.should_bump(&report.outcomes()) {
        let bump = bump_manifest(&package.manifest)?;
        let written = match &bump {
            BumpOutcome::Bumped { old, new } => {
                writeln!(out, "bumped: {} {old} -> {new}", report.manifest.display())
            }
            BumpOutcome::Skipped { reason } => {
                writeln!(out, "skipped: {} ({reason})", report.manifest.display())
            }
        };
        written.context("write report")?;
        report.bump = Some(bump);
    }

    Ok(Some(report))
}

fn relative(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}
