//! Run accumulator and exit policy.
//!
//! A `RunReport` is built by folding one `PackageReport` per manifest into it.
//! It is a plain value threaded through the run loop, never shared state.

use std::path::PathBuf;

use serde::Serialize;

use crate::core::types::{MarkerOutcome, Mode};
use crate::core::version::{SkipReason, Version};
use crate::exit_codes;

/// Marker outcome for one leaf directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeafRecord {
    pub dir: PathBuf,
    pub outcome: MarkerOutcome,
}

/// What happened to a package manifest in this run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum BumpOutcome {
    Bumped { old: Version, new: Version },
    Skipped { reason: SkipReason },
}

/// Everything recorded for a single package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageReport {
    pub manifest: PathBuf,
    pub leaves: Vec<LeafRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bump: Option<BumpOutcome>,
}

impl PackageReport {
    pub fn outcomes(&self) -> Vec<MarkerOutcome> {
        self.leaves.iter().map(|leaf| leaf.outcome).collect()
    }
}

/// Aggregate result of a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub mode: Mode,
    pub packages: Vec<PackageReport>,
}

impl RunReport {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            packages: Vec::new(),
        }
    }

    /// Fold a package into the report.
    pub fn with_package(mut self, package: PackageReport) -> Self {
        self.packages.push(package);
        self
    }

    pub fn leaf_count(&self) -> usize {
        self.packages.iter().map(|pkg| pkg.leaves.len()).sum()
    }

    pub fn count(&self, outcome: MarkerOutcome) -> usize {
        self.packages
            .iter()
            .flat_map(|pkg| &pkg.leaves)
            .filter(|leaf| leaf.outcome == outcome)
            .count()
    }

    pub fn bumped_count(&self) -> usize {
        self.packages
            .iter()
            .filter(|pkg| matches!(pkg.bump, Some(BumpOutcome::Bumped { .. })))
            .count()
    }

    pub fn has_missing(&self) -> bool {
        self.count(MarkerOutcome::Missing) > 0
    }

    /// Check mode fails when any marker is missing; create mode reaching this
    /// point has completed without fatal errors.
    pub fn exit_code(&self) -> i32 {
        match self.mode {
            Mode::Check if self.has_missing() => exit_codes::FAILURE,
            _ => exit_codes::OK,
        }
    }

    /// One-line human summary.
    pub fn summary_line(&self, marker_file: &str) -> String {
        match self.mode {
            Mode::Check => format!(
                "check: {}, {} missing {}",
                counted(self.leaf_count(), "leaf directory", "leaf directories"),
                self.count(MarkerOutcome::Missing),
                marker_file
            ),
            Mode::Create => format!(
                "create: {}, {} created, {} bumped",
                counted(self.leaf_count(), "leaf directory", "leaf directories"),
                counted(self.count(MarkerOutcome::Created), "marker", "markers"),
                counted(self.bumped_count(), "manifest", "manifests")
            ),
        }
    }
}

fn counted(count: usize, singular: &str, plural: &str) -> String {
    let noun = if count == 1 { singular } else { plural };
    format!("{count} {noun}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(outcomes: &[MarkerOutcome], bump: Option<BumpOutcome>) -> PackageReport {
        PackageReport {
            manifest: PathBuf::from("pkg/pyproject.toml"),
            leaves: outcomes
                .iter()
                .enumerate()
                .map(|(i, outcome)| LeafRecord {
                    dir: PathBuf::from(format!("pkg/src/{i}")),
                    outcome: *outcome,
                })
                .collect(),
            bump,
        }
    }

    /// Verifies summary nouns follow their counts.
    #[test]
    fn summary_uses_singular_for_one() {
        let report = RunReport::new(Mode::Check)
            .with_package(package(&[MarkerOutcome::Missing], None));
        assert_eq!(
            report.summary_line("py.typed"),
            "check: 1 leaf directory, 1 missing py.typed"
        );

        let report = RunReport::new(Mode::Create).with_package(package(
            &[MarkerOutcome::Created],
            Some(BumpOutcome::Bumped {
                old: Version::parse("1.0.0").expect("parse"),
                new: Version::parse("1.0.1").expect("parse"),
            }),
        ));
        assert_eq!(
            report.summary_line("py.typed"),
            "create: 1 leaf directory, 1 marker created, 1 manifest bumped"
        );
    }

    #[test]
    fn empty_check_run_succeeds() {
        let report = RunReport::new(Mode::Check);
        assert_eq!(report.exit_code(), exit_codes::OK);
        assert_eq!(report.summary_line("py.typed"), "check: 0 leaf directories, 0 missing py.typed");
    }

    /// Verifies a single missing marker anywhere flips the check exit code.
    #[test]
    fn any_missing_fails_check() {
        let report = RunReport::new(Mode::Check)
            .with_package(package(&[MarkerOutcome::Present], None))
            .with_package(package(&[MarkerOutcome::Present, MarkerOutcome::Missing], None));
        assert!(report.has_missing());
        assert_eq!(report.exit_code(), exit_codes::FAILURE);
        assert_eq!(report.leaf_count(), 3);
    }

    #[test]
    fn create_run_counts_creations_and_bumps() {
        let bumped = BumpOutcome::Bumped {
            old: Version::parse("0.1.0").expect("parse"),
            new: Version::parse("0.1.1").expect("parse"),
        };
        let report = RunReport::new(Mode::Create)
            .with_package(package(&[MarkerOutcome::Created, MarkerOutcome::Present], Some(bumped)))
            .with_package(package(
                &[MarkerOutcome::Created],
                Some(BumpOutcome::Skipped {
                    reason: SkipReason::NoVersionLine,
                }),
            ));
        assert_eq!(report.exit_code(), exit_codes::OK);
        assert_eq!(
            report.summary_line("py.typed"),
            "create: 3 leaf directories, 2 markers created, 1 manifest bumped"
        );
    }
}
