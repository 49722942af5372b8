//! Shared deterministic types for marker maintenance.
//!
//! These types define stable contracts between core components. They do not
//! depend on external state or I/O.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Run mode, selected once per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Report missing markers without touching the filesystem.
    Check,
    /// Create missing markers and bump package versions.
    Create,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Check => f.write_str("check"),
            Mode::Create => f.write_str("create"),
        }
    }
}

/// Classification of a visited directory under a source tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Directly contains at least one source file. Recursion stops here.
    LeafWithSources,
    /// No direct source files; children are visited.
    Container,
}

/// Result of applying the marker policy to one leaf directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerOutcome {
    /// Marker already exists.
    Present,
    /// Marker was absent and has been created (create mode only).
    Created,
    /// Marker is absent (check mode only).
    Missing,
}

impl MarkerOutcome {
    pub fn label(self) -> &'static str {
        match self {
            MarkerOutcome::Present => "present",
            MarkerOutcome::Created => "created",
            MarkerOutcome::Missing => "missing",
        }
    }
}

/// When a package manifest gets its patch version bumped in create mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpPolicy {
    /// Bump when the package has at least one leaf directory processed.
    #[default]
    Processed,
    /// Bump only when at least one marker was created for the package.
    Created,
    /// Never touch manifests.
    Never,
}

impl BumpPolicy {
    /// Decide whether a package qualifies for a bump given its leaf outcomes.
    pub fn should_bump(self, outcomes: &[MarkerOutcome]) -> bool {
        match self {
            BumpPolicy::Processed => !outcomes.is_empty(),
            BumpPolicy::Created => outcomes.contains(&MarkerOutcome::Created),
            BumpPolicy::Never => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processed_policy_requires_any_leaf() {
        assert!(!BumpPolicy::Processed.should_bump(&[]));
        assert!(BumpPolicy::Processed.should_bump(&[MarkerOutcome::Present]));
    }

    #[test]
    fn created_policy_requires_a_creation() {
        assert!(!BumpPolicy::Created.should_bump(&[MarkerOutcome::Present]));
        assert!(
            BumpPolicy::Created.should_bump(&[MarkerOutcome::Present, MarkerOutcome::Created])
        );
    }

    #[test]
    fn never_policy_never_bumps() {
        assert!(!BumpPolicy::Never.should_bump(&[MarkerOutcome::Created]));
    }
}
