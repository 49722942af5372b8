//! Marker file policy for a single leaf directory.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::core::types::{MarkerOutcome, Mode};

/// Apply the marker policy to `leaf_dir`.
///
/// Check mode never writes. Create mode writes only when the marker is absent,
/// so applying twice yields `Created` then `Present`. Only a not-found stat
/// counts as absent; any other stat failure is an error.
pub fn apply_marker(leaf_dir: &Path, marker_file: &str, mode: Mode) -> Result<MarkerOutcome> {
    let marker = leaf_dir.join(marker_file);
    match fs::symlink_metadata(&marker) {
        Ok(_) => {
            debug!(marker = %marker.display(), "marker present");
            return Ok(MarkerOutcome::Present);
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err).with_context(|| format!("stat marker {}", marker.display()));
        }
    }

    match mode {
        Mode::Check => Ok(MarkerOutcome::Missing),
        Mode::Create => create_marker(&marker),
    }
}

fn create_marker(marker: &Path) -> Result<MarkerOutcome> {
    match OpenOptions::new().write(true).create_new(true).open(marker) {
        Ok(_) => {
            info!(marker = %marker.display(), "created marker");
            Ok(MarkerOutcome::Created)
        }
        Err(err) if err.kind() == ErrorKind::AlreadyExists => Ok(MarkerOutcome::Present),
        Err(err) => Err(err).with_context(|| format!("create marker {}", marker.display())),
    }
}
