//! Type-marker maintenance for multi-package source trees.
//!
//! For every package manifest in a repository, leafmark finds the leaf source
//! directories under the package's source tree and checks or creates a marker
//! file in each. In create mode it also bumps the manifest's patch version.
//!
//! - **[`core`]**: Pure, deterministic logic (versions, outcomes, run report).
//! - **[`io`]**: Filesystem adapters (config, discovery, traversal, writes).
//!
//! [`run`] coordinates the two to implement the CLI.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod run;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
