//! I/O adapters for leafmark runs.

pub mod config;
pub mod discover;
pub mod locator;
pub mod manifest;
pub mod marker;
