//! Deterministic, pure logic shared by leafmark.
//!
//! Core modules are free of I/O side effects. They operate on in-memory values
//! and return deterministic outputs suitable for tests.

pub mod report;
pub mod types;
pub mod version;
