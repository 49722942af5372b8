//! Stable exit codes for leafmark CLI commands.

/// Check found every marker present, or create completed.
pub const OK: i32 = 0;
/// Usage error, missing markers in check mode, or a fatal filesystem error.
pub const FAILURE: i32 = 1;
