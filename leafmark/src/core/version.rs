//! Typed `major.minor.patch` versions and manifest text rewriting.
//!
//! Parsing fails closed: anything that is not exactly three dot-separated
//! decimal integers is reported as a skip, never coerced.

use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static VERSION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^version = "([^"\r\n]*)"\r?$"#).expect("version line regex")
});

static VERSION_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)$")
        .expect("version value regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Parse a strict `X.Y.Z` string. Returns `None` on any deviation.
    pub fn parse(value: &str) -> Option<Self> {
        let caps = VERSION_VALUE.captures(value)?;
        Some(Self {
            major: caps[1].parse().ok()?,
            minor: caps[2].parse().ok()?,
            patch: caps[3].parse().ok()?,
        })
    }

    /// Increment the patch component. `None` if it would overflow.
    pub fn bump_patch(self) -> Option<Self> {
        Some(Self {
            patch: self.patch.checked_add(1)?,
            ..self
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Why a manifest was left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoVersionLine,
    Unparseable(String),
    PatchOverflow,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoVersionLine => f.write_str("no version line"),
            SkipReason::Unparseable(value) => write!(f, "unparseable version \"{value}\""),
            SkipReason::PatchOverflow => f.write_str("patch component overflow"),
        }
    }
}

/// A manifest rewrite ready to be written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub old: Version,
    pub new: Version,
    pub contents: String,
}

/// Locate the first `version = "…"` line; returns the value and its byte range.
fn find_version_value(contents: &str) -> Option<(&str, Range<usize>)> {
    let caps = VERSION_LINE.captures(contents)?;
    let value = caps.get(1)?;
    Some((value.as_str(), value.range()))
}

/// Produce manifest text with the first version line's patch bumped.
///
/// Only the quoted value of that line changes; every other byte is preserved.
pub fn bump_manifest_text(contents: &str) -> Result<Rewrite, SkipReason> {
    let (raw, range) = find_version_value(contents).ok_or(SkipReason::NoVersionLine)?;
    let old = Version::parse(raw).ok_or_else(|| SkipReason::Unparseable(raw.to_string()))?;
    let new = old.bump_patch().ok_or(SkipReason::PatchOverflow)?;

    let mut updated = String::with_capacity(contents.len() + 1);
    updated.push_str(&contents[..range.start]);
    updated.push_str(&new.to_string());
    updated.push_str(&contents[range.end..]);

    Ok(Rewrite {
        old,
        new,
        contents: updated,
    })
}
