//! Semantic version parsing for document versions.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// The version sentinel for documents that are still being written.
pub const DRAFT: &str = "DRAFT";

// semver.org 2.0.0 grammar
const SEMVER_PATTERN: &str = r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-((?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*))?(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$";

static SEMVER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(SEMVER_PATTERN).unwrap());

/// A parsed semantic version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemVer {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Option<String>,
    pub build: Option<String>,
}

impl SemVer {
    /// Parse `major.minor.patch[-pre][+build]`.
    pub fn parse(version: &str) -> Result<Self, String> {
        let caps = SEMVER_REGEX
            .captures(version)
            .ok_or_else(|| format!("{} is not valid SemVer string", version))?;

        let number = |i: usize| -> Result<u64, String> {
            caps[i]
                .parse()
                .map_err(|_| format!("version component '{}' is too large", &caps[i]))
        };

        Ok(Self {
            major: number(1)?,
            minor: number(2)?,
            patch: number(3)?,
            pre: caps.get(4).map(|m| m.as_str().to_string()),
            build: caps.get(5).map(|m| m.as_str().to_string()),
        })
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{}", pre)?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}
