//! Document id and bundle reference grammars.
//!
//! - Document ids: `doc:<tier>:<name>`
//! - Bundle references: `bundle:<name>[:<version>]`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Governance tier of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Meta,
    Project,
    Standards,
}

impl Tier {
    /// All tiers, in declaration order.
    pub const ALL: [Tier; 3] = [Tier::Meta, Tier::Project, Tier::Standards];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Meta => "meta",
            Tier::Project => "project",
            Tier::Standards => "standards",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "meta" => Ok(Tier::Meta),
            "project" => Ok(Tier::Project),
            "standards" => Ok(Tier::Standards),
            _ => Err(format!("unknown tier: {}", s)),
        }
    }
}

/// A parsed document id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocId {
    pub tier: Tier,
    pub name: String,
}

impl DocId {
    /// Parse `doc:<tier>:<name>`.
    ///
    /// Returns `None` when the prefix is wrong, the tier is unknown, or the
    /// name is empty or could leave its directory once used as a file name.
    /// Other character-level rules for the name are left to the configurable
    /// id pattern of the semantic level.
    pub fn parse(id: &str) -> Option<Self> {
        let rest = id.strip_prefix("doc:")?;
        let (tier, name) = rest.split_once(':')?;
        if !is_file_name_safe(name) {
            return None;
        }
        Some(Self {
            tier: tier.parse().ok()?,
            name: name.to_string(),
        })
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc:{}:{}", self.tier, self.name)
    }
}

/// Names are joined onto lookup directories, so no separators or `..`.
fn is_file_name_safe(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && !name.contains("..")
}

/// Extract the tier from a document id.
///
/// Only the first two segments are looked at, so relationship targets with
/// unusual names still resolve to a tier.
pub fn tier_of(id: &str) -> Option<Tier> {
    let mut parts = id.split(':');
    if parts.next()? != "doc" {
        return None;
    }
    parts.next()?.parse().ok()
}

/// A parsed bundle reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleRef {
    pub name: String,
    pub version: Option<String>,
}

impl BundleRef {
    /// Parse `bundle:<name>` or `bundle:<name>:<version>`.
    pub fn parse(reference: &str) -> Option<Self> {
        let rest = reference.strip_prefix("bundle:")?;
        let (name, version) = match rest.split_once(':') {
            Some((name, version)) => (name, Some(version.to_string())),
            None => (rest, None),
        };
        if !is_file_name_safe(name) {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            version,
        })
    }

    /// Classify the referenced bundle by name.
    pub fn kind(&self) -> ImportKind {
        match self.name.as_str() {
            "meta" => ImportKind::Meta,
            "standards" => ImportKind::Standards,
            _ => ImportKind::Domain,
        }
    }
}

/// Classification of an imported bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    Meta,
    Standards,
    Domain,
}
