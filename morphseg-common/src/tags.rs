//! Morph tag kinds

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Part-class tag assigned to a morph
///
/// Serialized with the short wire names used by the backend (`PRE`, `STM`, `SUF`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagKind {
    #[serde(rename = "PRE")]
    Prefix,
    #[serde(rename = "STM")]
    Stem,
    #[serde(rename = "SUF")]
    Suffix,
}

impl TagKind {
    /// All tag kinds in presentation order
    pub const ALL: [TagKind; 3] = [TagKind::Prefix, TagKind::Stem, TagKind::Suffix];

    /// Short wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            TagKind::Prefix => "PRE",
            TagKind::Stem => "STM",
            TagKind::Suffix => "SUF",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TagKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PRE" | "PREFIX" => Ok(TagKind::Prefix),
            "STM" | "STEM" => Ok(TagKind::Stem),
            "SUF" | "SUFFIX" => Ok(TagKind::Suffix),
            other => Err(format!("unknown tag '{}'", other)),
        }
    }
}
