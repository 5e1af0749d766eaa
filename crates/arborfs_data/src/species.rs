use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Growth preset selector.
///
/// A species fixes the young-age threshold and the leaf-slot capacity of
/// every branch in the tree. The presets themselves are configuration and
/// can be overridden in `config.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    /// Short-lived growth window, few leaf slots per branch.
    #[default]
    Birch,
    /// One-year growth window, many leaf slots per branch.
    Spruce,
}

/// Species-derived growth constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesTraits {
    /// Years since creation during which a branch may still spawn
    /// descendants. A branch exactly at the threshold is no longer young.
    pub young_threshold: u64,
    /// Maximum number of leaves a single branch can hold.
    pub leaf_capacity: usize,
}

impl Species {
    #[must_use]
    pub fn default_traits(self) -> SpeciesTraits {
        match self {
            Species::Birch => SpeciesTraits {
                young_threshold: 3,
                leaf_capacity: 10,
            },
            Species::Spruce => SpeciesTraits {
                young_threshold: 1,
                leaf_capacity: 100,
            },
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Species::Birch => write!(f, "birch"),
            Species::Spruce => write!(f, "spruce"),
        }
    }
}

impl FromStr for Species {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "birch" => Ok(Species::Birch),
            "spruce" => Ok(Species::Spruce),
            other => Err(format!("unknown species {other:?} (expected birch or spruce)")),
        }
    }
}
