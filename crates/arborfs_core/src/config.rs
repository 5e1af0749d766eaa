//! Configuration for mounts, growth limits, and species presets.
//!
//! Strongly-typed structures that map to the `config.toml` file. Species and
//! lifespan are fixed configuration supplied at mount time; nothing in the
//! engine parses configuration at runtime.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [mount]
//! species = "birch"
//! lifespan_years = 10
//! tick_interval_ms = 1000
//! growth_law = "sympodial"
//!
//! [limits]
//! max_branches = 100000
//! max_depth = 32
//!
//! [species.spruce]
//! young_threshold = 1
//! leaf_capacity = 100
//! ```

use arborfs_data::{Species, SpeciesTraits};
use serde::{Deserialize, Serialize};

/// Which corrected growth law drives the per-year branch fan-out.
///
/// The original simulation's fan-out recursion iterated the freshly created
/// branch's own (empty) children, so the exponential growth it implied never
/// happened. Both repaired readings are kept selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GrowthLaw {
    /// One new shoot under the root per year; young branches only gain
    /// leaves. This is the shape the original program actually produced.
    Monopodial,
    /// Every branch that was young at the start of the cycle gains
    /// `fibonacci(year)` child branches, so fan-out compounds across years.
    #[default]
    Sympodial,
}

/// Per-mount simulation parameters.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MountConfig {
    pub species: Species,
    /// Total simulated lifespan; the scheduler stops re-arming once reached.
    pub lifespan_years: u64,
    /// Fixed wall-clock interval between growth cycles.
    pub tick_interval_ms: u64,
    pub growth_law: GrowthLaw,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            species: Species::Birch,
            lifespan_years: 10,
            tick_interval_ms: 1000,
            growth_law: GrowthLaw::Sympodial,
        }
    }
}

/// Hard bounds on growth, checked before every append.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct LimitsConfig {
    /// Total branch cap for one tree, root included.
    pub max_branches: u64,
    /// Maximum branch depth below the root.
    pub max_depth: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_branches: 100_000,
            max_depth: 32,
        }
    }
}

/// Overridable per-species growth constants.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SpeciesConfig {
    pub birch: SpeciesTraits,
    pub spruce: SpeciesTraits,
}

impl Default for SpeciesConfig {
    fn default() -> Self {
        Self {
            birch: Species::Birch.default_traits(),
            spruce: Species::Spruce.default_traits(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub mount: MountConfig,
    pub limits: LimitsConfig,
    pub species: SpeciesConfig,
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a
    /// description of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.mount.lifespan_years > 0,
            "Lifespan must be at least one year"
        );
        anyhow::ensure!(
            self.mount.lifespan_years <= 10_000,
            "Lifespan too large (max 10000 years)"
        );
        anyhow::ensure!(
            self.mount.tick_interval_ms > 0,
            "Tick interval must be positive"
        );

        anyhow::ensure!(self.limits.max_branches > 0, "Branch cap must be positive");
        // Branch directory-offset cookies occupy the 32-bit range; the cap
        // must leave the leaf range above it untouched.
        anyhow::ensure!(
            self.limits.max_branches <= (1 << 32) - 2,
            "Branch cap too large (max 4294967294)"
        );
        anyhow::ensure!(self.limits.max_depth > 0, "Depth cap must be positive");
        anyhow::ensure!(
            self.limits.max_depth <= 128,
            "Depth cap too large (max 128)"
        );

        for (name, traits) in [("birch", &self.species.birch), ("spruce", &self.species.spruce)] {
            anyhow::ensure!(
                traits.young_threshold > 0,
                "Young threshold for {name} must be positive"
            );
            anyhow::ensure!(
                traits.leaf_capacity > 0,
                "Leaf capacity for {name} must be positive"
            );
            anyhow::ensure!(
                traits.leaf_capacity <= 100_000,
                "Leaf capacity for {name} too large (max 100000)"
            );
        }

        Ok(())
    }

    /// Loads and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// The (possibly overridden) traits for a species.
    #[must_use]
    pub fn traits_for(&self, species: Species) -> SpeciesTraits {
        match species {
            Species::Birch => self.species.birch,
            Species::Spruce => self.species.spruce,
        }
    }
}
