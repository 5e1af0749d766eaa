//! arborfs: a synthetic, self-growing namespace.
//!
//! A background engine simulates an organically branching tree and projects
//! its shape as a directory hierarchy: branches are directories, leaves are
//! files, and a periodic scheduler advances the simulated year that drives
//! all growth. See `arborfs_core` for the engine itself.

pub use arborfs_core::{
    config::{AppConfig, GrowthLaw, LimitsConfig, MountConfig},
    growth, projector, scheduler, tree, vfs, DirEntry, Error, Leaf, Metrics, Mount, NodeId,
    NodeKind, Species, SpeciesTraits,
};
