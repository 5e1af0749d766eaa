//! Plain data types shared by every layer of arborfs.
//!
//! This crate holds the serde-derived value types only; the live tree model
//! and all engine logic live in `arborfs_core`.

pub mod node;
pub mod species;

pub use node::{DirEntry, Leaf, NodeId, NodeKind};
pub use species::{Species, SpeciesTraits};
