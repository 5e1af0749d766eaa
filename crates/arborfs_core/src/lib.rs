//! # Arborfs Core
//!
//! The growth engine behind arborfs: a background scheduler advances a
//! simulated year and a species-dependent growth law mutates an in-memory
//! tree, while concurrent readers project the tree as a directory namespace
//! (branches are directories, leaves are files).
//!
//! ## Architecture
//!
//! - **One serialized mutator**: the scheduler's deferred growth task is the
//!   only writer, and it holds exclusive locks only for individual appends.
//! - **Lock-light readers**: child collections are append-only, so lookup and
//!   enumeration see consistent prefixes without blocking growth.
//! - **Per-mount contexts**: every [`Mount`] co-owns its own tree and
//!   scheduler; any number of mounts grow independently in one process.
//!
//! ## Example
//!
//! ```no_run
//! use arborfs_core::{config::AppConfig, Mount};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let mount = Mount::new(&AppConfig::default())?;
//! let root = mount.root();
//! for entry in mount.read_dir(root) {
//!     println!("{} {}", entry.id, entry.name);
//! }
//! mount.shutdown().await;
//! # Ok(())
//! # }
//! ```

/// Configuration for mounts, growth limits, and species presets
pub mod config;
/// Library error type
pub mod error;
/// Fibonacci fan-out, aging predicate, and the per-year growth pass
pub mod growth;
/// Cycle counters and structured logging
pub mod metrics;
/// Per-mount context owning a tree and its scheduler
pub mod mount;
/// Lookup and restartable enumeration over the live tree
pub mod projector;
/// Periodic timer and deferred growth task
pub mod scheduler;
/// Live concurrent tree model
pub mod tree;
/// Capability surface implemented by the host filesystem framework
pub mod vfs;

pub use arborfs_data::{DirEntry, Leaf, NodeId, NodeKind, Species, SpeciesTraits};
pub use config::{AppConfig, GrowthLaw};
pub use error::Error;
pub use metrics::{init_logging, Metrics};
pub use mount::Mount;
pub use projector::{lookup, resolve, NodeRef, ReadDir};
pub use tree::{Branch, Tree};
