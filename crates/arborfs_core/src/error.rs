use arborfs_data::NodeId;
use thiserror::Error;

/// Errors surfaced to the host filesystem framework.
///
/// Both variants are local to a single request: the scheduler keeps running
/// and the tree stays consistent for other callers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// No entry with the requested name in the parent branch.
    #[error("no entry named {name:?} in branch {parent}")]
    NotFound { parent: NodeId, name: String },

    /// A framework-cached identifier no longer resolves inside the tree.
    /// Should not occur given the append-only invariant, but is checked
    /// rather than assumed.
    #[error("stale node id {0}")]
    Stale(NodeId),
}

pub type Result<T> = std::result::Result<T, Error>;
