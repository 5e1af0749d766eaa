use serde::{Deserialize, Serialize};

/// Unique, monotonically assigned identifier for a branch or leaf.
///
/// Identifiers come from a single per-tree counter and are never reused for
/// the lifetime of the tree.
pub type NodeId = u64;

/// What a node projects to in the directory namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Directory,
    File,
}

/// Terminal node: projects as a file and never grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaf {
    pub id: NodeId,
    pub name: String,
    /// Simulated year the leaf appeared.
    pub created_at: u64,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    pub name: String,
    pub id: NodeId,
    pub kind: NodeKind,
}

impl DirEntry {
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }
}
