//! Capability surface between the engine and the host filesystem framework.
//!
//! The engine never owns framework state: it hands out metadata and ids, and
//! the framework materializes whatever node handles it wants to cache. A
//! cached handle refers back into the tree by identifier only and is
//! re-validated through [`crate::projector::resolve`].

use arborfs_data::{DirEntry, NodeId, NodeKind};

/// Metadata handed to the framework when materializing a node handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeMeta {
    pub id: NodeId,
    pub kind: NodeKind,
    pub name: String,
    pub created_at: u64,
}

/// Opaque, cacheable reference to a tree node. Non-owning: it carries the
/// identifier, never a pointer into the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    pub id: NodeId,
    pub kind: NodeKind,
}

/// Implemented by the framework to turn node metadata into a handle it can
/// cache (the `iget` analogue).
pub trait HandleFactory {
    fn materialize(&self, meta: &NodeMeta) -> NodeHandle;
}

/// Receives directory entries during enumeration. Returning `false` means
/// the in-progress listing is full and enumeration should stop; the declined
/// entry is offered again on the next call.
pub trait DirSink {
    fn emit(&mut self, entry: &DirEntry) -> bool;
}

impl<F: FnMut(&DirEntry) -> bool> DirSink for F {
    fn emit(&mut self, entry: &DirEntry) -> bool {
        self(entry)
    }
}

/// Handle factory that caches nothing and echoes the metadata back.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHandles;

impl HandleFactory for PlainHandles {
    fn materialize(&self, meta: &NodeMeta) -> NodeHandle {
        NodeHandle {
            id: meta.id,
            kind: meta.kind,
        }
    }
}
