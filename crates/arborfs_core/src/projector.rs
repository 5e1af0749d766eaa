//! Directory projection over the live tree.
//!
//! Translates branches and leaves into directory-entry semantics: exact-name
//! lookup, restartable ordered enumeration, and defensive resolution of
//! framework-cached identifiers. All of it reads the tree through short
//! shared locks and can run concurrently with an in-flight growth cycle.

use std::collections::VecDeque;
use std::sync::Arc;

use arborfs_data::{DirEntry, Leaf, NodeId, NodeKind};

use crate::error::{Error, Result};
use crate::tree::{Branch, Tree};
use crate::vfs::{DirSink, NodeMeta};

/// Position cookies for enumeration. Branch and leaf sections get disjoint
/// cookie ranges so a saved position keeps meaning the same entry even after
/// growth appends more branches; appends never skip or duplicate entries
/// that existed when the position was handed out.
const DOT_POS: u64 = 0;
const DOT_DOT_POS: u64 = 1;
const BRANCH_BASE: u64 = 2;
const LEAF_BASE: u64 = 1 << 32;

/// A resolved tree node, handed back from [`lookup`] and [`resolve`].
#[derive(Clone)]
pub enum NodeRef {
    Branch(Arc<Branch>),
    Leaf(Arc<Leaf>),
}

impl NodeRef {
    #[must_use]
    pub fn id(&self) -> NodeId {
        match self {
            NodeRef::Branch(b) => b.id,
            NodeRef::Leaf(l) => l.id,
        }
    }

    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Branch(_) => NodeKind::Directory,
            NodeRef::Leaf(_) => NodeKind::File,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            NodeRef::Branch(b) => &b.name,
            NodeRef::Leaf(l) => &l.name,
        }
    }

    /// Metadata for materializing a framework node handle.
    #[must_use]
    pub fn meta(&self) -> NodeMeta {
        match self {
            NodeRef::Branch(b) => NodeMeta {
                id: b.id,
                kind: NodeKind::Directory,
                name: b.name.clone(),
                created_at: b.created_at,
            },
            NodeRef::Leaf(l) => NodeMeta {
                id: l.id,
                kind: NodeKind::File,
                name: l.name.clone(),
                created_at: l.created_at,
            },
        }
    }
}

/// Exact, case-sensitive lookup: sub-branches in creation order first, then
/// leaves. A miss is a non-fatal [`Error::NotFound`].
pub fn lookup(parent: &Branch, name: &str) -> Result<NodeRef> {
    if let Some(branch) = parent.find_branch(name) {
        return Ok(NodeRef::Branch(branch));
    }
    if let Some(leaf) = parent.find_leaf(name) {
        return Ok(NodeRef::Leaf(leaf));
    }
    Err(Error::NotFound {
        parent: parent.id,
        name: name.to_string(),
    })
}

/// Walks the tree for a node by identifier.
///
/// Exists to validate identifiers the framework cached long ago; with the
/// append-only invariant a dangling id should not occur, so a miss is
/// reported as [`Error::Stale`] rather than trusted.
pub fn resolve(tree: &Tree, id: NodeId) -> Result<NodeRef> {
    let mut queue = VecDeque::from([tree.root()]);
    while let Some(branch) = queue.pop_front() {
        if branch.id == id {
            return Ok(NodeRef::Branch(branch));
        }
        let mut index = 0;
        while let Some(leaf) = branch.leaf_at(index) {
            if leaf.id == id {
                return Ok(NodeRef::Leaf(leaf));
            }
            index += 1;
        }
        for child in branch.branches_snapshot() {
            queue.push_back(child);
        }
    }
    Err(Error::Stale(id))
}

/// Lazy, finite, restartable directory enumeration.
///
/// Yields "." and "..", then sub-branches (directories) in creation order,
/// then leaves (files) in creation order. Each call to [`Iterator::next`]
/// reads the live tree, so entries appended after the stream was created are
/// picked up; positions already handed out are never reinterpreted.
pub struct ReadDir {
    branch: Arc<Branch>,
    pos: u64,
}

impl ReadDir {
    #[must_use]
    pub fn new(branch: Arc<Branch>) -> Self {
        Self::with_position(branch, DOT_POS)
    }

    /// Resumes enumeration at a cookie previously returned by
    /// [`ReadDir::position`].
    #[must_use]
    pub fn with_position(branch: Arc<Branch>, pos: u64) -> Self {
        Self { branch, pos }
    }

    /// Cookie of the next entry to be yielded.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.pos
    }
}

impl Iterator for ReadDir {
    type Item = DirEntry;

    fn next(&mut self) -> Option<DirEntry> {
        loop {
            match self.pos {
                DOT_POS => {
                    self.pos = DOT_DOT_POS;
                    return Some(DirEntry {
                        name: ".".to_string(),
                        id: self.branch.id,
                        kind: NodeKind::Directory,
                    });
                }
                DOT_DOT_POS => {
                    self.pos = BRANCH_BASE;
                    return Some(DirEntry {
                        name: "..".to_string(),
                        id: self.branch.parent_id,
                        kind: NodeKind::Directory,
                    });
                }
                pos if pos < LEAF_BASE => {
                    let index = (pos - BRANCH_BASE) as usize;
                    match self.branch.branch_at(index) {
                        Some(child) => {
                            self.pos += 1;
                            return Some(DirEntry {
                                name: child.name.clone(),
                                id: child.id,
                                kind: NodeKind::Directory,
                            });
                        }
                        // Branch section exhausted; move to the leaf range.
                        None => self.pos = LEAF_BASE,
                    }
                }
                pos => {
                    let index = (pos - LEAF_BASE) as usize;
                    let leaf = self.branch.leaf_at(index)?;
                    self.pos += 1;
                    return Some(DirEntry {
                        name: leaf.name.clone(),
                        id: leaf.id,
                        kind: NodeKind::File,
                    });
                }
            }
        }
    }
}

/// Callback-driven enumeration in the host framework's emit style: entries
/// are pushed into `sink` starting at cookie `start` until the sink declines
/// or the listing ends. Returns the cookie to resume from, which points at
/// the first entry the sink did not accept.
pub fn fill_dir(branch: Arc<Branch>, start: u64, sink: &mut dyn DirSink) -> u64 {
    let mut stream = ReadDir::with_position(branch, start);
    loop {
        let at = stream.position();
        match stream.next() {
            Some(entry) => {
                if !sink.emit(&entry) {
                    return at;
                }
            }
            None => return stream.position(),
        }
    }
}
