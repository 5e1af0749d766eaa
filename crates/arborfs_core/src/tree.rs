//! Live concurrent tree model.
//!
//! The append operations here are the *only* mutators of the structure, and
//! growth is serialized by the scheduler, so the locking discipline is one
//! writer taking a short exclusive lock per append against many readers
//! taking short shared locks. Child collections are append-only: entries are
//! never removed or mutated after creation, so a reader's view is always a
//! consistent prefix of the creation order. A child is fully constructed
//! before it is pushed under the write lock; no reader can observe a slot
//! that exists but is not yet populated.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard};

use arborfs_data::{Leaf, NodeId, Species, SpeciesTraits};

/// Identifier of the root branch, fixed at mount time.
pub const ROOT_ID: NodeId = 1;

/// Directory-equivalent node: owns ordered child branches and child leaves.
pub struct Branch {
    pub id: NodeId,
    pub name: String,
    /// Simulated year the branch appeared.
    pub created_at: u64,
    /// Identifier of the owning branch; the root points at itself. A plain
    /// id rather than a pointer, so the tree stays the sole owner.
    pub parent_id: NodeId,
    traits: SpeciesTraits,
    branches: RwLock<Vec<Arc<Branch>>>,
    leaves: RwLock<Vec<Arc<Leaf>>>,
}

impl Branch {
    pub(crate) fn new(
        id: NodeId,
        name: String,
        created_at: u64,
        parent_id: NodeId,
        traits: SpeciesTraits,
    ) -> Arc<Self> {
        Arc::new(Self {
            id,
            name,
            created_at,
            parent_id,
            traits,
            branches: RwLock::new(Vec::new()),
            leaves: RwLock::new(Vec::new()),
        })
    }

    #[must_use]
    pub fn traits(&self) -> SpeciesTraits {
        self.traits
    }

    fn read_branches(&self) -> RwLockReadGuard<'_, Vec<Arc<Branch>>> {
        self.branches.read().unwrap_or_else(|e| e.into_inner())
    }

    fn read_leaves(&self) -> RwLockReadGuard<'_, Vec<Arc<Leaf>>> {
        self.leaves.read().unwrap_or_else(|e| e.into_inner())
    }

    #[must_use]
    pub fn branch_count(&self) -> usize {
        self.read_branches().len()
    }

    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.read_leaves().len()
    }

    /// Child branch at `index` in creation order.
    #[must_use]
    pub fn branch_at(&self, index: usize) -> Option<Arc<Branch>> {
        self.read_branches().get(index).cloned()
    }

    /// Leaf at `index` in creation order.
    #[must_use]
    pub fn leaf_at(&self, index: usize) -> Option<Arc<Leaf>> {
        self.read_leaves().get(index).cloned()
    }

    /// Consistent copy of the sub-branch list as of this instant.
    #[must_use]
    pub fn branches_snapshot(&self) -> Vec<Arc<Branch>> {
        self.read_branches().clone()
    }

    /// Exact, case-sensitive scan of sub-branches in creation order.
    #[must_use]
    pub fn find_branch(&self, name: &str) -> Option<Arc<Branch>> {
        self.read_branches().iter().find(|b| b.name == name).cloned()
    }

    /// Exact, case-sensitive scan of leaves in creation order.
    #[must_use]
    pub fn find_leaf(&self, name: &str) -> Option<Arc<Leaf>> {
        self.read_leaves().iter().find(|l| l.name == name).cloned()
    }

    pub(crate) fn push_branch(&self, child: Arc<Branch>) {
        self.branches
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(child);
    }

    pub(crate) fn push_leaf(&self, leaf: Arc<Leaf>) {
        self.leaves
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(leaf);
    }
}

/// Totals gathered by a full walk of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Census {
    pub branches: u64,
    pub leaves: u64,
    pub max_depth: u32,
}

/// One growing tree: a root branch, a species, a logical clock, and the
/// single identifier counter shared by every branch and leaf.
pub struct Tree {
    root: Arc<Branch>,
    species: Species,
    lifespan_years: u64,
    year: AtomicU64,
    next_id: AtomicU64,
    branches_created: AtomicU64,
}

impl Tree {
    #[must_use]
    pub fn new(species: Species, traits: SpeciesTraits, lifespan_years: u64) -> Self {
        let root = Branch::new(ROOT_ID, species.to_string(), 0, ROOT_ID, traits);
        Self {
            root,
            species,
            lifespan_years,
            year: AtomicU64::new(0),
            next_id: AtomicU64::new(ROOT_ID + 1),
            branches_created: AtomicU64::new(1),
        }
    }

    #[must_use]
    pub fn root(&self) -> Arc<Branch> {
        self.root.clone()
    }

    #[must_use]
    pub fn species(&self) -> Species {
        self.species
    }

    #[must_use]
    pub fn lifespan_years(&self) -> u64 {
        self.lifespan_years
    }

    /// Current simulated year. Non-decreasing; advanced only by the scheduler
    /// in whole-year steps.
    #[must_use]
    pub fn year(&self) -> u64 {
        self.year.load(Ordering::Acquire)
    }

    /// Total branches created over the tree's lifetime, root included.
    #[must_use]
    pub fn branches_created(&self) -> u64 {
        self.branches_created.load(Ordering::Relaxed)
    }

    pub(crate) fn advance_year(&self) -> u64 {
        self.year.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub(crate) fn allocate_id(&self) -> NodeId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    pub(crate) fn note_branch_created(&self) {
        self.branches_created.fetch_add(1, Ordering::Relaxed);
    }

    /// Walks the whole tree and totals branches, leaves, and depth.
    #[must_use]
    pub fn census(&self) -> Census {
        let mut census = Census {
            branches: 0,
            leaves: 0,
            max_depth: 0,
        };
        let mut queue = std::collections::VecDeque::from([(self.root(), 0u32)]);
        while let Some((branch, depth)) = queue.pop_front() {
            census.branches += 1;
            census.leaves += branch.leaf_count() as u64;
            census.max_depth = census.max_depth.max(depth);
            for child in branch.branches_snapshot() {
                queue.push_back((child, depth + 1));
            }
        }
        census
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn birch_tree() -> Tree {
        Tree::new(Species::Birch, Species::Birch.default_traits(), 10)
    }

    #[test]
    fn test_new_tree_has_fixed_root() {
        let tree = birch_tree();
        let root = tree.root();
        assert_eq!(root.id, ROOT_ID);
        assert_eq!(root.parent_id, ROOT_ID);
        assert_eq!(root.name, "birch");
        assert_eq!(root.created_at, 0);
        assert_eq!(tree.year(), 0);
        assert_eq!(tree.branches_created(), 1);
    }

    #[test]
    fn test_ids_are_monotonic_and_distinct() {
        let tree = birch_tree();
        let a = tree.allocate_id();
        let b = tree.allocate_id();
        assert!(a > ROOT_ID);
        assert!(b > a);
    }

    #[test]
    fn test_append_preserves_creation_order() {
        let tree = birch_tree();
        let root = tree.root();
        for year in 1..=3 {
            let id = tree.allocate_id();
            root.push_branch(Branch::new(
                id,
                format!("branch_{year}_{id}"),
                year,
                root.id,
                root.traits(),
            ));
        }
        assert_eq!(root.branch_count(), 3);
        let snapshot = root.branches_snapshot();
        assert!(snapshot.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(root.branch_at(0).unwrap().created_at, 1);
        assert!(root.branch_at(3).is_none());
    }

    #[test]
    fn test_find_is_exact_and_case_sensitive() {
        let tree = birch_tree();
        let root = tree.root();
        let id = tree.allocate_id();
        root.push_branch(Branch::new(id, "branch_1_2".into(), 1, root.id, root.traits()));
        assert!(root.find_branch("branch_1_2").is_some());
        assert!(root.find_branch("Branch_1_2").is_none());
        assert!(root.find_branch("branch_1").is_none());
    }

    #[test]
    fn test_census_counts_all_nodes() {
        let tree = birch_tree();
        let root = tree.root();
        let id = tree.allocate_id();
        let child = Branch::new(id, "branch_1_2".into(), 1, root.id, root.traits());
        let leaf_id = tree.allocate_id();
        child.push_leaf(Arc::new(Leaf {
            id: leaf_id,
            name: format!("leaf_1_{leaf_id}"),
            created_at: 1,
        }));
        root.push_branch(child);
        let census = tree.census();
        assert_eq!(census.branches, 2);
        assert_eq!(census.leaves, 1);
        assert_eq!(census.max_depth, 1);
    }
}
