//! The per-year growth pass.
//!
//! Growth is a deterministic function of the simulated year and the species:
//! the Fibonacci number of the current year sets the branch fan-out factor,
//! and a branch participates only while it is young
//! (`year - created_at < young_threshold`, strict).
//!
//! The pass is an explicit breadth-first work queue rather than recursion, so
//! depth is bounded by configuration, not by the stack, and the total branch
//! cap is checked before every append. Exactly one pass runs at a time (the
//! scheduler serializes cycles); all appends go through the tree's mutators,
//! which take their own short exclusive locks.

use std::collections::VecDeque;
use std::sync::Arc;

use arborfs_data::Leaf;

use crate::config::{GrowthLaw, LimitsConfig};
use crate::tree::{Branch, Tree};

/// Standard recurrence with `fib(-1) = fib(0) = 0`, used as the fan-out
/// factor for the current year. Saturates at `u64::MAX` past `n = 93`; the
/// fan-out loop stops at `max_branches` long before a saturated factor is
/// exhausted.
#[must_use]
pub fn fibonacci(n: i64) -> u64 {
    if n <= 0 {
        return 0;
    }
    let (mut prev, mut curr) = (0u64, 1u64);
    for _ in 1..n {
        let next = prev.saturating_add(curr);
        prev = curr;
        curr = next;
    }
    curr
}

/// True while the branch may still spawn descendants. Equality with the
/// threshold means the branch has aged out.
#[must_use]
pub fn is_young(branch: &Branch, year: u64) -> bool {
    year.saturating_sub(branch.created_at) < branch.traits().young_threshold
}

/// Appends one leaf stamped with the current year, unless the branch is at
/// its leaf-slot capacity. Returns whether a leaf was added.
pub fn grow_leaf(tree: &Tree, branch: &Branch) -> bool {
    if branch.leaf_count() >= branch.traits().leaf_capacity {
        return false;
    }
    let id = tree.allocate_id();
    let year = tree.year();
    branch.push_leaf(Arc::new(Leaf {
        id,
        name: format!("leaf_{year}_{id}"),
        created_at: year,
    }));
    true
}

/// What one growth cycle did, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleStats {
    pub year: u64,
    pub fanout: u64,
    pub branches_added: u64,
    pub leaves_added: u64,
    /// Young branches visited by the pass.
    pub visited: u64,
    /// True if the branch cap or depth cap cut the pass short.
    pub capped: bool,
}

impl CycleStats {
    fn new(year: u64, fanout: u64) -> Self {
        Self {
            year,
            fanout,
            branches_added: 0,
            leaves_added: 0,
            visited: 0,
            capped: false,
        }
    }
}

/// Runs one full growth cycle: advances the year, then applies the
/// configured growth law from the root.
pub fn run_cycle(tree: &Tree, law: GrowthLaw, limits: &LimitsConfig) -> CycleStats {
    let year = tree.advance_year();
    let fanout = fibonacci(year as i64);
    let mut stats = CycleStats::new(year, fanout);

    match law {
        GrowthLaw::Sympodial => {
            // Fan out across the population that existed when the year
            // turned; branches born this cycle first grow next cycle.
            let young = collect_young(tree, limits, year);
            sprout(tree, &tree.root(), year, limits, &mut stats);
            for (branch, depth) in young {
                stats.visited += 1;
                if fanout > 0 && depth < limits.max_depth {
                    for _ in 0..fanout {
                        if !sprout(tree, &branch, year, limits, &mut stats) {
                            break;
                        }
                    }
                }
                if grow_leaf(tree, &branch) {
                    stats.leaves_added += 1;
                }
            }
        }
        GrowthLaw::Monopodial => {
            // The annual shoot joins this year's young population, so a
            // branch gains its first leaf the same year it appears.
            sprout(tree, &tree.root(), year, limits, &mut stats);
            for (branch, _depth) in collect_young(tree, limits, year) {
                stats.visited += 1;
                if grow_leaf(tree, &branch) {
                    stats.leaves_added += 1;
                }
            }
        }
    }

    if stats.capped {
        tracing::warn!(
            year,
            max_branches = limits.max_branches,
            max_depth = limits.max_depth,
            "growth limit reached; cycle ended early"
        );
    }
    tracing::debug!(
        year,
        fanout,
        branches_added = stats.branches_added,
        leaves_added = stats.leaves_added,
        visited = stats.visited,
        "growth cycle complete"
    );
    stats
}

/// Young non-root branches in breadth-first creation order, paired with
/// their depth below the root. Old branches are traversed but not returned:
/// a branch created late in its parent's youth can outlive it.
fn collect_young(tree: &Tree, limits: &LimitsConfig, year: u64) -> Vec<(Arc<Branch>, u32)> {
    let mut young = Vec::new();
    let mut queue: VecDeque<(Arc<Branch>, u32)> = tree
        .root()
        .branches_snapshot()
        .into_iter()
        .map(|b| (b, 1))
        .collect();
    while let Some((branch, depth)) = queue.pop_front() {
        if depth < limits.max_depth {
            for child in branch.branches_snapshot() {
                queue.push_back((child, depth + 1));
            }
        }
        if is_young(&branch, year) {
            young.push((branch, depth));
        }
    }
    young
}

/// Appends one new sub-branch, respecting the total branch cap. Returns
/// false when the cap is hit so callers can stop fanning out.
fn sprout(
    tree: &Tree,
    parent: &Arc<Branch>,
    year: u64,
    limits: &LimitsConfig,
    stats: &mut CycleStats,
) -> bool {
    if tree.branches_created() >= limits.max_branches {
        stats.capped = true;
        return false;
    }
    let id = tree.allocate_id();
    let child = Branch::new(
        id,
        format!("branch_{year}_{id}"),
        year,
        parent.id,
        parent.traits(),
    );
    parent.push_branch(child);
    tree.note_branch_created();
    stats.branches_added += 1;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use arborfs_data::Species;

    fn birch_tree() -> Tree {
        Tree::new(Species::Birch, Species::Birch.default_traits(), 10)
    }

    #[test]
    fn test_fibonacci_anchors() {
        assert_eq!(fibonacci(-1), 0);
        assert_eq!(fibonacci(0), 0);
        assert_eq!(fibonacci(1), 1);
        assert_eq!(fibonacci(2), 1);
        assert_eq!(fibonacci(3), 2);
        assert_eq!(fibonacci(10), 55);
    }

    #[test]
    fn test_fibonacci_saturates_instead_of_overflowing() {
        // fib(93) is the last value that fits in a u64.
        assert_eq!(fibonacci(93), 12_200_160_415_121_876_738);
        assert_eq!(fibonacci(94), u64::MAX);
        assert_eq!(fibonacci(200), u64::MAX);
    }

    #[test]
    fn test_late_year_cycles_do_not_panic() {
        // A valid config allows lifespans past year 94, where the raw
        // Fibonacci number no longer fits in a u64.
        let tree = Tree::new(Species::Birch, Species::Birch.default_traits(), 200);
        let limits = LimitsConfig::default();
        for _ in 0..120 {
            run_cycle(&tree, GrowthLaw::Monopodial, &limits);
        }
        assert_eq!(tree.year(), 120);
        assert_eq!(tree.root().branch_count(), 120);
    }

    #[test]
    fn test_is_young_strict_threshold() {
        let tree = birch_tree();
        let root = tree.root();
        // Birch threshold is 3: young at ages 0..=2, aged out at exactly 3.
        assert!(is_young(&root, 0));
        assert!(is_young(&root, 2));
        assert!(!is_young(&root, 3));
        assert!(!is_young(&root, 4));
    }

    #[test]
    fn test_grow_leaf_respects_capacity() {
        let tree = birch_tree();
        let root = tree.root();
        let capacity = root.traits().leaf_capacity;
        for _ in 0..capacity {
            assert!(grow_leaf(&tree, &root));
        }
        assert!(!grow_leaf(&tree, &root));
        assert_eq!(root.leaf_count(), capacity);
    }

    #[test]
    fn test_monopodial_year_one_scenario() {
        // Year 1, fanout fib(1) = 1: the root gains exactly one sub-branch;
        // the fresh shoot gains no children and exactly one leaf.
        let tree = birch_tree();
        let stats = run_cycle(&tree, GrowthLaw::Monopodial, &LimitsConfig::default());
        assert_eq!(stats.year, 1);
        assert_eq!(stats.fanout, 1);
        assert_eq!(stats.branches_added, 1);
        assert_eq!(stats.leaves_added, 1);

        let root = tree.root();
        assert_eq!(root.branch_count(), 1);
        let shoot = root.branch_at(0).unwrap();
        assert_eq!(shoot.created_at, 1);
        assert_eq!(shoot.branch_count(), 0);
        assert_eq!(shoot.leaf_count(), 1);
    }

    #[test]
    fn test_monopodial_adds_one_shoot_per_year() {
        let tree = birch_tree();
        let limits = LimitsConfig::default();
        for _ in 0..5 {
            run_cycle(&tree, GrowthLaw::Monopodial, &limits);
        }
        // Every branch hangs directly off the root.
        let census = tree.census();
        assert_eq!(tree.root().branch_count(), 5);
        assert_eq!(census.branches, 6);
        assert_eq!(census.max_depth, 1);
    }

    #[test]
    fn test_monopodial_leafs_young_branches_every_year() {
        let tree = birch_tree();
        let limits = LimitsConfig::default();
        for _ in 0..4 {
            run_cycle(&tree, GrowthLaw::Monopodial, &limits);
        }
        let root = tree.root();
        // A birch shoot is young for three years and gains one leaf per
        // year: the year-1 shoot stops at three, the year-4 shoot has one.
        assert_eq!(root.branch_at(0).unwrap().leaf_count(), 3);
        assert_eq!(root.branch_at(3).unwrap().leaf_count(), 1);
    }

    #[test]
    fn test_sympodial_compounds_across_years() {
        let tree = birch_tree();
        let limits = LimitsConfig::default();

        // Year 1: only the shoot; nothing was young before the cycle.
        let stats = run_cycle(&tree, GrowthLaw::Sympodial, &limits);
        assert_eq!(stats.branches_added, 1);
        assert_eq!(stats.visited, 0);

        // Year 2: the year-1 shoot is young and gains fib(2) = 1 child.
        let stats = run_cycle(&tree, GrowthLaw::Sympodial, &limits);
        assert_eq!(stats.visited, 1);
        assert_eq!(stats.branches_added, 2);

        // Year 3: three young branches, fib(3) = 2 children each.
        let stats = run_cycle(&tree, GrowthLaw::Sympodial, &limits);
        assert_eq!(stats.visited, 3);
        assert_eq!(stats.branches_added, 1 + 3 * 2);
    }

    #[test]
    fn test_branch_cap_stops_growth_cleanly() {
        let tree = birch_tree();
        let limits = LimitsConfig {
            max_branches: 4,
            max_depth: 32,
        };
        for _ in 0..6 {
            run_cycle(&tree, GrowthLaw::Sympodial, &limits);
        }
        assert_eq!(tree.branches_created(), 4);
        assert_eq!(tree.census().branches, 4);
        // The clock keeps ticking even when the tree cannot get bigger.
        assert_eq!(tree.year(), 6);
    }

    #[test]
    fn test_depth_cap_bounds_the_tree() {
        let tree = Tree::new(Species::Birch, Species::Birch.default_traits(), 20);
        let limits = LimitsConfig {
            max_branches: 100_000,
            max_depth: 2,
        };
        for _ in 0..6 {
            run_cycle(&tree, GrowthLaw::Sympodial, &limits);
        }
        assert!(tree.census().max_depth <= 2);
    }

    #[test]
    fn test_spruce_branches_age_out_after_one_year() {
        let tree = Tree::new(Species::Spruce, Species::Spruce.default_traits(), 10);
        let limits = LimitsConfig::default();
        run_cycle(&tree, GrowthLaw::Sympodial, &limits); // year 1: shoot only
        let stats = run_cycle(&tree, GrowthLaw::Sympodial, &limits);
        // The year-1 shoot is exactly one year old and no longer young.
        assert_eq!(stats.visited, 0);
        assert_eq!(stats.branches_added, 1);
    }
}
