use std::collections::HashSet;

use arborfs_lib::growth::run_cycle;
use arborfs_lib::projector::lookup;
use arborfs_lib::tree::{Branch, Tree};
use arborfs_lib::{Error, GrowthLaw, LimitsConfig, Species};

fn new_tree(species: Species) -> Tree {
    Tree::new(species, species.default_traits(), 10)
}

fn all_branches(tree: &Tree) -> Vec<std::sync::Arc<Branch>> {
    let mut out = vec![tree.root()];
    let mut cursor = 0;
    while cursor < out.len() {
        let children = out[cursor].branches_snapshot();
        out.extend(children);
        cursor += 1;
    }
    out
}

#[test]
fn test_year_one_scenario() {
    // Birch at year 0: one cycle turns the year to 1 with fib(1) = 1.
    let tree = new_tree(Species::Birch);
    let stats = run_cycle(&tree, GrowthLaw::Monopodial, &LimitsConfig::default());

    assert_eq!(tree.year(), 1);
    assert_eq!(stats.fanout, 1);

    // The root gains exactly one new sub-branch...
    let root = tree.root();
    assert_eq!(root.branch_count(), 1);

    // ...which is young, childless, and received exactly one leaf.
    let shoot = root.branch_at(0).expect("year-1 shoot");
    assert_eq!(shoot.created_at, 1);
    assert_eq!(shoot.branch_count(), 0);
    assert_eq!(shoot.leaf_count(), 1);
    assert_eq!(shoot.leaf_at(0).unwrap().created_at, 1);
}

#[test]
fn test_leaf_capacity_never_exceeded() {
    for law in [GrowthLaw::Monopodial, GrowthLaw::Sympodial] {
        for species in [Species::Birch, Species::Spruce] {
            let tree = new_tree(species);
            let limits = LimitsConfig {
                max_branches: 500,
                max_depth: 8,
            };
            for _ in 0..10 {
                run_cycle(&tree, law, &limits);
            }
            let capacity = species.default_traits().leaf_capacity;
            for branch in all_branches(&tree) {
                assert!(branch.leaf_count() <= capacity);
            }
        }
    }
}

#[test]
fn test_identifiers_stay_distinct() {
    let tree = new_tree(Species::Birch);
    let limits = LimitsConfig {
        max_branches: 2000,
        max_depth: 16,
    };
    for _ in 0..6 {
        run_cycle(&tree, GrowthLaw::Sympodial, &limits);
    }

    let mut seen = HashSet::new();
    for branch in all_branches(&tree) {
        assert!(seen.insert(branch.id), "duplicate branch id {}", branch.id);
        let mut index = 0;
        while let Some(leaf) = branch.leaf_at(index) {
            assert!(seen.insert(leaf.id), "duplicate leaf id {}", leaf.id);
            index += 1;
        }
    }
    assert!(seen.len() > 10);
}

#[test]
fn test_lookup_after_growth() {
    let tree = new_tree(Species::Birch);
    run_cycle(&tree, GrowthLaw::Sympodial, &LimitsConfig::default());

    let root = tree.root();
    let shoot = root.branch_at(0).unwrap();
    let found = lookup(&root, &shoot.name).expect("appended branch is visible");
    assert_eq!(found.id(), shoot.id);

    assert!(matches!(
        lookup(&root, "branch_1_999"),
        Err(Error::NotFound { .. })
    ));
}

#[test]
fn test_growth_is_deterministic() {
    let grow = || {
        let tree = new_tree(Species::Birch);
        let limits = LimitsConfig {
            max_branches: 1000,
            max_depth: 8,
        };
        for _ in 0..5 {
            run_cycle(&tree, GrowthLaw::Sympodial, &limits);
        }
        let census = tree.census();
        (census.branches, census.leaves, census.max_depth)
    };
    assert_eq!(grow(), grow());
}
