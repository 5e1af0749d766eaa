//! Per-mount context.
//!
//! A `Mount` co-owns one tree and the scheduler growing it, so any number of
//! independently growing mounts coexist in one process. Nothing here is
//! process-global.

use std::sync::Arc;

use tokio::time::Duration;

use arborfs_data::NodeId;

use crate::config::AppConfig;
use crate::error::Result;
use crate::metrics::Metrics;
use crate::projector::{self, NodeRef, ReadDir};
use crate::scheduler::{Scheduler, SchedulerState};
use crate::tree::{Branch, Tree};
use crate::vfs::{DirSink, HandleFactory, NodeHandle};

pub struct Mount {
    tree: Arc<Tree>,
    scheduler: Scheduler,
    metrics: Arc<Metrics>,
}

impl Mount {
    /// Validates the configuration, plants the tree at year 0, and arms the
    /// scheduler. Must be called within a tokio runtime.
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let species = config.mount.species;
        let tree = Arc::new(Tree::new(
            species,
            config.traits_for(species),
            config.mount.lifespan_years,
        ));
        let metrics = Arc::new(Metrics::new());
        let scheduler = Scheduler::start(
            tree.clone(),
            config.mount.growth_law,
            config.limits.clone(),
            Duration::from_millis(config.mount.tick_interval_ms),
            metrics.clone(),
        );
        tracing::info!(
            species = %species,
            lifespan = config.mount.lifespan_years,
            interval_ms = config.mount.tick_interval_ms,
            law = ?config.mount.growth_law,
            "mounted"
        );
        Ok(Self {
            tree,
            scheduler,
            metrics,
        })
    }

    #[must_use]
    pub fn tree(&self) -> &Arc<Tree> {
        &self.tree
    }

    #[must_use]
    pub fn root(&self) -> Arc<Branch> {
        self.tree.root()
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    #[must_use]
    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// Exact-name lookup under `parent`.
    pub fn lookup(&self, parent: &Branch, name: &str) -> Result<NodeRef> {
        self.metrics.record_lookup();
        projector::lookup(parent, name)
    }

    /// Lookup that materializes a framework handle for the match.
    pub fn lookup_handle(
        &self,
        parent: &Branch,
        name: &str,
        factory: &dyn HandleFactory,
    ) -> Result<NodeHandle> {
        let node = self.lookup(parent, name)?;
        Ok(factory.materialize(&node.meta()))
    }

    /// Restartable enumeration of `branch` from the beginning.
    #[must_use]
    pub fn read_dir(&self, branch: Arc<Branch>) -> ReadDir {
        ReadDir::new(branch)
    }

    /// Emit-style enumeration from a saved position; returns the cookie to
    /// resume from.
    pub fn fill_dir(&self, branch: Arc<Branch>, start: u64, sink: &mut dyn DirSink) -> u64 {
        projector::fill_dir(branch, start, sink)
    }

    /// Re-validates a framework-cached identifier against the live tree.
    pub fn resolve(&self, id: NodeId) -> Result<NodeRef> {
        projector::resolve(&self.tree, id)
    }

    /// Disarms the scheduler and waits for any in-flight growth cycle before
    /// returning. Idempotent; the tree stays readable afterwards and is
    /// released when the `Mount` is dropped.
    pub async fn shutdown(&self) {
        self.scheduler.shutdown().await;
        let census = self.tree.census();
        tracing::info!(
            species = %self.tree.species(),
            year = self.tree.year(),
            branches = census.branches,
            leaves = census.leaves,
            depth = census.max_depth,
            "unmounted"
        );
    }
}
