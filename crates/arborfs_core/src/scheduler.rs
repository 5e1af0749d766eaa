//! Periodic growth scheduling.
//!
//! A single background task owns the timer: it sleeps for the configured
//! interval, hands the growth cycle to the blocking-task runner, awaits it,
//! and re-arms. Awaiting the deferred cycle before re-arming is what keeps
//! the job single-slot: a new cycle can never begin while one is in flight,
//! no matter how expensive cycles become in late years. The timer context
//! itself never touches the tree.
//!
//! Teardown is cooperative: `shutdown` flips a watch channel, the task
//! drains out of its next suspension point, and the join completes only once
//! no cycle is outstanding.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

use crate::config::{GrowthLaw, LimitsConfig};
use crate::growth::run_cycle;
use crate::metrics::Metrics;
use crate::tree::Tree;

/// Observable scheduler lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Timer pending; no cycle in flight.
    Armed,
    /// A deferred growth cycle is executing.
    Running,
    /// Lifespan exhausted or shut down; will not re-arm.
    Cancelled,
}

pub struct Scheduler {
    state: Arc<Mutex<SchedulerState>>,
    stop: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

fn set_state(slot: &Arc<Mutex<SchedulerState>>, state: SchedulerState) {
    *slot.lock().unwrap_or_else(|e| e.into_inner()) = state;
}

impl Scheduler {
    /// Spawns the timer task. Must be called within a tokio runtime.
    pub fn start(
        tree: Arc<Tree>,
        law: GrowthLaw,
        limits: LimitsConfig,
        interval: Duration,
        metrics: Arc<Metrics>,
    ) -> Self {
        let (stop, mut stop_rx) = watch::channel(false);
        let state = Arc::new(Mutex::new(SchedulerState::Armed));

        let task_state = state.clone();
        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = sleep(interval) => {}
                    _ = stop_rx.changed() => break,
                }
                if tree.year() >= tree.lifespan_years() {
                    tracing::info!(
                        species = %tree.species(),
                        lifespan = tree.lifespan_years(),
                        "lifespan reached; growth stops"
                    );
                    break;
                }

                set_state(&task_state, SchedulerState::Running);
                let cycle_tree = tree.clone();
                let cycle_limits = limits.clone();
                let started = Instant::now();
                let cycle =
                    tokio::task::spawn_blocking(move || run_cycle(&cycle_tree, law, &cycle_limits));
                match cycle.await {
                    Ok(stats) => metrics.record_cycle(started.elapsed(), &stats),
                    // A panicked cycle is abandoned; the tree is still
                    // consistent and the next cycle proceeds normally.
                    Err(e) => tracing::error!(error = %e, "growth cycle failed"),
                }
                set_state(&task_state, SchedulerState::Armed);
            }
            set_state(&task_state, SchedulerState::Cancelled);
        });

        Self {
            state,
            stop,
            task: Mutex::new(Some(task)),
        }
    }

    #[must_use]
    pub fn state(&self) -> SchedulerState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Disarms the timer and waits for any in-flight cycle to finish.
    /// Idempotent; later calls return immediately.
    pub async fn shutdown(&self) {
        let _ = self.stop.send(true);
        let task = self
            .task
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "scheduler task join failed");
            }
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        // Signal only; the task owns its own Arc to the tree and drains at
        // its next suspension point.
        let _ = self.stop.send(true);
    }
}
