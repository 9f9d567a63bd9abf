//! Job status poller
//!
//! Repeatedly asks the scheduler about every unresolved job of a batch
//! until each one has either succeeded or failed. A job the scheduler no
//! longer reports is classified from its captured output; the outcome is
//! remembered and the job is not queried again.

use para_core::classifier::classify;
use para_core::domain::{BatchLayout, JobOutcome, JobRegistry, JobStatus, PollingSnapshot};
use para_core::{ParaError, Result};
use para_slurm::Scheduler;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Progress of the batch after one poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// 1 for the first cycle
    pub cycle: usize,
    /// Time spent sleeping between cycles so far
    pub elapsed: Duration,
    pub snapshot: PollingSnapshot,
}

/// Polls the scheduler until every job of a batch is terminal
pub struct JobPoller<'a> {
    scheduler: &'a dyn Scheduler,
    interval: Duration,
}

impl<'a> JobPoller<'a> {
    pub fn new(scheduler: &'a dyn Scheduler, interval: Duration) -> Self {
        Self {
            scheduler,
            interval,
        }
    }

    /// Runs poll cycles until `failed + succeeded` equals the number of jobs
    ///
    /// `report` is called once per cycle. The loop cannot end while the
    /// scheduler keeps reporting a job as alive.
    ///
    /// # Returns
    /// The progress of the final cycle
    pub async fn run<F>(
        &self,
        layout: &BatchLayout,
        registry: &JobRegistry,
        mut report: F,
    ) -> Result<Progress>
    where
        F: FnMut(&Progress),
    {
        info!(
            "Polling {} job(s) of batch {} (interval: {:?})",
            registry.len(),
            layout.name(),
            self.interval
        );

        let mut outcomes = HashMap::new();
        let mut elapsed = Duration::ZERO;
        let mut cycle = 0;

        loop {
            cycle += 1;
            let snapshot = self.poll_once(layout, registry, &mut outcomes).await?;
            let progress = Progress {
                cycle,
                elapsed,
                snapshot,
            };
            report(&progress);

            if snapshot.all_terminal() {
                info!(
                    "All {} job(s) of batch {} finished: {} succeeded, {} failed",
                    snapshot.total,
                    layout.name(),
                    snapshot.succeeded,
                    snapshot.failed
                );
                return Ok(progress);
            }

            tokio::time::sleep(self.interval).await;
            elapsed += self.interval;
        }
    }

    /// Performs a single poll cycle
    ///
    /// `outcomes` carries the outcomes resolved in earlier cycles and gains
    /// the ones resolved in this cycle.
    pub async fn poll_once(
        &self,
        layout: &BatchLayout,
        registry: &JobRegistry,
        outcomes: &mut HashMap<String, JobOutcome>,
    ) -> Result<PollingSnapshot> {
        let mut snapshot = PollingSnapshot::new(registry.len());

        for id in registry.ids() {
            if let Some(outcome) = outcomes.get(id) {
                snapshot.record_outcome(*outcome);
                continue;
            }

            let status = self.scheduler.query_status(id).await?;
            debug!("Job {} status: {:?}", id, status);

            match status {
                JobStatus::Gone => {
                    let outcome = self.resolve(layout, registry, id)?;
                    outcomes.insert(id.to_string(), outcome);
                    snapshot.record_outcome(outcome);
                }
                JobStatus::Other(ref code) => {
                    warn!("Job {} has unrecognized status code {:?}", id, code);
                    snapshot.record_status(&status);
                }
                _ => snapshot.record_status(&status),
            }
        }

        Ok(snapshot)
    }

    /// Classifies a job the scheduler no longer reports
    fn resolve(
        &self,
        layout: &BatchLayout,
        registry: &JobRegistry,
        id: &str,
    ) -> Result<JobOutcome> {
        let index = registry.index_of(id).ok_or_else(|| {
            ParaError::Precondition(format!("Job {} is not part of batch {}", id, layout.name()))
        })?;

        let outcome = classify(&layout.stdout_path(index), &layout.stderr_path(index))?;
        info!("Job {} (index {}) finished: {:?}", id, index, outcome);
        Ok(outcome)
    }
}
