//! Per-cycle progress counts

use serde::{Deserialize, Serialize};

use crate::domain::job::{JobOutcome, JobStatus};

/// Counts observed across all jobs of a batch during one poll cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingSnapshot {
    pub total: usize,
    pub running: usize,
    pub pending: usize,
    /// Jobs alive with a status code other than `R` or `PD`
    pub unknown: usize,
    pub failed: usize,
    pub succeeded: usize,
}

impl PollingSnapshot {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Count a job that is still known to the scheduler
    pub fn record_status(&mut self, status: &JobStatus) {
        match status {
            JobStatus::Running => self.running += 1,
            JobStatus::Pending => self.pending += 1,
            JobStatus::Other(_) => self.unknown += 1,
            JobStatus::Gone => {}
        }
    }

    /// Count a job that reached a terminal state
    pub fn record_outcome(&mut self, outcome: JobOutcome) {
        match outcome {
            JobOutcome::Succeeded => self.succeeded += 1,
            JobOutcome::Failed => self.failed += 1,
        }
    }

    pub fn terminal(&self) -> usize {
        self.failed + self.succeeded
    }

    pub fn observed(&self) -> usize {
        self.running + self.pending + self.unknown + self.terminal()
    }

    /// Whether every job has succeeded or failed
    pub fn all_terminal(&self) -> bool {
        self.terminal() == self.total
    }
}
