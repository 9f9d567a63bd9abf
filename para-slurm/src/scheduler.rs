//! Scheduler access
//!
//! The [`Scheduler`] trait is the only way the rest of para talks to the
//! batch system. [`SlurmScheduler`] implements it on top of the sbatch,
//! squeue and scancel executables.

use async_trait::async_trait;
use para_core::domain::job::JobStatus;
use para_core::{ParaError, Result};
use std::path::Path;
use tracing::{debug, info};

use crate::reply::{parse_status, parse_submit_ack};
use crate::runner::run_args;

/// squeue's answer for an identifier it has already forgotten
const INVALID_JOB_ID: &str = "Invalid job id specified";

/// Operations para needs from a batch scheduler
#[async_trait]
pub trait Scheduler: Send + Sync {
    /// Submits a job script
    ///
    /// # Returns
    /// The identifier the scheduler assigned to the job
    async fn submit(&self, script: &Path) -> Result<String>;

    /// Queries the live status of one job
    ///
    /// Returns [`JobStatus::Gone`] once the scheduler no longer reports it.
    async fn query_status(&self, id: &str) -> Result<JobStatus>;

    /// Requests cancellation of one job
    async fn cancel(&self, id: &str) -> Result<()>;
}

/// Names (or paths) of the Slurm executables to invoke
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlurmExecutables {
    pub sbatch: String,
    pub squeue: String,
    pub scancel: String,
}

impl Default for SlurmExecutables {
    fn default() -> Self {
        Self {
            sbatch: "sbatch".to_string(),
            squeue: "squeue".to_string(),
            scancel: "scancel".to_string(),
        }
    }
}

/// Slurm implementation of [`Scheduler`]
#[derive(Debug, Clone)]
pub struct SlurmScheduler {
    user: String,
    executables: SlurmExecutables,
}

impl SlurmScheduler {
    /// Creates a scheduler client that queries jobs owned by `user`
    pub fn new(user: impl Into<String>) -> Self {
        Self::with_executables(user, SlurmExecutables::default())
    }

    /// Creates a scheduler client using custom executables
    ///
    /// Mostly useful for pointing at fake binaries in tests.
    pub fn with_executables(user: impl Into<String>, executables: SlurmExecutables) -> Self {
        Self {
            user: user.into(),
            executables,
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }
}

#[async_trait]
impl Scheduler for SlurmScheduler {
    async fn submit(&self, script: &Path) -> Result<String> {
        let script = script.to_string_lossy();
        let reply = run_args(&self.executables.sbatch, &[&*script], true)
            .await?
            .unwrap_or_default();

        let id = parse_submit_ack(&reply)?;
        debug!("Submitted {} as job {}", script, id);
        Ok(id)
    }

    async fn query_status(&self, id: &str) -> Result<JobStatus> {
        let result = run_args(
            &self.executables.squeue,
            &["-u", self.user.as_str(), "-j", id],
            true,
        )
        .await;

        match result {
            Ok(reply) => parse_status(&reply.unwrap_or_default()),
            Err(e) if is_unknown_job(&e) => {
                debug!("squeue no longer knows job {}", id);
                Ok(JobStatus::Gone)
            }
            Err(e) => Err(e),
        }
    }

    async fn cancel(&self, id: &str) -> Result<()> {
        run_args(&self.executables.scancel, &[id], false).await?;
        info!("Cancelled Slurm job {}", id);
        Ok(())
    }
}

/// Whether a failed squeue call only means the job id has expired
fn is_unknown_job(err: &ParaError) -> bool {
    err.command_stderr()
        .is_some_and(|stderr| stderr.contains(INVALID_JOB_ID))
}
