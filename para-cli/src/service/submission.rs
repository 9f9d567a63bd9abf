//! Submission service
//!
//! Handles everything that happens before polling starts:
//! - Creating the batch directory tree
//! - Writing one submission script per job
//! - Submitting the scripts and recording the assigned identifiers

use para_core::artifact::write_script;
use para_core::domain::{Batch, BatchLayout, JobRegistry, ResourceOptions};
use para_core::{ParaError, Result};
use para_slurm::Scheduler;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use tracing::{debug, info};

/// Creates the directory tree of a new batch
///
/// Fails if the batch directory already exists: a second submission under
/// the same name would overwrite the first one's identifier list.
pub fn create_batch_directories(layout: &BatchLayout) -> Result<()> {
    let base_dir = layout.base_dir();

    if let Some(root) = base_dir.parent() {
        fs::create_dir_all(root).map_err(|e| ParaError::io(root, e))?;
    }

    match fs::create_dir(base_dir) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(ParaError::Precondition(format!(
                "The para jobs directory {} already exists. Delete this directory and resubmit the jobs. Aborting",
                base_dir.display()
            )));
        }
        Err(e) => return Err(ParaError::io(base_dir, e)),
    }

    for dir in [layout.stdout_dir(), layout.stderr_dir()] {
        fs::create_dir_all(&dir).map_err(|e| ParaError::io(&dir, e))?;
    }

    debug!("Created batch directory {}", base_dir.display());
    Ok(())
}

/// Submits every job of a batch to the scheduler
pub struct SubmissionService<'a> {
    scheduler: &'a dyn Scheduler,
}

impl<'a> SubmissionService<'a> {
    pub fn new(scheduler: &'a dyn Scheduler) -> Self {
        Self { scheduler }
    }

    /// Writes and submits one script per job, in job order
    ///
    /// Each identifier is appended to the batch's identifier list as soon as
    /// it is known, so a batch that fails halfway can still be stopped.
    ///
    /// # Returns
    /// The registry mapping each identifier to its job's logical index
    pub async fn submit_batch(
        &self,
        batch: &Batch,
        options: &ResourceOptions,
    ) -> Result<JobRegistry> {
        let layout = &batch.layout;
        let ids_path = layout.ids_path();
        let mut ids_file = create_ids_file(layout)?;
        let mut registry = JobRegistry::new();

        for job in &batch.jobs {
            let script_path = layout.script_path(job.index);
            write_script(&script_path, job, options)?;

            let id = self.scheduler.submit(&script_path).await?;
            registry.register(id.clone(), job.index)?;

            writeln!(ids_file, "{}", id).map_err(|e| ParaError::io(&ids_path, e))?;
            ids_file.flush().map_err(|e| ParaError::io(&ids_path, e))?;

            debug!("Job {} submitted as {}: {}", job.index, id, job.command);
        }

        info!(
            "Submitted {} job(s) for batch {}",
            registry.len(),
            batch.name()
        );
        Ok(registry)
    }
}

fn create_ids_file(layout: &BatchLayout) -> Result<File> {
    let path = layout.ids_path();
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| ParaError::io(&path, e))
}
