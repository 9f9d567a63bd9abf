//! Lifecycle service
//!
//! Operations on a batch created by an earlier `push`: removing it,
//! listing its crashed jobs and cancelling its jobs.

use para_core::artifact::read_command;
use para_core::classifier::classify;
use para_core::domain::batch::index_from_file_name;
use para_core::domain::{BatchLayout, JobOutcome};
use para_core::{ParaError, Result};
use para_slurm::Scheduler;
use serde::Serialize;
use std::fs;
use tracing::{debug, error, info};

/// What `clean` found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanOutcome {
    Removed,
    /// Nothing existed, nothing was touched
    Missing,
}

/// A job whose captured output marks it as failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrashedJob {
    pub index: usize,
    pub command: String,
}

/// Result of cancelling a batch
#[derive(Debug, Default)]
pub struct StopReport {
    pub cancelled: Vec<String>,
    /// Identifiers whose cancellation failed, with the reason
    pub failed: Vec<(String, ParaError)>,
    /// Identifiers never attempted because an earlier cancellation failed
    pub skipped: Vec<String>,
}

impl StopReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}

/// Removes the batch directory tree
pub fn clean(layout: &BatchLayout) -> Result<CleanOutcome> {
    let base_dir = layout.base_dir();
    if !layout.exists() {
        return Ok(CleanOutcome::Missing);
    }

    fs::remove_dir_all(base_dir).map_err(|e| ParaError::io(base_dir, e))?;
    info!("Removed batch directory {}", base_dir.display());
    Ok(CleanOutcome::Removed)
}

/// Lists the batch's failed jobs with their original command lines
///
/// Every captured stdout file present in the batch is classified together
/// with its stderr counterpart.
///
/// # Returns
/// `None` if the batch directory does not exist, otherwise the failed jobs
/// ordered by logical index
pub fn crashed(layout: &BatchLayout) -> Result<Option<Vec<CrashedJob>>> {
    if !layout.exists() {
        return Ok(None);
    }

    let stdout_dir = layout.stdout_dir();
    let entries = fs::read_dir(&stdout_dir).map_err(|e| ParaError::io(&stdout_dir, e))?;

    let mut crashed = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ParaError::io(&stdout_dir, e))?;
        let file_name = entry.file_name();
        let Some(index) = file_name.to_str().and_then(index_from_file_name) else {
            debug!("Skipping unexpected file {:?} in {}", file_name, stdout_dir.display());
            continue;
        };

        let outcome = classify(&layout.stdout_path(index), &layout.stderr_path(index))?;
        if outcome == JobOutcome::Failed {
            let command = read_command(&layout.script_path(index))?;
            crashed.push(CrashedJob { index, command });
        }
    }

    crashed.sort_by_key(|job| job.index);
    Ok(Some(crashed))
}

/// Requests cancellation of every job recorded for the batch
///
/// Identifiers are cancelled in submission order. Unless `keep_going` is
/// set, the first failure ends the run and the remaining identifiers are
/// reported as skipped.
pub async fn stop(
    scheduler: &dyn Scheduler,
    layout: &BatchLayout,
    keep_going: bool,
) -> Result<StopReport> {
    let ids_path = layout.ids_path();
    if !layout.exists() || !ids_path.is_file() {
        return Err(ParaError::Precondition(format!(
            "No identifier list at {}; was batch '{}' ever pushed?",
            ids_path.display(),
            layout.name()
        )));
    }

    let text = fs::read_to_string(&ids_path).map_err(|e| ParaError::io(&ids_path, e))?;
    let mut ids = text.lines().map(str::trim).filter(|id| !id.is_empty());

    let mut report = StopReport::default();
    while let Some(id) = ids.next() {
        match scheduler.cancel(id).await {
            Ok(()) => report.cancelled.push(id.to_string()),
            Err(e) => {
                error!("Failed to cancel job {}: {}", id, e);
                report.failed.push((id.to_string(), e));
                if !keep_going {
                    report.skipped = ids.by_ref().map(str::to_string).collect();
                    break;
                }
            }
        }
    }

    Ok(report)
}
