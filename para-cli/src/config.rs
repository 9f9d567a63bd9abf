//! Configuration module
//!
//! Everything the commands need to know about their environment is
//! collected once in `main` and passed down by reference.

use anyhow::{Context, Result};
use para_core::domain::BatchLayout;
use para_slurm::{SlurmExecutables, SlurmScheduler};
use std::path::PathBuf;
use std::time::Duration;

/// Directory, relative to the working directory, holding all batches
pub const ROOT_DIR_NAME: &str = ".para";

/// Default time between two status polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one subdirectory per batch
    pub root: PathBuf,

    /// User whose jobs are queried with squeue
    pub user: String,

    /// How long to wait between two status polls
    pub poll_interval: Duration,

    /// Slurm executables to invoke
    pub executables: SlurmExecutables,
}

impl Config {
    /// Creates a configuration with default interval and executables
    pub fn new(root: PathBuf, user: String) -> Self {
        Self {
            root,
            user,
            poll_interval: DEFAULT_POLL_INTERVAL,
            executables: SlurmExecutables::default(),
        }
    }

    /// Directory layout of the batch called `name`
    pub fn layout(&self, name: &str) -> BatchLayout {
        BatchLayout::new(&self.root, name)
    }

    /// Scheduler client for the configured user and executables
    pub fn scheduler(&self) -> SlurmScheduler {
        SlurmScheduler::with_executables(self.user.clone(), self.executables.clone())
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.user.is_empty() {
            anyhow::bail!("user cannot be empty (set --user or USER)");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        let SlurmExecutables {
            sbatch,
            squeue,
            scancel,
        } = &self.executables;
        if sbatch.is_empty() || squeue.is_empty() || scancel.is_empty() {
            anyhow::bail!("Slurm executable names cannot be empty");
        }

        Ok(())
    }
}

/// `<cwd>/.para`
pub fn default_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("Failed to determine the working directory")?;
    Ok(cwd.join(ROOT_DIR_NAME))
}

/// Login name from the environment
pub fn current_user() -> Option<String> {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok()
        .filter(|user| !user.is_empty())
}
