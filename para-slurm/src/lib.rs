//! Para Slurm client
//!
//! Everything that crosses the process boundary to the batch scheduler:
//! running external commands, parsing sbatch/squeue replies and the
//! [`Scheduler`] abstraction the orchestrator is written against.
//!
//! # Example
//!
//! ```no_run
//! use para_slurm::{Scheduler, SlurmScheduler};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> para_core::Result<()> {
//!     let slurm = SlurmScheduler::new("alice");
//!
//!     let id = slurm.submit(Path::new(".para/run1/o.0")).await?;
//!     println!("{:?}", slurm.query_status(&id).await?);
//!     Ok(())
//! }
//! ```

pub mod reply;
pub mod runner;
mod scheduler;

pub use scheduler::{Scheduler, SlurmExecutables, SlurmScheduler};
