//! Service layer
//!
//! Business logic behind the CLI commands. Services talk to the batch
//! system only through the [`para_slurm::Scheduler`] trait so they can be
//! exercised against an in-memory scheduler.

pub mod lifecycle;
pub mod submission;

pub use lifecycle::CleanOutcome;
pub use submission::{SubmissionService, create_batch_directories};
