//! Core domain types
//!
//! Batches, jobs, the identifier registry and the per-cycle snapshot used
//! by the submission and polling code.

pub mod batch;
pub mod job;
pub mod registry;
pub mod snapshot;

pub use batch::{Batch, BatchLayout};
pub use job::{Job, JobOutcome, JobStatus, ResourceOptions};
pub use registry::JobRegistry;
pub use snapshot::PollingSnapshot;
