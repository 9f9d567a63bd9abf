//! Monitoring layer
//!
//! Watches a submitted batch until every job reaches a terminal state.

pub mod poller;

pub use poller::{JobPoller, Progress};
