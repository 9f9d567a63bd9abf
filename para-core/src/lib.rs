//! Para Core
//!
//! Core types and abstractions for submitting job batches to Slurm.
//!
//! This crate contains:
//! - Domain types: batches, jobs, the identifier registry, poll snapshots
//! - Submission script rendering and command recovery
//! - Outcome classification of finished jobs
//! - The error taxonomy shared by all para crates

pub mod artifact;
pub mod classifier;
pub mod domain;
pub mod error;

pub use error::{ParaError, Result};
