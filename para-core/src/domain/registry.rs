//! Scheduler identifier to logical index mapping

use std::collections::HashMap;

use crate::error::{ParaError, Result};

/// Mapping from scheduler-assigned identifier to logical job index
///
/// Filled once while a batch is submitted and only read afterwards.
/// Iteration follows submission order.
#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    order: Vec<String>,
    indices: HashMap<String, usize>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the scheduler assigned `id` to job `index`
    ///
    /// A scheduler handing out the same identifier twice is reported as a
    /// malformed reply.
    pub fn register(&mut self, id: impl Into<String>, index: usize) -> Result<()> {
        let id = id.into();
        if self.indices.contains_key(&id) {
            return Err(ParaError::malformed(
                "submit",
                format!("identifier {} was already assigned to another job", id),
                id,
            ));
        }
        self.indices.insert(id.clone(), index);
        self.order.push(id);
        Ok(())
    }

    /// Logical index of the job with identifier `id`
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.indices.get(id).copied()
    }

    /// Identifiers in submission order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// `(identifier, index)` pairs in submission order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.order
            .iter()
            .map(|id| (id.as_str(), self.indices[id]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
