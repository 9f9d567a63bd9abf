//! Job domain types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One logical unit of work, derived from one line of the job list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// 0-based position in the job list, stable for the batch's lifetime
    pub index: usize,
    /// Command line exactly as read from the job list
    pub command: String,
    /// Where the scheduler writes the job's stdout
    pub stdout_path: PathBuf,
    /// Where the scheduler writes the job's stderr
    pub stderr_path: PathBuf,
}

/// Terminal outcome of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobOutcome {
    Succeeded,
    Failed,
}

/// Live status of a job as reported by one scheduler query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// `PD`
    Pending,
    /// `R`
    Running,
    /// The scheduler no longer knows the identifier
    Gone,
    /// Any other status code (completing, suspended, ...)
    Other(String),
}

impl JobStatus {
    /// Map a squeue status code to a job status
    pub fn from_code(code: &str) -> Self {
        match code {
            "R" => JobStatus::Running,
            "PD" => JobStatus::Pending,
            other => JobStatus::Other(other.to_string()),
        }
    }
}

/// Optional per-job resource requests
///
/// Absent options are left out of the submission script so that the
/// scheduler applies its own defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceOptions {
    pub nodes: Option<u32>,
    pub cpu: Option<u32>,
    pub time_minutes: Option<u32>,
    pub memory_gb: Option<u32>,
}

impl ResourceOptions {
    /// Scheduler directives for every present option, in a fixed order
    pub fn directives(&self) -> Vec<String> {
        let mut directives = Vec::new();
        if let Some(nodes) = self.nodes {
            directives.push(format!("--nodes={}", nodes));
        }
        if let Some(cpu) = self.cpu {
            directives.push(format!("--cpus-per-task={}", cpu));
        }
        if let Some(minutes) = self.time_minutes {
            directives.push(format!("--time={}", minutes));
        }
        if let Some(gb) = self.memory_gb {
            directives.push(format!("--mem={}G", gb));
        }
        directives
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_code() {
        assert_eq!(JobStatus::from_code("R"), JobStatus::Running);
        assert_eq!(JobStatus::from_code("PD"), JobStatus::Pending);
        assert_eq!(
            JobStatus::from_code("CG"),
            JobStatus::Other("CG".to_string())
        );
    }

    #[test]
    fn test_no_directives_by_default() {
        assert!(ResourceOptions::default().directives().is_empty());
    }

    #[test]
    fn test_directives_order() {
        let options = ResourceOptions {
            nodes: Some(2),
            cpu: Some(8),
            time_minutes: Some(90),
            memory_gb: Some(16),
        };

        assert_eq!(
            options.directives(),
            vec!["--nodes=2", "--cpus-per-task=8", "--time=90", "--mem=16G"]
        );
    }
}
