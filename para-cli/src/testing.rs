//! Test doubles
//!
//! [`FakeScheduler`] hands out sequential identifiers, answers status
//! queries from a per-job script and records every call it receives.
//! [`fake_slurm_config`] points the real Slurm client at shell scripts.

use async_trait::async_trait;
use para_core::domain::JobStatus;
use para_core::{ParaError, Result};
use para_slurm::Scheduler;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// First identifier handed out by [`FakeScheduler`]
pub const FIRST_ID: u64 = 1000;

#[derive(Default)]
struct State {
    next_id: u64,
    submitted: Vec<PathBuf>,
    statuses: HashMap<String, VecDeque<JobStatus>>,
    queries: Vec<String>,
    cancelled: Vec<String>,
    failing_cancels: HashSet<String>,
}

/// Scripted [`Scheduler`] implementation
pub struct FakeScheduler {
    state: Mutex<State>,
}

impl FakeScheduler {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: FIRST_ID,
                ..State::default()
            }),
        }
    }

    /// Statuses returned for `id` on successive queries; afterwards the job is gone
    pub fn script(&self, id: impl Into<String>, statuses: Vec<JobStatus>) {
        let mut state = self.state.lock().unwrap();
        state.statuses.insert(id.into(), statuses.into());
    }

    /// Make cancelling `id` fail
    pub fn fail_cancel(&self, id: impl Into<String>) {
        self.state.lock().unwrap().failing_cancels.insert(id.into());
    }

    pub fn submitted(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().submitted.clone()
    }

    pub fn queries(&self) -> Vec<String> {
        self.state.lock().unwrap().queries.clone()
    }

    pub fn cancelled(&self) -> Vec<String> {
        self.state.lock().unwrap().cancelled.clone()
    }
}

#[async_trait]
impl Scheduler for FakeScheduler {
    async fn submit(&self, script: &Path) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id.to_string();
        state.next_id += 1;
        state.submitted.push(script.to_path_buf());
        Ok(id)
    }

    async fn query_status(&self, id: &str) -> Result<JobStatus> {
        let mut state = self.state.lock().unwrap();
        state.queries.push(id.to_string());
        let status = state
            .statuses
            .get_mut(id)
            .and_then(VecDeque::pop_front)
            .unwrap_or(JobStatus::Gone);
        Ok(status)
    }

    async fn cancel(&self, id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.failing_cancels.contains(id) {
            return Err(ParaError::ExternalCommand {
                command: format!("scancel {}", id),
                code: Some(1),
                stderr: "scancel: error: Kill job error on job id".to_string(),
            });
        }
        state.cancelled.push(id.to_string());
        Ok(())
    }
}

/// First identifier handed out by the fake sbatch of [`fake_slurm_config`]
#[cfg(unix)]
pub const FAKE_SBATCH_FIRST_ID: u64 = 5000;

#[cfg(unix)]
fn fake_executable(dir: &Path, name: &str, body: &str) -> String {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.to_string_lossy().into_owned()
}

/// Configuration whose Slurm executables are shell scripts in `dir`
///
/// sbatch runs the script right away with bash, routing output to the
/// `-o`/`-e` paths of its directives. squeue never knows a job, so every
/// job reads as finished. scancel appends its argument to `dir/cancelled`
/// and fails for `failing_cancel`.
#[cfg(unix)]
pub fn fake_slurm_config(dir: &Path, failing_cancel: &str) -> crate::config::Config {
    let dir_text = dir.display();
    let sbatch = format!(
        r#"out=$(sed -n 's/^#SBATCH -o //p' "$1")
err=$(sed -n 's/^#SBATCH -e //p' "$1")
bash "$1" > "$out" 2> "$err"
n=$(cat "{dir}/next_id" 2>/dev/null || echo {first})
echo $((n + 1)) > "{dir}/next_id"
echo "Submitted batch job $n""#,
        dir = dir_text,
        first = FAKE_SBATCH_FIRST_ID,
    );
    let scancel = format!(
        r#"echo "$1" >> "{dir}/cancelled"
if [ "$1" = "{failing}" ]; then echo "scancel: error: Kill job error on job id $1" >&2; exit 1; fi"#,
        dir = dir_text,
        failing = failing_cancel,
    );

    let mut config = crate::config::Config::new(dir.join(".para"), "alice".to_string());
    config.poll_interval = std::time::Duration::from_millis(1);
    config.executables = para_slurm::SlurmExecutables {
        sbatch: fake_executable(dir, "sbatch", &sbatch),
        squeue: fake_executable(dir, "squeue", "echo 'JOBID PARTITION NAME USER ST'"),
        scancel: fake_executable(dir, "scancel", &scancel),
    };
    config
}
