//! Batch domain types
//!
//! A batch is a named group of jobs submitted together. Its directory tree
//! under the para root is the only state that outlives a `push`:
//!
//! ```text
//! <root>/<name>/
//!     o.<i>            submission script of job i
//!     stdout/o.<i>     captured stdout of job i
//!     stderr/o.<i>     captured stderr of job i
//!     jobs_ids.txt     one scheduler identifier per line, in submission order
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::job::Job;
use crate::error::{ParaError, Result};

/// Name of the identifier list inside a batch directory
pub const JOB_IDS_FILE: &str = "jobs_ids.txt";

const STDOUT_DIR: &str = "stdout";
const STDERR_DIR: &str = "stderr";
const FILE_PREFIX: &str = "o.";

/// Paths of a batch's directory tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchLayout {
    name: String,
    base_dir: PathBuf,
}

impl BatchLayout {
    /// Layout for batch `name` under the para root directory
    pub fn new(root: impl AsRef<Path>, name: impl Into<String>) -> Self {
        let name = name.into();
        let base_dir = root.as_ref().join(&name);
        Self { name, base_dir }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn stdout_dir(&self) -> PathBuf {
        self.base_dir.join(STDOUT_DIR)
    }

    pub fn stderr_dir(&self) -> PathBuf {
        self.base_dir.join(STDERR_DIR)
    }

    pub fn ids_path(&self) -> PathBuf {
        self.base_dir.join(JOB_IDS_FILE)
    }

    pub fn script_path(&self, index: usize) -> PathBuf {
        self.base_dir.join(file_name(index))
    }

    pub fn stdout_path(&self, index: usize) -> PathBuf {
        self.stdout_dir().join(file_name(index))
    }

    pub fn stderr_path(&self, index: usize) -> PathBuf {
        self.stderr_dir().join(file_name(index))
    }

    /// Whether the batch directory currently exists
    pub fn exists(&self) -> bool {
        self.base_dir.is_dir()
    }

    /// The job at `index` running `command`, with its output paths resolved
    pub fn job(&self, index: usize, command: impl Into<String>) -> Job {
        Job {
            index,
            command: command.into(),
            stdout_path: self.stdout_path(index),
            stderr_path: self.stderr_path(index),
        }
    }
}

/// A named collection of jobs about to be submitted
#[derive(Debug, Clone)]
pub struct Batch {
    pub layout: BatchLayout,
    pub jobs: Vec<Job>,
}

impl Batch {
    /// Build a batch from command lines, assigning indices in order
    pub fn new(layout: BatchLayout, commands: Vec<String>) -> Self {
        let jobs = commands
            .into_iter()
            .enumerate()
            .map(|(index, command)| layout.job(index, command))
            .collect();
        Self { layout, jobs }
    }

    pub fn name(&self) -> &str {
        self.layout.name()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// Check that `name` can be used as a batch directory name
///
/// Names are a single path component so that removing a batch can never
/// reach outside the para root.
pub fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.chars().any(char::is_whitespace);

    if valid {
        Ok(())
    } else {
        Err(ParaError::Precondition(format!(
            "Invalid batch name {:?}: use a single word without path separators",
            name
        )))
    }
}

/// File name used for every per-job file of job `index`
pub fn file_name(index: usize) -> String {
    format!("{}{}", FILE_PREFIX, index)
}

/// Logical index encoded in a per-job file name, if it is one
pub fn index_from_file_name(name: &str) -> Option<usize> {
    name.strip_prefix(FILE_PREFIX)?.parse().ok()
}

/// Parse job list text into command lines
///
/// Lines keep everything but their terminator; whitespace-only lines are
/// skipped. Nothing inside a command is interpreted.
pub fn parse_job_list(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Read a job list file
pub fn read_job_list(path: &Path) -> Result<Vec<String>> {
    if !path.is_file() {
        return Err(ParaError::Precondition(format!(
            "The jobs file '{}' does not exist. Aborting",
            path.display()
        )));
    }

    let text = fs::read_to_string(path).map_err(|e| ParaError::io(path, e))?;
    Ok(parse_job_list(&text))
}
