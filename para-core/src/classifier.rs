//! Outcome classification
//!
//! A finished job is judged by the last non-empty line of its captured
//! stdout and stderr. The crash sentinel lands in stdout when the command
//! exits non-zero, and Slurm writes its cancellation notice to stderr.

use std::fs;
use std::path::Path;
use tracing::error;

use crate::domain::job::JobOutcome;
use crate::error::{ParaError, Result};

/// Substrings that mark a job as failed
pub const FAILURE_KEYWORDS: [&str; 2] = ["Job crashed", "CANCELLED"];

/// Classify a finished job from its captured output files
pub fn classify(stdout_path: &Path, stderr_path: &Path) -> Result<JobOutcome> {
    let stdout_last = last_line(stdout_path)?;
    let stderr_last = last_line(stderr_path)?;
    Ok(classify_lines(&stdout_last, &stderr_last))
}

/// Classify from the last lines of both streams
pub fn classify_lines(stdout_last: &str, stderr_last: &str) -> JobOutcome {
    let failed = FAILURE_KEYWORDS
        .iter()
        .any(|keyword| stdout_last.contains(keyword) || stderr_last.contains(keyword));

    if failed {
        JobOutcome::Failed
    } else {
        JobOutcome::Succeeded
    }
}

/// Last non-empty line of a file, or an empty string for an empty file
pub fn last_line(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| {
        error!("Cannot read the last line from {}: {}", path.display(), source);
        ParaError::Read {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let text = String::from_utf8_lossy(&bytes);

    Ok(text
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or_default()
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_pair(dir: &TempDir, stdout: &str, stderr: &str) -> (PathBuf, PathBuf) {
        let out = dir.path().join("out");
        let err = dir.path().join("err");
        fs::write(&out, stdout).unwrap();
        fs::write(&err, stderr).unwrap();
        (out, err)
    }

    #[test]
    fn test_clean_output_succeeds() {
        let dir = TempDir::new().unwrap();
        let (out, err) = write_pair(&dir, "hi\n", "");
        assert_eq!(classify(&out, &err).unwrap(), JobOutcome::Succeeded);
    }

    #[test]
    fn test_crash_sentinel_fails() {
        let dir = TempDir::new().unwrap();
        let (out, err) = write_pair(&dir, "partial output\nJob crashed\n", "");
        assert_eq!(classify(&out, &err).unwrap(), JobOutcome::Failed);
    }

    #[test]
    fn test_cancelled_in_stderr_fails() {
        let dir = TempDir::new().unwrap();
        let (out, err) = write_pair(
            &dir,
            "working\n",
            "slurmstepd: error: *** JOB 985797 ON node12 CANCELLED AT 2024-01-01T10:00:00 ***\n",
        );
        assert_eq!(classify(&out, &err).unwrap(), JobOutcome::Failed);
    }

    #[test]
    fn test_only_last_line_counts() {
        let dir = TempDir::new().unwrap();
        let (out, err) = write_pair(&dir, "Job crashed\nrecovered\n", "CANCELLED\nfine\n");
        assert_eq!(classify(&out, &err).unwrap(), JobOutcome::Succeeded);
    }

    #[test]
    fn test_trailing_blank_lines_ignored() {
        let dir = TempDir::new().unwrap();
        let (out, err) = write_pair(&dir, "Job crashed\n\n   \n", "");
        assert_eq!(classify(&out, &err).unwrap(), JobOutcome::Failed);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let (out, _) = write_pair(&dir, "hi\n", "");
        let missing = dir.path().join("missing");

        let err = classify(&out, &missing).unwrap_err();
        assert!(matches!(err, ParaError::Read { .. }));
    }

    #[test]
    fn test_classify_lines_is_substring_match() {
        assert_eq!(classify_lines("", ""), JobOutcome::Succeeded);
        assert_eq!(classify_lines("xx Job crashed yy", ""), JobOutcome::Failed);
        assert_eq!(classify_lines("", "state CANCELLED"), JobOutcome::Failed);
        assert_eq!(classify_lines("job crashed", "cancelled"), JobOutcome::Succeeded);
    }
}
