//! Parsers for Slurm's textual replies
//!
//! Each reply shape has one parser that fails on anything unexpected
//! instead of indexing into it blindly.

use para_core::domain::job::JobStatus;
use para_core::{ParaError, Result};

/// Field of an squeue data line holding the state code (JOBID PARTITION NAME USER ST ...)
const STATUS_FIELD: usize = 4;

/// Extract the job identifier from an sbatch acknowledgement
///
/// sbatch answers `Submitted batch job 985797`; the identifier is the
/// trailing token of the last line.
pub fn parse_submit_ack(reply: &str) -> Result<String> {
    let last_line = reply
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .ok_or_else(|| ParaError::malformed("submit", "empty acknowledgement", reply))?;

    let id = last_line
        .split_whitespace()
        .last()
        .ok_or_else(|| ParaError::malformed("submit", "empty acknowledgement", reply))?;

    if !is_job_id(id) {
        return Err(ParaError::malformed(
            "submit",
            format!("trailing token {:?} is not a job identifier", id),
            reply,
        ));
    }

    Ok(id.to_string())
}

/// Extract the live status from an `squeue -j <id>` reply
///
/// No output or a header alone means the scheduler no longer knows the
/// job. Otherwise exactly one data line is expected.
pub fn parse_status(reply: &str) -> Result<JobStatus> {
    let lines: Vec<&str> = reply
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect();

    match lines.as_slice() {
        [] | [_] => Ok(JobStatus::Gone),
        [_, data] => {
            let code = data.split_whitespace().nth(STATUS_FIELD).ok_or_else(|| {
                ParaError::malformed(
                    "status",
                    format!("data line has fewer than {} fields", STATUS_FIELD + 1),
                    reply,
                )
            })?;
            Ok(JobStatus::from_code(code))
        }
        _ => Err(ParaError::malformed(
            "status",
            format!("expected at most one data line, got {}", lines.len() - 1),
            reply,
        )),
    }
}

/// Slurm job identifiers: a number, optionally `<number>_<task>` for arrays
fn is_job_id(token: &str) -> bool {
    let mut parts = token.splitn(2, '_');
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    match (parts.next(), parts.next()) {
        (Some(job), None) => all_digits(job),
        (Some(job), Some(task)) => all_digits(job) && all_digits(task),
        _ => false,
    }
}
