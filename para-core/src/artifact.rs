//! Submission scripts
//!
//! Renders the sbatch script for a job and recovers the original command
//! line from a script written earlier.

use std::fs;
use std::path::Path;

use crate::domain::job::{Job, ResourceOptions};
use crate::error::{ParaError, Result};

/// Opens the subshell the command runs in
pub const SUBSHELL_OPEN: &str = "(";

/// Closes the subshell; a non-zero exit of the whole command line leaves a
/// marker in stdout
pub const CRASH_SENTINEL: &str = r#") || echo "Job crashed""#;

/// Single-line form written by earlier versions
const LEGACY_SENTINEL: &str = r#" || echo "Job crashed""#;

const SHEBANG: &str = "#!/bin/bash";
const DIRECTIVE: &str = "#SBATCH";

/// Render the submission script for `job`
pub fn render_script(job: &Job, options: &ResourceOptions) -> String {
    let mut lines = vec![
        SHEBANG.to_string(),
        format!("{} --mail-type=BEGIN,END", DIRECTIVE),
        format!("{} -o {}", DIRECTIVE, job.stdout_path.display()),
        format!("{} -e {}", DIRECTIVE, job.stderr_path.display()),
    ];
    lines.extend(
        options
            .directives()
            .into_iter()
            .map(|directive| format!("{} {}", DIRECTIVE, directive)),
    );
    // Own line and a subshell: neither a trailing comment nor `exit` may skip the sentinel
    lines.push(SUBSHELL_OPEN.to_string());
    lines.push(job.command.clone());
    lines.push(CRASH_SENTINEL.to_string());

    let mut script = lines.join("\n");
    script.push('\n');
    script
}

/// Write the submission script for `job` to `path`
pub fn write_script(path: &Path, job: &Job, options: &ResourceOptions) -> Result<()> {
    fs::write(path, render_script(job, options)).map_err(|e| ParaError::io(path, e))
}

/// Recover the command line from script text
///
/// Returns the line inside the subshell. Scripts without a subshell yield
/// their first line that is not a comment or directive, minus the sentinel.
pub fn extract_command(script: &str) -> Option<String> {
    let mut body = script.lines().skip_while(|line| line.starts_with('#'));
    let first = body.next()?;

    if first == SUBSHELL_OPEN {
        return body.next().map(str::to_string);
    }
    Some(first.strip_suffix(LEGACY_SENTINEL).unwrap_or(first).to_string())
}

/// Recover the command line from the script at `path`
pub fn read_command(path: &Path) -> Result<String> {
    let script = fs::read_to_string(path).map_err(|e| ParaError::io(path, e))?;
    extract_command(&script).ok_or_else(|| {
        ParaError::Precondition(format!(
            "Submission script {} contains no command line",
            path.display()
        ))
    })
}
