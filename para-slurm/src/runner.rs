//! External command execution
//!
//! Runs an executable to completion, capturing stdout and stderr. A
//! non-zero exit is always an error; nothing here retries.

use para_core::{ParaError, Result};
use tokio::process::Command;
use tracing::debug;

/// Run a command given as a single string
///
/// The string is split on whitespace into program and arguments, so
/// arguments containing whitespace cannot be expressed this way; use
/// [`run_args`] for those.
///
/// Returns the trimmed stdout when `capture_output` is set.
pub async fn run(command: &str, capture_output: bool) -> Result<Option<String>> {
    let mut parts = command.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| ParaError::Precondition("Cannot run an empty command".to_string()))?;
    let args: Vec<&str> = parts.collect();

    run_args(program, &args, capture_output).await
}

/// Run `program` with pre-split arguments
pub async fn run_args<S: AsRef<str>>(
    program: &str,
    args: &[S],
    capture_output: bool,
) -> Result<Option<String>> {
    let args: Vec<&str> = args.iter().map(|arg| arg.as_ref()).collect();
    let command_line = std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");

    debug!("Running command: {}", command_line);

    let output = Command::new(program)
        .args(&args)
        .output()
        .await
        .map_err(|e| ParaError::ExternalCommand {
            command: command_line.clone(),
            code: None,
            stderr: e.to_string(),
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !stderr.trim().is_empty() {
        debug!("{} stderr: {}", program, stderr.trim());
    }

    if !output.status.success() {
        return Err(ParaError::ExternalCommand {
            command: command_line,
            code: output.status.code(),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(capture_output.then(|| stdout.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_trimmed_stdout() {
        let output = run("echo   hello   world", true).await.unwrap();
        assert_eq!(output.as_deref(), Some("hello world"));
    }

    #[tokio::test]
    async fn test_no_capture_returns_none() {
        assert_eq!(run("echo hello", false).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_error() {
        let err = run("false", true).await.unwrap_err();
        match err {
            ParaError::ExternalCommand { command, code, .. } => {
                assert_eq!(command, "false");
                assert_eq!(code, Some(1));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stderr_is_carried() {
        let err = run_args("sh", &["-c", "echo boom >&2; exit 3"], false)
            .await
            .unwrap_err();
        assert_eq!(err.command_stderr(), Some("boom"));
    }

    #[tokio::test]
    async fn test_missing_program_is_error() {
        let err = run("para-no-such-program-xyz", false).await.unwrap_err();
        assert!(err.is_external_command());
    }

    #[tokio::test]
    async fn test_empty_command_is_rejected() {
        let err = run("   ", false).await.unwrap_err();
        assert!(matches!(err, ParaError::Precondition(_)));
    }
}
