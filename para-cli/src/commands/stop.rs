//! Stop command handler

use anyhow::Result;
use colored::*;

use crate::config::Config;
use crate::service::lifecycle;

/// Handle `para stop`
pub async fn handle_stop(name: &str, keep_going: bool, config: &Config) -> Result<()> {
    let scheduler = config.scheduler();
    let report = lifecycle::stop(&scheduler, &config.layout(name), keep_going).await?;

    println!(
        "{}",
        format!("Cancelled {} job(s) of batch '{}'", report.cancelled.len(), name).bold()
    );

    if report.is_complete() {
        return Ok(());
    }

    for (id, e) in &report.failed {
        eprintln!("  {} {}: {}", "✗".red(), id, e);
    }
    if !report.skipped.is_empty() {
        eprintln!(
            "  {} not attempted: {}",
            "▸".yellow(),
            report.skipped.join(", ")
        );
    }

    let not_cancelled = report.failed.len() + report.skipped.len();
    anyhow::bail!(
        "{} job(s) of batch '{}' were not cancelled",
        not_cancelled,
        name
    )
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::commands::push::handle_push;
    use crate::testing::fake_slurm_config;
    use para_core::domain::ResourceOptions;
    use std::fs;
    use tempfile::TempDir;

    async fn pushed(dir: &TempDir, failing_cancel: &str) -> Config {
        let config = fake_slurm_config(dir.path(), failing_cancel);
        let jobs_file = dir.path().join("jobs.txt");
        fs::write(&jobs_file, "echo a\necho b\necho c\n").unwrap();
        handle_push("run1", &jobs_file, ResourceOptions::default(), &config)
            .await
            .unwrap();
        config
    }

    fn cancelled(dir: &TempDir) -> String {
        fs::read_to_string(dir.path().join("cancelled")).unwrap()
    }

    #[tokio::test]
    async fn test_stop_cancels_all_jobs() {
        let dir = TempDir::new().unwrap();
        let config = pushed(&dir, "").await;

        handle_stop("run1", false, &config).await.unwrap();
        assert_eq!(cancelled(&dir), "5000\n5001\n5002\n");
    }

    #[tokio::test]
    async fn test_stop_fails_after_partial_cancel() {
        let dir = TempDir::new().unwrap();
        let config = pushed(&dir, "5001").await;

        let err = handle_stop("run1", false, &config).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "2 job(s) of batch 'run1' were not cancelled"
        );
        assert_eq!(cancelled(&dir), "5000\n5001\n");
    }

    #[tokio::test]
    async fn test_stop_keep_going_still_fails() {
        let dir = TempDir::new().unwrap();
        let config = pushed(&dir, "5001").await;

        let err = handle_stop("run1", true, &config).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "1 job(s) of batch 'run1' were not cancelled"
        );
        assert_eq!(cancelled(&dir), "5000\n5001\n5002\n");
    }

    #[tokio::test]
    async fn test_stop_missing_batch() {
        let dir = TempDir::new().unwrap();
        let config = fake_slurm_config(dir.path(), "");

        assert!(handle_stop("run1", false, &config).await.is_err());
        assert!(!dir.path().join("cancelled").exists());
    }
}
