//! Push command handler
//!
//! Submits a jobs file as a new batch and follows it until every job has
//! finished.

use anyhow::{Context, Result};
use colored::*;
use para_core::domain::batch::read_job_list;
use para_core::domain::{Batch, ResourceOptions};
use std::path::Path;

use crate::config::Config;
use crate::monitor::{JobPoller, Progress};
use crate::service::{SubmissionService, create_batch_directories};

/// Handle `para push`
pub async fn handle_push(
    name: &str,
    jobs_file: &Path,
    options: ResourceOptions,
    config: &Config,
) -> Result<()> {
    let commands = read_job_list(jobs_file)?;
    let batch = Batch::new(config.layout(name), commands);

    if batch.is_empty() {
        super::warn_user(&format!(
            "The jobs file '{}' contains no jobs",
            jobs_file.display()
        ));
    }

    create_batch_directories(&batch.layout)?;

    let scheduler = config.scheduler();
    let registry = SubmissionService::new(&scheduler)
        .submit_batch(&batch, &options)
        .await
        .with_context(|| format!("Failed to submit batch '{}'", name))?;

    println!(
        "{}",
        format!("Submitted {} job(s) as batch '{}'", registry.len(), name).bold()
    );
    println!();

    let last = JobPoller::new(&scheduler, config.poll_interval)
        .run(&batch.layout, &registry, print_progress)
        .await
        .with_context(|| format!("Failed while polling batch '{}'", name))?;

    print_summary(name, &last);
    Ok(())
}

/// Print the counts of one poll cycle
fn print_progress(progress: &Progress) {
    let snapshot = &progress.snapshot;
    let rule = "#".repeat(30);

    println!("{}", rule.dimmed());
    println!(
        "Waited for {} seconds so far",
        progress.elapsed.as_secs().to_string().bold()
    );
    println!("  Running:   {}", snapshot.running.to_string().cyan());
    println!("  Pending:   {}", snapshot.pending.to_string().yellow());
    if snapshot.unknown > 0 {
        println!("  Unknown:   {}", snapshot.unknown.to_string().magenta());
    }
    println!("  Failed:    {}", snapshot.failed.to_string().red());
    println!("  Succeeded: {}", snapshot.succeeded.to_string().green());
    println!("{}", rule.dimmed());
    println!();
}

/// Print the final result of a batch
fn print_summary(name: &str, last: &Progress) {
    let snapshot = &last.snapshot;

    if snapshot.failed == 0 {
        println!(
            "{}",
            format!(
                "✓ All {} job(s) of batch '{}' succeeded",
                snapshot.total, name
            )
            .green()
            .bold()
        );
    } else {
        println!(
            "{}",
            format!(
                "✗ {} of {} job(s) of batch '{}' failed",
                snapshot.failed, snapshot.total, name
            )
            .red()
            .bold()
        );
        println!(
            "  Run {} to list their command lines",
            format!("para crashed {}", name).cyan()
        );
    }
    println!(
        "  Finished after {} poll cycle(s), {} seconds of waiting",
        last.cycle,
        last.elapsed.as_secs()
    );
}
