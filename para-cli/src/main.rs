//! Para CLI
//!
//! Submits a list of independent shell commands to Slurm as a named batch,
//! follows the batch until every job has finished, and offers follow-up
//! actions (stop, clean, crashed) on an existing batch.
//!
//! Architecture:
//! - Configuration: flags and environment, collected once
//! - Services: submission and lifecycle logic behind the commands
//! - Monitor: the status polling loop
//!
//! Everything runs on a single thread and every external call is awaited
//! before the next one starts.

mod commands;
mod config;
mod monitor;
mod service;
#[cfg(test)]
mod testing;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use commands::{Commands, handle_command};
use config::Config;
use para_slurm::SlurmExecutables;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "para")]
#[command(
    about = "Submit lists of independent jobs to a Slurm cluster and follow them to completion",
    long_about = None
)]
struct Cli {
    /// Directory holding the batch directories [default: ./.para]
    #[arg(long, global = true, env = "PARA_ROOT")]
    root: Option<PathBuf>,

    /// User whose jobs are queried
    #[arg(long, global = true, env = "USER")]
    user: Option<String>,

    /// Seconds between two status polls
    #[arg(long, global = true, env = "PARA_POLL_INTERVAL", default_value_t = 60)]
    poll_interval: u64,

    /// sbatch executable
    #[arg(long, global = true, env = "PARA_SBATCH", default_value = "sbatch", hide = true)]
    sbatch: String,

    /// squeue executable
    #[arg(long, global = true, env = "PARA_SQUEUE", default_value = "squeue", hide = true)]
    squeue: String,

    /// scancel executable
    #[arg(long, global = true, env = "PARA_SCANCEL", default_value = "scancel", hide = true)]
    scancel: String,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn into_parts(self) -> Result<(Config, Commands)> {
        let root = match self.root {
            Some(root) => root,
            None => config::default_root()?,
        };
        let user = self.user.or_else(config::current_user).unwrap_or_default();

        let mut config = Config::new(root, user);
        config.poll_interval = Duration::from_secs(self.poll_interval);
        config.executables = SlurmExecutables {
            sbatch: self.sbatch,
            squeue: self.squeue,
            scancel: self.scancel,
        };

        Ok((config, self.command))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    if std::env::args_os().len() <= 1 {
        Cli::command().print_help()?;
        return Ok(());
    }

    let cli = Cli::parse();

    // Logs go to stderr; stdout is reserved for reports
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "para_cli=info,para_slurm=info,para_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let (config, command) = cli.into_parts()?;
    config.validate()?;

    handle_command(command, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_push_resources_must_be_positive() {
        let parsed = Cli::try_parse_from(["para", "push", "run1", "-f", "jobs.txt", "-c", "0"]);
        assert!(parsed.is_err());

        let parsed =
            Cli::try_parse_from(["para", "push", "run1", "-f", "jobs.txt", "-c", "4", "-m", "16"]);
        assert!(parsed.is_ok());
    }

    #[test]
    fn test_batch_name_cannot_escape_root() {
        assert!(Cli::try_parse_from(["para", "clean", ".."]).is_err());
        assert!(Cli::try_parse_from(["para", "clean", "a/b"]).is_err());
        assert!(Cli::try_parse_from(["para", "clean", "run1"]).is_ok());
    }

    #[test]
    fn test_push_requires_jobs_file() {
        assert!(Cli::try_parse_from(["para", "push", "run1"]).is_err());
    }
}
