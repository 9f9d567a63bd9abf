//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod clean;
mod crashed;
mod push;
mod stop;

use anyhow::Result;
use clap::Subcommand;
use para_core::domain::ResourceOptions;
use para_core::domain::batch::validate_name;
use std::path::PathBuf;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Submit every line of a jobs file and wait until all jobs finish
    Push {
        /// Name of the batch
        #[arg(value_parser = parse_batch_name)]
        name: String,

        /// File with one job command per line
        #[arg(short = 'f', long = "file")]
        jobs_file: PathBuf,

        /// Number of requested nodes
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        nodes: Option<u32>,

        /// Number of requested CPUs per job
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        cpu: Option<u32>,

        /// Minutes requested for each job
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        time: Option<u32>,

        /// Memory requested per job, in GB
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        memory: Option<u32>,
    },
    /// Cancel every job of a batch
    Stop {
        /// Name of the batch
        #[arg(value_parser = parse_batch_name)]
        name: String,

        /// Try every job even after a cancellation fails
        #[arg(long)]
        keep_going: bool,
    },
    /// Remove the batch directory
    Clean {
        /// Name of the batch
        #[arg(value_parser = parse_batch_name)]
        name: String,
    },
    /// Print the command lines of failed jobs
    Crashed {
        /// Name of the batch
        #[arg(value_parser = parse_batch_name)]
        name: String,

        /// Print the failed jobs as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
///
/// # Returns
/// Result indicating success or failure
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Push {
            name,
            jobs_file,
            nodes,
            cpu,
            time,
            memory,
        } => {
            let options = ResourceOptions {
                nodes,
                cpu,
                time_minutes: time,
                memory_gb: memory,
            };
            push::handle_push(&name, &jobs_file, options, config).await
        }
        Commands::Stop { name, keep_going } => stop::handle_stop(&name, keep_going, config).await,
        Commands::Clean { name } => clean::handle_clean(&name, config),
        Commands::Crashed { name, json } => crashed::handle_crashed(&name, json, config),
    }
}

fn parse_batch_name(name: &str) -> std::result::Result<String, String> {
    validate_name(name)
        .map(|()| name.to_string())
        .map_err(|e| e.to_string())
}

/// Print a non-fatal warning on stderr
fn warn_user(message: &str) {
    use colored::Colorize;
    eprintln!("{} {}", "warning:".yellow().bold(), message);
}
