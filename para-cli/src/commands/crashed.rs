//! Crashed command handler

use anyhow::{Context, Result};

use crate::config::Config;
use crate::service::lifecycle;

/// Handle `para crashed`
///
/// Prints one failed command line per line so the output can be fed back
/// into `para push -f`.
pub fn handle_crashed(name: &str, json: bool, config: &Config) -> Result<()> {
    let layout = config.layout(name);

    let Some(crashed) = lifecycle::crashed(&layout)? else {
        super::warn_user(&format!(
            "The para jobs directory {} does not exist. No crashed jobs to report",
            layout.base_dir().display()
        ));
        return Ok(());
    };

    if json {
        let output =
            serde_json::to_string_pretty(&crashed).context("Failed to serialize crashed jobs")?;
        println!("{}", output);
    } else {
        for job in &crashed {
            println!("{}", job.command);
        }
    }

    Ok(())
}
