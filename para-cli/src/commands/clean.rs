//! Clean command handler

use anyhow::Result;
use colored::*;

use crate::config::Config;
use crate::service::{CleanOutcome, lifecycle};

/// Handle `para clean`
pub fn handle_clean(name: &str, config: &Config) -> Result<()> {
    let layout = config.layout(name);

    match lifecycle::clean(&layout)? {
        CleanOutcome::Removed => {
            println!("{}", format!("✓ Removed batch '{}'", name).green());
        }
        CleanOutcome::Missing => super::warn_user(&format!(
            "The para jobs directory {} does not exist. Nothing to be cleaned!",
            layout.base_dir().display()
        )),
    }

    Ok(())
}
