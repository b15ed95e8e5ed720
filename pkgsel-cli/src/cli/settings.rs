//! `config`: read and change persistent settings

use crate::cli::commands::ConfigAction;
use crate::config::{format_sections, ConfigManager};
use anyhow::{anyhow, Result};

/// Run a `config` action against `manager`.
///
/// # Errors
/// Fails for unknown keys, invalid values, or when saving fails.
pub fn run_config(manager: &mut ConfigManager, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let value = manager
                .get(&key)
                .ok_or_else(|| anyhow!("unknown configuration key: {key}"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            manager.set(&key, &value)?;
            manager.save()?;
            tracing::info!(%key, %value, path = %manager.path().display(), "saved configuration");
        }
        ConfigAction::List => {
            for line in format_sections(manager.config()) {
                println!("{line}");
            }
        }
        ConfigAction::Path => println!("{}", manager.path().display()),
    }
    Ok(())
}
