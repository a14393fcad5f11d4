//! Config command - show configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::PomlensResult;
use tracing::debug;

/// Execute the config command
pub fn execute(args: ConfigArgs, config: &Config, manager: &ConfigManager) -> PomlensResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config),
        Some(ConfigAction::Path) => {
            if !manager.path().exists() {
                debug!("Config file not created yet, defaults in use");
            }
            println!("{}", manager.path().display());
            Ok(())
        }
    }
}

fn show_config(config: &Config) -> PomlensResult<()> {
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
