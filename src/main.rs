//! pomlens - cached Maven dependency insight
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use pomlens::cli::{commands, Cli, Commands};
use pomlens::config::{Config, ConfigManager};
use pomlens::error::{PomlensError, PomlensResult};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> PomlensResult<()> {
    let cli = Cli::parse();

    // Completions and offline parsing don't need config loading
    match cli.command {
        Commands::Completions { shell } => {
            commands::completions(shell);
            return Ok(());
        }
        Commands::Parse(args) => {
            init_logging(cli.verbose, &Config::default());
            return commands::parse(args).await;
        }
        _ => {}
    }

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };

    // Find local config unless --no-local is set
    let local_config_path = if cli.no_local {
        None
    } else {
        let cwd = std::env::current_dir()
            .map_err(|e| PomlensError::io("getting current directory", e))?;
        ConfigManager::find_local_config(&cwd)
    };

    let mut config = config_manager
        .load_merged(local_config_path.as_deref())
        .await?;
    if let Some(dir) = cli.cache_dir {
        config.cache.dir = Some(dir);
    }

    init_logging(cli.verbose, &config);
    if let Some(ref path) = local_config_path {
        debug!("Merged local config: {}", path.display());
    }

    match cli.command {
        Commands::Completions { .. } | Commands::Parse(_) => unreachable!("handled above"),
        Commands::Tree(args) => commands::tree(args, &config).await,
        Commands::List(args) => commands::list(args, &config).await,
        Commands::EffectivePom(args) => commands::effective_pom(args, &config).await,
        Commands::Cache(args) => commands::cache(args, &config).await,
        Commands::Config(args) => commands::config(args, &config, &config_manager),
    }
}

/// Initialize logging: 0 = warn (spinners only), 1 = info, 2+ = debug
fn init_logging(verbose: u8, config: &Config) {
    let filter = match verbose {
        0 => EnvFilter::new("pomlens=warn"),
        1 => EnvFilter::new("pomlens=info"),
        _ => EnvFilter::new("pomlens=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
