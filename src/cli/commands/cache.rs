//! Cache command - inspect or clear cached results

use crate::cache::CacheStats;
use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::config::{Config, ConfigManager};
use crate::error::PomlensResult;
use crate::service::DependencyService;
use crate::ui::{self, UiContext};
use std::path::Path;

/// Execute the cache command
pub async fn execute(args: CacheArgs, config: &Config) -> PomlensResult<()> {
    let ctx = UiContext::detect();
    let service = DependencyService::from_config(config);

    match args.action {
        CacheAction::Stats { format } => {
            let stats = service.stats().await;
            print_stats(&ctx, &stats, &ConfigManager::cache_dir(config), format)
        }
        CacheAction::Invalidate { pom } => {
            service.invalidate(&pom).await?;
            ui::step_ok_detail(&ctx, "Cache invalidated", &pom.display().to_string());
            Ok(())
        }
        CacheAction::Clear => {
            service.clear_all().await;
            ui::step_ok(&ctx, "Cache cleared");
            Ok(())
        }
    }
}

fn print_stats(
    ctx: &UiContext,
    stats: &CacheStats,
    dir: &Path,
    format: OutputFormat,
) -> PomlensResult<()> {
    match format {
        OutputFormat::Table => {
            ui::section(ctx, "Cache");
            ui::key_value(ctx, "directory", &dir.display().to_string());
            ui::key_value(ctx, "fast", &stats.fast.to_string());
            ui::key_value(ctx, "small-persistent", &stats.small_persistent.to_string());
            ui::key_value(ctx, "blob", &stats.blob.to_string());
        }
        OutputFormat::Json => ui::print_json(stats)?,
        OutputFormat::Plain => {
            println!("fast {}", stats.fast);
            println!("small-persistent {}", stats.small_persistent);
            println!("blob {}", stats.blob);
        }
    }
    Ok(())
}
