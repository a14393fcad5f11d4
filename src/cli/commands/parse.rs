//! Parse command - structure saved Maven output offline

use crate::cli::args::{OutputFormat, ParseArgs, ParseKind, TreeFormat};
use crate::cli::commands::list::print_dependencies;
use crate::cli::commands::tree::print_forest;
use crate::deps::{parse_list, parse_tree};
use crate::error::{PomlensError, PomlensResult};
use crate::ui::UiContext;
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Execute the parse command
pub async fn execute(args: ParseArgs) -> PomlensResult<()> {
    let ctx = UiContext::detect();
    let text = read_input(args.input.as_deref()).await?;

    match args.kind {
        ParseKind::Tree => {
            let forest = parse_tree(&text);
            debug!("Parsed {} root(s)", forest.len());
            print_forest(&ctx, &forest, tree_format(args.format))
        }
        ParseKind::List => {
            let deps = parse_list(&text);
            debug!("Parsed {} dependencies", deps.len());
            print_dependencies(&ctx, &deps, args.format)
        }
    }
}

fn tree_format(format: OutputFormat) -> TreeFormat {
    match format {
        OutputFormat::Table => TreeFormat::Tree,
        OutputFormat::Json => TreeFormat::Json,
        OutputFormat::Plain => TreeFormat::Plain,
    }
}

async fn read_input(input: Option<&Path>) -> PomlensResult<String> {
    match input {
        Some(path) if path != Path::new("-") => {
            if !path.exists() {
                return Err(PomlensError::PathNotFound(path.to_path_buf()));
            }
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| PomlensError::io(format!("reading {}", path.display()), e))
        }
        _ => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .map_err(|e| PomlensError::io("reading stdin", e))?;
            Ok(text)
        }
    }
}
