//! Tree command - show the dependency tree

use crate::cli::args::{TreeArgs, TreeFormat};
use crate::config::Config;
use crate::deps::render::short_label;
use crate::deps::{flatten, render_tree, DependencyNode};
use crate::error::PomlensResult;
use crate::service::DependencyService;
use crate::ui::{self, TaskSpinner, UiContext};

/// Execute the tree command
pub async fn execute(args: TreeArgs, config: &Config) -> PomlensResult<()> {
    let ctx = UiContext::detect();
    let service = DependencyService::from_config(config);

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start(&format!(
        "Resolving dependency tree for {}",
        args.pom.pom.display()
    ));
    let forest = match service.dependency_tree(&args.pom.pom, args.pom.refresh).await {
        Ok(forest) => {
            spinner.clear();
            forest
        }
        Err(e) => {
            spinner.stop_error("Dependency tree failed");
            return Err(e);
        }
    };

    print_forest(&ctx, &forest, args.format)
}

/// Print a dependency forest in the requested format
pub(crate) fn print_forest(
    ctx: &UiContext,
    forest: &[DependencyNode],
    format: TreeFormat,
) -> PomlensResult<()> {
    if forest.is_empty() && format != TreeFormat::Json {
        ui::step_info(ctx, "No dependencies found");
        return Ok(());
    }

    match format {
        TreeFormat::Tree => {
            for line in render_tree(forest).lines() {
                println!("{}", line.strip_prefix("[INFO] ").unwrap_or(line));
            }
        }
        TreeFormat::Json => ui::print_json(forest)?,
        TreeFormat::Plain => {
            for row in flatten(forest) {
                println!("{}{}", "  ".repeat(row.depth), short_label(row.node));
            }
        }
    }

    Ok(())
}
