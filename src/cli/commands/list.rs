//! List command - show resolved dependencies

use crate::cli::args::{ListArgs, OutputFormat};
use crate::config::Config;
use crate::deps::ResolvedDependency;
use crate::error::PomlensResult;
use crate::service::DependencyService;
use crate::ui::{self, TaskSpinner, UiContext};
use console::style;

/// Execute the list command
pub async fn execute(args: ListArgs, config: &Config) -> PomlensResult<()> {
    let ctx = UiContext::detect();
    let service = DependencyService::from_config(config);

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start(&format!(
        "Resolving dependencies for {}",
        args.pom.pom.display()
    ));
    let deps = match service
        .resolved_dependencies(&args.pom.pom, args.pom.refresh)
        .await
    {
        Ok(deps) => {
            spinner.clear();
            deps
        }
        Err(e) => {
            spinner.stop_error("Dependency resolution failed");
            return Err(e);
        }
    };

    print_dependencies(&ctx, &deps, args.format)
}

/// Print resolved dependencies in the requested format
pub(crate) fn print_dependencies(
    ctx: &UiContext,
    deps: &[ResolvedDependency],
    format: OutputFormat,
) -> PomlensResult<()> {
    if deps.is_empty() {
        match format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => ui::step_info(ctx, "No dependencies found"),
        }
        return Ok(());
    }

    match format {
        OutputFormat::Table => print_table(deps),
        OutputFormat::Json => ui::print_json(deps)?,
        OutputFormat::Plain => {
            for dep in deps {
                println!("{}", dep);
            }
        }
    }

    Ok(())
}

fn print_table(deps: &[ResolvedDependency]) {
    let group_width = column_width("GROUP", deps.iter().map(|d| d.group_id.as_str()));
    let artifact_width = column_width("ARTIFACT", deps.iter().map(|d| d.artifact_id.as_str()));
    let version_width = column_width("VERSION", deps.iter().map(|d| d.version.as_str()));

    println!(
        "{:<gw$} {:<aw$} {:<vw$} {}",
        style("GROUP").bold(),
        style("ARTIFACT").bold(),
        style("VERSION").bold(),
        style("SCOPE").bold(),
        gw = group_width,
        aw = artifact_width,
        vw = version_width,
    );
    println!("{}", "-".repeat(group_width + artifact_width + version_width + 12));

    for dep in deps {
        println!(
            "{:<gw$} {:<aw$} {:<vw$} {}",
            dep.group_id,
            dep.artifact_id,
            dep.version,
            style(dep.scope.as_deref().unwrap_or("-")).dim(),
            gw = group_width,
            aw = artifact_width,
            vw = version_width,
        );
    }

    println!();
    println!("{} dependencies", deps.len());
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values.map(str::len).max().unwrap_or(0).max(header.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_width_covers_header_and_values() {
        assert_eq!(column_width("GROUP", ["a", "org.example"].into_iter()), 11);
        assert_eq!(column_width("VERSION", ["1.0"].into_iter()), 7);
        assert_eq!(column_width("SCOPE", std::iter::empty()), 5);
    }
}
