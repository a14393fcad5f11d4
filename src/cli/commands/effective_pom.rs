//! Effective-pom command - print the fully resolved project descriptor

use crate::cli::args::PomArgs;
use crate::config::Config;
use crate::error::PomlensResult;
use crate::service::DependencyService;
use crate::ui::{TaskSpinner, UiContext};

/// Execute the effective-pom command
pub async fn execute(args: PomArgs, config: &Config) -> PomlensResult<()> {
    let ctx = UiContext::detect();
    let service = DependencyService::from_config(config);

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start(&format!("Computing effective POM for {}", args.pom.display()));
    match service.effective_pom(&args.pom, args.refresh).await {
        Ok(xml) => {
            spinner.clear();
            println!("{}", xml);
            Ok(())
        }
        Err(e) => {
            spinner.stop_error("Effective POM failed");
            Err(e)
        }
    }
}
