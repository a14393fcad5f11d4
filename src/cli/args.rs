//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

const DEFAULT_POM: &str = "pom.xml";

/// pomlens - cached Maven dependency insight
///
/// Runs Maven dependency goals, turns their output into structured data
/// and caches the result per project descriptor.
#[derive(Parser, Debug)]
#[command(name = "pomlens")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "POMLENS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip local .pomlens.toml discovery
    #[arg(long, global = true)]
    pub no_local: bool,

    /// Cache directory (overrides cache.dir)
    #[arg(long, global = true, env = "POMLENS_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the dependency tree
    Tree(TreeArgs),

    /// Show the resolved dependency list
    List(ListArgs),

    /// Print the effective POM
    EffectivePom(PomArgs),

    /// Parse saved Maven output without running Maven
    Parse(ParseArgs),

    /// Inspect or clear the result cache
    Cache(CacheArgs),

    /// Show configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

/// Project descriptor selection shared by Maven-backed commands
#[derive(Parser, Debug)]
pub struct PomArgs {
    /// Path to pom.xml
    #[arg(short, long, default_value = DEFAULT_POM)]
    pub pom: PathBuf,

    /// Ignore cached results and rerun Maven
    #[arg(short, long)]
    pub refresh: bool,
}

/// Arguments for the tree command
#[derive(Parser, Debug)]
pub struct TreeArgs {
    #[command(flatten)]
    pub pom: PomArgs,

    /// Output format
    #[arg(short, long, default_value = "tree")]
    pub format: TreeFormat,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub pom: PomArgs,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the parse command
#[derive(Parser, Debug)]
pub struct ParseArgs {
    /// Kind of output to parse
    pub kind: ParseKind,

    /// File holding the output ("-" or omitted reads stdin)
    pub input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "json")]
    pub format: OutputFormat,
}

/// Saved output kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ParseKind {
    /// `mvn dependency:tree` output
    Tree,
    /// `mvn dependency:list` output
    List,
}

/// Output format for tree command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TreeFormat {
    /// Maven-style tree drawing
    Tree,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

/// Output format for list-like commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Show entry counts per tier
    Stats {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Drop cached results for one project
    Invalidate {
        /// Path to pom.xml
        #[arg(short, long, default_value = DEFAULT_POM)]
        pom: PathBuf,
    },

    /// Remove every cached result
    Clear,
}
