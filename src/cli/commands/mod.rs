//! CLI command implementations

pub mod cache;
pub mod completions;
pub mod config;
pub mod effective_pom;
pub mod list;
pub mod parse;
pub mod tree;

pub use cache::execute as cache;
pub use completions::execute as completions;
pub use config::execute as config;
pub use effective_pom::execute as effective_pom;
pub use list::execute as list;
pub use parse::execute as parse;
pub use tree::execute as tree;
