//! External tool collaborator
//!
//! Provides the `DependencyTool` trait the dependency service runs against,
//! and `MavenRunner`, which implements it on top of the `mvn` command line.

mod runner;

pub(crate) use runner::diagnostic_tail;
pub use runner::{
    classify_failure, goal_args, DependencyTool, FailureClass, Goal, MavenRunner, ToolOutput,
    TRANSIENT_PATTERNS,
};
