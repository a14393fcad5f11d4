//! Maven invocation
//!
//! Failures are classified once, here: a missing executable, a transient
//! network problem (retried with exponential backoff), or a terminal tool
//! failure that carries Maven's own output.

use crate::config::schema::MavenConfig;
use crate::error::{PomlensError, PomlensResult};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Max number of output lines to include in failure diagnostics.
const DIAGNOSTIC_TAIL_LINES: usize = 50;

/// Output fragments that mark a failure as a transient network problem
pub const TRANSIENT_PATTERNS: &[&str] = &[
    "Could not transfer artifact",
    "Connection timed out",
    "Connection refused",
    "UnknownHostException",
    "SocketTimeoutException",
    "Connection reset",
    "Temporary failure in name resolution",
    "Network is unreachable",
];

/// Captured output of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// How a failed run should be treated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureClass {
    /// Worth retrying
    Transient(String),
    /// Final; carries the diagnostic text
    Fatal(String),
}

/// Classify the output of a failed run
pub fn classify_failure(stdout: &str, stderr: &str) -> FailureClass {
    let matched = stdout
        .lines()
        .chain(stderr.lines())
        .find(|line| TRANSIENT_PATTERNS.iter().any(|p| line.contains(p)));

    match matched {
        Some(line) => FailureClass::Transient(line.trim().to_string()),
        None => FailureClass::Fatal(diagnostic_tail(stdout, stderr)),
    }
}

/// Extract the useful tail of tool output for error diagnostics.
///
/// Combines stdout and stderr, then returns the last `DIAGNOSTIC_TAIL_LINES`
/// lines so error messages are actionable without being overwhelming.
pub(crate) fn diagnostic_tail(stdout: &str, stderr: &str) -> String {
    let lines: Vec<&str> = stdout.lines().chain(stderr.lines()).collect();
    let total = lines.len();
    let tail: Vec<&str> = if total > DIAGNOSTIC_TAIL_LINES {
        lines[total - DIAGNOSTIC_TAIL_LINES..].to_vec()
    } else {
        lines
    };
    tail.join("\n")
}

/// Runs the external dependency tool
#[async_trait]
pub trait DependencyTool: Send + Sync {
    /// Run with `args` in `cwd`, returning captured output on success
    async fn run(&self, args: &[String], cwd: &Path) -> PomlensResult<ToolOutput>;

    /// Human-readable tool name for display
    fn tool_name(&self) -> &str;
}

/// Maven goals used by pomlens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    DependencyTree,
    DependencyList,
    EffectivePom,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DependencyTree => "dependency:tree",
            Self::DependencyList => "dependency:list",
            Self::EffectivePom => "help:effective-pom",
        }
    }
}

/// Build the argument list for a goal against `pom`
pub fn goal_args(config: &MavenConfig, goal: Goal, pom: &Path) -> Vec<String> {
    let mut args = vec![
        goal.as_str().to_string(),
        "-B".to_string(),
        "-f".to_string(),
        pom.to_string_lossy().into_owned(),
    ];
    if config.offline {
        args.push("-o".to_string());
    }
    args.extend(config.extra_args.iter().cloned());
    args
}

/// `DependencyTool` backed by the Maven command line
pub struct MavenRunner {
    config: MavenConfig,
}

impl MavenRunner {
    pub fn new(config: MavenConfig) -> Self {
        Self { config }
    }

    /// Single attempt
    async fn exec(&self, args: &[String], cwd: &Path) -> Result<ToolOutput, AttemptError> {
        debug!("Executing: {} {:?} in {}", self.config.executable, args, cwd.display());

        let output = Command::new(&self.config.executable)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => AttemptError::Fatal(PomlensError::ToolMissing {
                    tool: self.config.executable.clone(),
                }),
                _ => AttemptError::Fatal(PomlensError::io(
                    format!("running {}", self.config.executable),
                    e,
                )),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            return Ok(ToolOutput { stdout, stderr });
        }

        match classify_failure(&stdout, &stderr) {
            FailureClass::Transient(detail) => Err(AttemptError::Transient(detail)),
            FailureClass::Fatal(diagnostic) => Err(AttemptError::Fatal(
                PomlensError::tool_failure(self.command_line(args), diagnostic),
            )),
        }
    }

    fn command_line(&self, args: &[String]) -> String {
        let goal = args.first().map(String::as_str).unwrap_or_default();
        format!("{} {}", self.config.executable, goal)
    }
}

enum AttemptError {
    Transient(String),
    Fatal(PomlensError),
}

#[async_trait]
impl DependencyTool for MavenRunner {
    async fn run(&self, args: &[String], cwd: &Path) -> PomlensResult<ToolOutput> {
        let mut backoff = Duration::from_millis(self.config.initial_backoff_ms);
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            match self.exec(args, cwd).await {
                Ok(output) => return Ok(output),
                Err(AttemptError::Fatal(e)) => return Err(e),
                Err(AttemptError::Transient(detail)) => {
                    if attempt > self.config.max_retries {
                        return Err(PomlensError::TransientNetwork {
                            attempts: attempt,
                            detail,
                        });
                    }
                    warn!(
                        "{} (attempt {}), retrying in {:?}",
                        detail, attempt, backoff
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = backoff.saturating_mul(2);
                    info!("Retrying {}", self.command_line(args));
                }
            }
        }
    }

    fn tool_name(&self) -> &str {
        &self.config.executable
    }
}
