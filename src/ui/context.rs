//! Terminal capabilities for human-facing output
//!
//! Styled text goes to stdout and spinners to stderr, so each stream is
//! checked on its own: `pomlens tree --format json > deps.json` still gets a
//! spinner while the JSON stays undecorated.

use std::io::IsTerminal;

/// Variables whose presence marks a CI runner
const CI_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "JENKINS_URL",
    "BUILDKITE",
    "TEAMCITY_VERSION",
    "TF_BUILD",
    "BITBUCKET_BUILD_NUMBER",
];

/// What the attached terminal can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiContext {
    styled_stdout: bool,
    spinners: bool,
}

impl UiContext {
    /// Inspect the real streams and environment
    pub fn detect() -> Self {
        Self::from_parts(
            std::io::stdout().is_terminal(),
            std::io::stderr().is_terminal(),
            |var| std::env::var_os(var).is_some(),
        )
    }

    /// Plain output everywhere
    pub fn non_interactive() -> Self {
        Self {
            styled_stdout: false,
            spinners: false,
        }
    }

    fn from_parts(stdout_tty: bool, stderr_tty: bool, is_set: impl Fn(&str) -> bool) -> Self {
        if ci_detected(is_set) {
            return Self::non_interactive();
        }
        Self {
            styled_stdout: stdout_tty,
            spinners: stderr_tty,
        }
    }

    /// Whether stdout may carry colors and glyphs
    pub fn use_fancy_output(&self) -> bool {
        self.styled_stdout && console::colors_enabled()
    }

    /// Whether a spinner may draw on stderr
    pub fn use_spinner(&self) -> bool {
        self.spinners
    }
}

fn ci_detected(is_set: impl Fn(&str) -> bool) -> bool {
    CI_VARS.iter().any(|var| is_set(var))
}
