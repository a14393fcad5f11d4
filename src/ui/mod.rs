//! Terminal output helpers
//!
//! Decorated output (colors, spinners) only when attached to an interactive
//! terminal; plain text otherwise so output stays pipeable. Data goes to
//! stdout, progress to stderr.

mod context;
mod output;
mod progress;

pub use context::UiContext;
pub use output::{key_value, print_json, section, step_info, step_ok, step_ok_detail};
pub use progress::TaskSpinner;
