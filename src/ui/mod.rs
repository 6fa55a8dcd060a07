//! User-facing output of a run.
//!
//! `formatter` holds the pure rendering; the run-failure signal lives here
//! because it also decides the process exit status.

use std::process::ExitCode;

pub mod formatter;

pub use formatter::{
    display_boundary_warning, display_commit_analysis, display_error, display_info,
    display_release_summary, display_warning,
};

/// Report a failed run and return the failing exit status.
pub fn set_failed(message: &str) -> ExitCode {
    display_error(&format!("Action failed with error: {}", message));
    ExitCode::FAILURE
}
