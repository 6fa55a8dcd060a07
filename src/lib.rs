pub mod analyzer;
pub mod boundary;
pub mod ci;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod host;
pub mod release;
pub mod telemetry;
pub mod ui;

pub use error::{ReleaseError, Result};
