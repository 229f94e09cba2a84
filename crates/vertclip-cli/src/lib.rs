//! Keyframe-aligned vertical clip tool.
//!
//! This crate provides:
//! - Command-line arguments and environment configuration
//! - Input validation before any child process is spawned
//! - The probe, align and encode sequence of one invocation
//! - Tracing setup

pub mod app;
pub mod args;
pub mod config;
pub mod error;
pub mod logging;

pub use app::{execute, prepare, run, ClipOutcome, ClipRequest};
pub use args::Args;
pub use config::{CliConfig, LogFormat};
pub use error::{CliError, CliResult};
