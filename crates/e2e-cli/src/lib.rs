//! emergent-e2e CLI library
//!
//! Argument parsing, log setup, progress output and the glue that turns a
//! command line into a [`emergent_e2e::SuiteRunner`] run.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
mod output;
mod runner;

pub use commands::{Cli, ColorArg};
pub use config::{init_tracing, CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{render_listing, ProgressReporter};
pub use runner::{check_summary, load_suite_config, TestRunner};
