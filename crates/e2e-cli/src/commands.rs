//! CLI argument definitions using clap

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// emergent-e2e: page-object UI scenarios for the Emergent web app
#[derive(Parser, Debug)]
#[command(name = "emergent-e2e")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Suite configuration file (YAML with dotted keys)
    #[arg(short, long, value_name = "FILE", env = "EMERGENT_E2E_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override one configuration key, e.g. `--set headless=true`
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,

    /// Run only this feature area (repeatable)
    #[arg(short, long = "feature", value_name = "AREA")]
    pub features: Vec<String>,

    /// Run only scenarios whose name contains this text
    #[arg(long, value_name = "SUBSTR")]
    pub filter: Option<String>,

    /// Number of feature groups to run at once
    #[arg(short = 'j', long, value_name = "N", default_value_t = 1)]
    pub parallel: usize,

    /// Run against the built-in simulator instead of a browser
    #[arg(long)]
    pub simulate: bool,

    /// List the selected scenarios without running them
    #[arg(long)]
    pub list: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorArg,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
