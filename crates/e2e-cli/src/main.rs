//! emergent-e2e: run the Emergent UI scenarios from the command line
//!
//! ## Usage
//!
//! ```bash
//! emergent-e2e --list                          # Show the catalogue
//! emergent-e2e --simulate                      # Run everything against the simulator
//! emergent-e2e -f authentication --filter login
//! emergent-e2e --config config/suite.yaml --set headless=true -j 4
//! ```

use clap::Parser;
use emergent_e2e::suites;
use emergent_e2e_cli::{
    check_summary, init_tracing, load_suite_config, Cli, CliConfig, CliError, CliResult,
    ColorChoice, TestRunner, Verbosity,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;
    init_tracing(config.verbosity);

    let suite = load_suite_config(cli.config.as_deref(), &cli.overrides)?;
    let groups = suites::select(&cli.features, cli.filter.as_deref())?;
    let runner = TestRunner::new(config, suite);

    if cli.list {
        runner.list(&groups);
        return Ok(());
    }

    let summary = runner.run(groups)?;
    check_summary(&summary)
}

fn build_config(cli: &Cli) -> CliResult<CliConfig> {
    if cli.parallel == 0 {
        return Err(CliError::invalid_argument("--parallel must be at least 1"));
    }
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.clone().into();

    Ok(CliConfig::new()
        .with_verbosity(verbosity)
        .with_color(color)
        .with_parallel(cli.parallel)
        .with_simulate(cli.simulate))
}
