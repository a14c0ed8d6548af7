//! Suite execution for the CLI
//!
//! ```text
//! Cli ──► load_suite_config (YAML + --set) ──► suites::select (--feature, --filter)
//!                                                  │
//!             SimFactory (--simulate) / BrowserFactory
//!                                                  ▼
//!         SuiteRunner ──► ProgressReporter (observer) ──► summary + exit status
//! ```

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{render_listing, ProgressReporter};
use emergent_e2e::sim::SimFactory;
use emergent_e2e::{
    BrowserFactory, DriverFactory, ReportingListener, RunObserver, ScenarioGroup, SuiteConfig,
    SuiteRunner, SuiteSummary,
};
use std::path::Path;
use std::sync::Arc;

/// Suite configuration from an optional YAML file plus `key=value` overrides,
/// applied in order
pub fn load_suite_config(path: Option<&Path>, overrides: &[String]) -> CliResult<SuiteConfig> {
    let mut config = match path {
        Some(path) if !path.is_file() => {
            return Err(CliError::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        Some(path) => SuiteConfig::load(path)?,
        None => SuiteConfig::default(),
    };
    config.apply_overrides(overrides)?;
    Ok(config)
}

/// Runs the selected scenario groups and reports progress on stderr
#[derive(Debug)]
pub struct TestRunner {
    config: CliConfig,
    suite: SuiteConfig,
}

impl TestRunner {
    /// Create a new test runner
    #[must_use]
    pub const fn new(config: CliConfig, suite: SuiteConfig) -> Self {
        Self { config, suite }
    }

    /// Get the CLI configuration
    #[must_use]
    pub const fn config(&self) -> &CliConfig {
        &self.config
    }

    /// Get the suite configuration
    #[must_use]
    pub const fn suite(&self) -> &SuiteConfig {
        &self.suite
    }

    /// Print the catalogue selection to stdout
    pub fn list(&self, groups: &[ScenarioGroup]) {
        print!("{}", render_listing(groups));
    }

    fn factory(&self) -> Arc<dyn DriverFactory> {
        if self.config.simulate {
            tracing::info!("Running against the simulator");
            Arc::new(SimFactory::new())
        } else {
            Arc::new(BrowserFactory)
        }
    }

    /// Run `groups` to completion on a fresh runtime
    pub fn run(&self, groups: Vec<ScenarioGroup>) -> CliResult<SuiteSummary> {
        let total: usize = groups.iter().map(ScenarioGroup::len).sum();
        let mut reporter =
            ProgressReporter::new(self.config.color.should_color(), self.config.verbosity);
        if total == 0 {
            reporter.warning("No scenarios match the selection");
            return Ok(SuiteSummary::default());
        }

        let target = if self.config.simulate {
            "simulator".to_string()
        } else {
            self.suite.browser.to_string()
        };
        reporter.header(&format!(
            "Running {total} scenarios in {} groups against {} ({target})",
            groups.len(),
            self.suite.base_url()
        ));
        reporter.start_progress(total as u64, "starting");
        let reporter = Arc::new(reporter);

        let listener = ReportingListener::global(&self.suite).clone();
        let runner = SuiteRunner::new(self.suite.clone(), self.factory(), listener)
            .with_parallel(self.config.parallel)
            .with_observer(Arc::clone(&reporter) as Arc<dyn RunObserver>);

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let summary = runtime.block_on(runner.run(groups));
        reporter.finish();

        match &summary.report_path {
            Some(path) => reporter.info(&format!("Report written to {}", path.display())),
            None => reporter.warning("No report was written"),
        }
        reporter.summary(
            summary.passed_count(),
            summary.failed_count(),
            summary.skipped_count(),
            summary.duration,
        );
        Ok(summary)
    }
}

/// Exit status for a finished run: success iff nothing failed
pub fn check_summary(summary: &SuiteSummary) -> CliResult<()> {
    if summary.all_passed() {
        Ok(())
    } else {
        Err(CliError::ScenariosFailed {
            failed: summary.failed_count(),
            total: summary.total(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::{ColorChoice, Verbosity};
    use emergent_e2e::{suites, ScenarioOutcome, ScenarioResult};
    use std::time::Duration;

    mod load_suite_config_tests {
        use super::*;

        #[test]
        fn test_defaults_without_file() {
            let config = load_suite_config(None, &[]).unwrap();
            assert_eq!(config, SuiteConfig::default());
        }

        #[test]
        fn test_overrides_apply_after_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("suite.yaml");
            std::fs::write(&path, "headless: false\nbrowser: edge\n").unwrap();
            let overrides = ["headless=true".to_string()];
            let config = load_suite_config(Some(&path), &overrides).unwrap();
            assert!(config.headless);
            assert_eq!(config.browser.to_string(), "edge");
        }

        #[test]
        fn test_missing_file_is_config_error() {
            let err = load_suite_config(Some(Path::new("/nonexistent/suite.yaml")), &[])
                .unwrap_err();
            assert!(matches!(err, CliError::Config { .. }));
        }

        #[test]
        fn test_malformed_override_is_rejected() {
            let overrides = ["headless".to_string()];
            let err = load_suite_config(None, &overrides).unwrap_err();
            assert!(err.to_string().contains("key=value"));
        }
    }

    mod run_tests {
        use super::*;

        fn runner(dir: &Path) -> TestRunner {
            let suite = load_suite_config(
                None,
                &[
                    format!("report.path={}", dir.join("reports").display()),
                    format!("screenshot.path={}", dir.join("shots").display()),
                ],
            )
            .unwrap();
            let config = CliConfig::new()
                .with_verbosity(Verbosity::Quiet)
                .with_color(ColorChoice::Never)
                .with_simulate(true);
            TestRunner::new(config, suite)
        }

        #[test]
        fn test_empty_selection_succeeds() {
            let dir = tempfile::tempdir().unwrap();
            let summary = runner(dir.path()).run(Vec::new()).unwrap();
            assert_eq!(summary.total(), 0);
            assert!(check_summary(&summary).is_ok());
        }

        #[test]
        fn test_simulated_run() {
            let dir = tempfile::tempdir().unwrap();
            let runner = runner(dir.path());
            assert!(runner.config().simulate);
            assert!(runner.suite().report_path.starts_with(dir.path()));
            let groups = suites::select(&[], Some("logout")).unwrap();
            let summary = runner.run(groups).unwrap();
            assert_eq!(summary.total(), 1);
            assert!(check_summary(&summary).is_ok());
        }
    }

    mod check_summary_tests {
        use super::*;

        #[test]
        fn test_failures_fail_the_run() {
            let summary = SuiteSummary {
                results: vec![
                    ScenarioResult {
                        feature: "authentication".to_string(),
                        scenario: "logout".to_string(),
                        outcome: ScenarioOutcome::failed(Duration::ZERO, "boom"),
                    },
                    ScenarioResult {
                        feature: "authentication".to_string(),
                        scenario: "later".to_string(),
                        outcome: ScenarioOutcome::skipped("not ready"),
                    },
                ],
                ..SuiteSummary::default()
            };
            let err = check_summary(&summary).unwrap_err();
            assert_eq!(err.to_string(), "1 of 2 scenarios failed");
        }

        #[test]
        fn test_skips_do_not_fail_the_run() {
            let summary = SuiteSummary {
                results: vec![ScenarioResult {
                    feature: "testing".to_string(),
                    scenario: "later".to_string(),
                    outcome: ScenarioOutcome::skipped("not ready"),
                }],
                ..SuiteSummary::default()
            };
            assert!(check_summary(&summary).is_ok());
        }
    }
}
