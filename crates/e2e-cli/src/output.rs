//! Output formatting and progress reporting

use crate::config::Verbosity;
use console::{style, Style, Term};
use emergent_e2e::{RunObserver, ScenarioGroup, ScenarioResult, ScenarioStatus};
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Write as _;
use std::time::Duration;

/// Progress reporter for a suite run
///
/// Doubles as the runner's [`RunObserver`]: every finished scenario advances
/// the bar, failures are printed as they happen.
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Output level
    pub verbosity: Verbosity,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, Verbosity::Normal)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, verbosity: Verbosity) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            verbosity,
        }
    }

    /// Start a progress bar; skipped when quiet or when every result gets its
    /// own line anyway
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.verbosity != Verbosity::Normal {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Increment progress
    pub fn increment(&self, delta: u64) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(delta);
        }
    }

    /// Update progress message
    pub fn set_message(&self, message: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_message(message.to_string());
        }
    }

    /// Finish progress bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }

    fn write_line(&self, line: &str) {
        let write = || {
            let _ = self.term.write_line(line);
        };
        match self.progress_bar {
            Some(ref pb) => pb.suspend(write),
            None => write(),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.verbosity.is_quiet() {
            return;
        }

        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "PASS".to_string()
        };

        self.write_line(&format!("{prefix} {message}"));
    }

    /// Print a failure message, even in quiet mode
    pub fn failure(&self, message: &str) {
        let prefix = if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "FAIL".to_string()
        };

        self.write_line(&format!("{prefix} {message}"));
    }

    /// Print a skip message
    pub fn skipped(&self, message: &str) {
        if self.verbosity.is_quiet() {
            return;
        }

        let prefix = if self.use_color {
            style("-").yellow().bold().to_string()
        } else {
            "SKIP".to_string()
        };

        self.write_line(&format!("{prefix} {message}"));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.verbosity.is_quiet() {
            return;
        }

        let prefix = if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "WARN".to_string()
        };

        self.write_line(&format!("{prefix} {message}"));
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.verbosity.is_quiet() {
            return;
        }

        let prefix = if self.use_color {
            style("ℹ").blue().bold().to_string()
        } else {
            "INFO".to_string()
        };

        self.write_line(&format!("{prefix} {message}"));
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.verbosity.is_quiet() {
            return;
        }

        let line = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            title.to_string()
        };
        self.write_line(&line);
    }

    /// Print the final tally
    pub fn summary(&self, passed: usize, failed: usize, skipped: usize, duration: Duration) {
        if self.verbosity.is_quiet() && failed == 0 {
            return;
        }

        self.write_line("");

        let total = passed + failed + skipped;
        let duration_secs = duration.as_secs_f64();

        if self.use_color {
            let passed_style = Style::new().green().bold();
            let failed_style = Style::new().red().bold();
            let skipped_style = Style::new().yellow();

            let status = if failed > 0 {
                failed_style.apply_to("FAILED")
            } else {
                passed_style.apply_to("PASSED")
            };

            self.write_line(&format!(
                "{} {} scenarios in {:.2}s ({} passed, {} failed, {} skipped)",
                status,
                total,
                duration_secs,
                passed_style.apply_to(passed),
                if failed > 0 {
                    failed_style.apply_to(failed).to_string()
                } else {
                    failed.to_string()
                },
                skipped_style.apply_to(skipped)
            ));
        } else {
            let status = if failed > 0 { "FAILED" } else { "PASSED" };
            self.write_line(&format!(
                "{status} {total} scenarios in {duration_secs:.2}s \
                 ({passed} passed, {failed} failed, {skipped} skipped)"
            ));
        }
    }
}

impl RunObserver for ProgressReporter {
    fn on_result(&self, result: &ScenarioResult) {
        let label = format!("{}::{}", result.feature, result.scenario);
        let detail = result.outcome.detail.as_deref().unwrap_or("");
        match result.outcome.status {
            ScenarioStatus::Passed => {
                if self.verbosity.is_verbose() {
                    self.success(&format!(
                        "{label} ({:.2}s)",
                        result.outcome.duration.as_secs_f64()
                    ));
                }
            }
            ScenarioStatus::Failed => self.failure(&format!("{label}: {detail}")),
            ScenarioStatus::Skipped => {
                if self.verbosity.is_verbose() {
                    self.skipped(&format!("{label}: {detail}"));
                }
            }
        }
        self.increment(1);
        self.set_message(&label);
    }
}

/// Plain-text catalogue listing: one line per group, one indented line per
/// scenario with its description
#[must_use]
pub fn render_listing(groups: &[ScenarioGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        let _ = writeln!(out, "{} ({})", group.feature(), group.len());
        for scenario in group.scenarios() {
            let _ = write!(out, "  {}", scenario.name());
            if !scenario.description().is_empty() {
                let _ = write!(out, "  {}", scenario.description());
            }
            if let Some(reason) = scenario.skip_reason() {
                let _ = write!(out, "  [skipped: {reason}]");
            }
            out.push('\n');
        }
    }
    let total: usize = groups.iter().map(ScenarioGroup::len).sum();
    let _ = writeln!(out, "{total} scenarios in {} groups", groups.len());
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use emergent_e2e::{suites, Scenario, ScenarioOutcome};

    fn result(status: ScenarioStatus) -> ScenarioResult {
        let outcome = match status {
            ScenarioStatus::Passed => ScenarioOutcome::passed(Duration::from_millis(10)),
            ScenarioStatus::Failed => ScenarioOutcome::failed(Duration::ZERO, "boom"),
            ScenarioStatus::Skipped => ScenarioOutcome::skipped("later"),
        };
        ScenarioResult {
            feature: "authentication".to_string(),
            scenario: "logout".to_string(),
            outcome,
        }
    }

    mod progress_reporter_tests {
        use super::*;

        #[test]
        fn test_default() {
            let reporter = ProgressReporter::default();
            assert!(reporter.use_color);
            assert_eq!(reporter.verbosity, Verbosity::Normal);
        }

        #[test]
        fn test_progress_only_at_normal_verbosity() {
            let mut normal = ProgressReporter::new(false, Verbosity::Normal);
            normal.start_progress(3, "starting");
            assert!(normal.progress_bar.is_some());

            let mut quiet = ProgressReporter::new(false, Verbosity::Quiet);
            quiet.start_progress(3, "starting");
            assert!(quiet.progress_bar.is_none());

            let mut verbose = ProgressReporter::new(false, Verbosity::Verbose);
            verbose.start_progress(3, "starting");
            assert!(verbose.progress_bar.is_none());
        }

        #[test]
        fn test_observer_advances_bar() {
            let mut reporter = ProgressReporter::new(false, Verbosity::Normal);
            reporter.start_progress(3, "starting");
            reporter.on_result(&result(ScenarioStatus::Passed));
            reporter.on_result(&result(ScenarioStatus::Failed));
            reporter.on_result(&result(ScenarioStatus::Skipped));
            let pb = reporter.progress_bar.as_ref().unwrap();
            assert_eq!(pb.position(), 3);
            assert_eq!(pb.message(), "authentication::logout");
            reporter.finish();
        }

        #[test]
        fn test_messages_without_bar() {
            let reporter = ProgressReporter::new(false, Verbosity::Verbose);
            reporter.header("Running");
            reporter.success("ok");
            reporter.failure("bad");
            reporter.skipped("later");
            reporter.warning("careful");
            reporter.info("fyi");
            reporter.summary(1, 1, 1, Duration::from_secs(2));
            reporter.on_result(&result(ScenarioStatus::Passed));
        }
    }

    mod listing_tests {
        use super::*;

        #[test]
        fn test_listing_shows_groups_and_descriptions() {
            let groups = vec![ScenarioGroup::new("smoke")
                .with_scenario(
                    Scenario::new("opens_home", |_ctx| Box::pin(async { Ok(()) }))
                        .with_description("Home page opens"),
                )
                .with_scenario(
                    Scenario::new("later", |_ctx| Box::pin(async { Ok(()) })).skip("not ready"),
                )];
            let text = render_listing(&groups);
            assert!(text.starts_with("smoke (2)\n"));
            assert!(text.contains("  opens_home  Home page opens\n"));
            assert!(text.contains("  later  [skipped: not ready]\n"));
            assert!(text.ends_with("2 scenarios in 1 groups\n"));
        }

        #[test]
        fn test_listing_covers_catalogue() {
            let groups = suites::all();
            let text = render_listing(&groups);
            for feature in suites::FEATURES {
                assert!(text.contains(feature), "missing {feature}");
            }
        }
    }
}
