//! Scenarios, scenario groups and the suite runner.
//!
//! A [`Scenario`] is an async body over a [`ScenarioContext`]. Scenarios are
//! collected into [`ScenarioGroup`]s (one per feature area); every group gets
//! its own [`SuiteFixture`] and therefore its own browser session.
//!
//! ```text
//! SuiteRunner::run
//!   ├── group "authentication" ── fixture.start()
//!   │     ├── before_scenario ── body(ctx) ── listener.on_success / on_failure
//!   │     ├── after_scenario
//!   │     └── ... ── fixture.close()
//!   ├── group "deployment" (same, possibly on another task)
//!   └── listener.flush()
//! ```
//!
//! ## Toyota Way Application
//!
//! - **Jidoka**: A failed or panicking scenario is recorded with a screenshot
//!   and the group moves on; sibling scenarios are never skipped because of it
//! - **Heijunka**: `parallel` bounds how many sessions run at once

use crate::config::{SuiteConfig, Timeouts};
use crate::driver::DriverFactory;
use crate::fixture::{log_in, SuiteFixture};
use crate::pages::{DashboardPage, ForgotPasswordPage, HomePage, LoginPage, SignUpPage};
use crate::reporter::{ReportingListener, ScenarioOutcome, ScenarioReport, ScreenCapture};
use crate::result::{E2eError, E2eResult};
use crate::session::Session;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// Future returned by a scenario body
pub type ScenarioFuture<'a> = BoxFuture<'a, E2eResult<()>>;

type ScenarioBody = Arc<dyn for<'a> Fn(&'a ScenarioContext) -> ScenarioFuture<'a> + Send + Sync>;

// =============================================================================
// SCENARIO
// =============================================================================

/// One independently assertable test case
#[derive(Clone)]
pub struct Scenario {
    name: String,
    description: String,
    skip_reason: Option<String>,
    body: ScenarioBody,
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("skip_reason", &self.skip_reason)
            .finish_non_exhaustive()
    }
}

impl Scenario {
    /// Create a scenario from an async body
    ///
    /// ```ignore
    /// Scenario::new("valid_login", |ctx| Box::pin(valid_login(ctx)))
    /// ```
    #[must_use]
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: for<'a> Fn(&'a ScenarioContext) -> ScenarioFuture<'a> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: String::new(),
            skip_reason: None,
            body: Arc::new(body),
        }
    }

    /// Set description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Report the scenario as skipped instead of running it
    #[must_use]
    pub fn skip(mut self, reason: impl Into<String>) -> Self {
        self.skip_reason = Some(reason.into());
        self
    }

    /// Scenario name, unique within its group
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Why the scenario is skipped, if it is
    #[must_use]
    pub fn skip_reason(&self) -> Option<&str> {
        self.skip_reason.as_deref()
    }
}

/// Scenarios sharing one browser session
#[derive(Debug, Clone)]
pub struct ScenarioGroup {
    feature: String,
    scenarios: Vec<Scenario>,
}

impl ScenarioGroup {
    /// Create an empty group for a feature area
    #[must_use]
    pub fn new(feature: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            scenarios: Vec::new(),
        }
    }

    /// Add a scenario
    #[must_use]
    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenarios.push(scenario);
        self
    }

    /// Add several scenarios
    #[must_use]
    pub fn with_scenarios(mut self, scenarios: impl IntoIterator<Item = Scenario>) -> Self {
        self.scenarios.extend(scenarios);
        self
    }

    /// Feature area name
    #[must_use]
    pub fn feature(&self) -> &str {
        &self.feature
    }

    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Keep only scenarios whose name contains `pattern`
    #[must_use]
    pub fn filtered(mut self, pattern: &str) -> Self {
        self.scenarios.retain(|s| s.name.contains(pattern));
        self
    }
}

// =============================================================================
// CONTEXT
// =============================================================================

/// Everything a scenario body may use
///
/// Home, login and dashboard pages are the group fixture's shared objects;
/// the other screens are built on demand over the same session.
#[derive(Debug, Clone)]
pub struct ScenarioContext {
    session: Session,
    home_page: HomePage,
    login_page: LoginPage,
    dashboard_page: DashboardPage,
    config: SuiteConfig,
    report: ScenarioReport,
}

impl ScenarioContext {
    /// Context over an active fixture
    pub fn from_fixture(fixture: &SuiteFixture, report: ScenarioReport) -> E2eResult<Self> {
        Ok(Self {
            session: fixture.session()?.clone(),
            home_page: fixture.home_page()?.clone(),
            login_page: fixture.login_page()?.clone(),
            dashboard_page: fixture.dashboard_page()?.clone(),
            config: fixture.config().clone(),
            report,
        })
    }

    /// Group session
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Per-scenario log
    #[must_use]
    pub fn report(&self) -> &ScenarioReport {
        &self.report
    }

    #[must_use]
    pub fn home_page(&self) -> &HomePage {
        &self.home_page
    }

    #[must_use]
    pub fn login_page(&self) -> &LoginPage {
        &self.login_page
    }

    #[must_use]
    pub fn signup_page(&self) -> SignUpPage {
        SignUpPage::new(self.session.clone())
    }

    #[must_use]
    pub fn forgot_password_page(&self) -> ForgotPasswordPage {
        ForgotPasswordPage::new(self.session.clone())
    }

    #[must_use]
    pub fn dashboard_page(&self) -> &DashboardPage {
        &self.dashboard_page
    }

    /// Log in with `test.username` / `test.password`
    pub async fn login_with_default_credentials(&self) -> E2eResult<DashboardPage> {
        self.login_with_credentials(&self.config.test_username, &self.config.test_password)
            .await
    }

    /// Open the login screen and log in
    pub async fn login_with_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> E2eResult<DashboardPage> {
        self.report.info(&format!("Logging in as {email}"));
        log_in(&self.login_page, email, password).await
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// Outcome of one scenario within a run
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Feature area of the group
    pub feature: String,
    /// Scenario name
    pub scenario: String,
    /// Recorded outcome
    pub outcome: ScenarioOutcome,
}

/// Results of a whole suite run
#[derive(Debug, Clone, Default)]
pub struct SuiteSummary {
    /// Per-scenario results, grouped in catalogue order
    pub results: Vec<ScenarioResult>,
    /// Wall-clock duration
    pub duration: Duration,
    /// Written HTML report, if flushing succeeded
    pub report_path: Option<PathBuf>,
}

impl SuiteSummary {
    /// No scenario failed; skips do not count against the run
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.count(|o| o.status.is_passed())
    }

    /// Failed scenarios, counted
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(|o| o.status.is_failed())
    }

    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.total() - self.passed_count() - self.failed_count()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Failed scenarios
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioResult> {
        self.results
            .iter()
            .filter(|r| r.outcome.status.is_failed())
            .collect()
    }

    fn count(&self, pred: impl Fn(&ScenarioOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }
}

// =============================================================================
// RUNNER
// =============================================================================

/// Notified once per finished scenario, in completion order
pub trait RunObserver: Send + Sync + fmt::Debug {
    /// Called after the listener has recorded `result`
    fn on_result(&self, result: &ScenarioResult);
}

/// Runs scenario groups, one fixture per group
#[derive(Debug, Clone)]
pub struct SuiteRunner {
    config: SuiteConfig,
    factory: Arc<dyn DriverFactory>,
    listener: ReportingListener,
    timeouts: Timeouts,
    parallel: usize,
    observer: Option<Arc<dyn RunObserver>>,
}

impl SuiteRunner {
    /// Create a sequential runner
    #[must_use]
    pub fn new(
        config: SuiteConfig,
        factory: Arc<dyn DriverFactory>,
        listener: ReportingListener,
    ) -> Self {
        let timeouts = config.timeouts();
        Self {
            config,
            factory,
            listener,
            timeouts,
            parallel: 1,
            observer: None,
        }
    }

    /// Run up to `n` groups at once (minimum 1)
    #[must_use]
    pub fn with_parallel(mut self, n: usize) -> Self {
        self.parallel = n.max(1);
        self
    }

    /// Replace the timeouts derived from the config
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Report each scenario result to `observer` as soon as it is known
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    #[must_use]
    pub const fn listener(&self) -> &ReportingListener {
        &self.listener
    }

    /// Run every group, then write the report
    pub async fn run(&self, groups: Vec<ScenarioGroup>) -> SuiteSummary {
        let start = Instant::now();
        tracing::info!(
            groups = groups.len(),
            parallel = self.parallel,
            "Starting suite"
        );

        let results = if self.parallel <= 1 {
            let mut results = Vec::new();
            for group in &groups {
                results.extend(self.run_group(group).await);
            }
            results
        } else {
            self.run_parallel(groups).await
        };

        let report_path = match self.listener.flush() {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(error = %e, "report not written");
                None
            }
        };
        let summary = SuiteSummary {
            results,
            duration: start.elapsed(),
            report_path,
        };
        tracing::info!(
            passed = summary.passed_count(),
            failed = summary.failed_count(),
            skipped = summary.skipped_count(),
            duration_ms = summary.duration.as_millis() as u64,
            "Suite finished"
        );
        summary
    }

    async fn run_parallel(&self, groups: Vec<ScenarioGroup>) -> Vec<ScenarioResult> {
        let permits = Arc::new(Semaphore::new(self.parallel));
        let mut handles = Vec::with_capacity(groups.len());
        for group in groups {
            let runner = self.clone();
            let permits = Arc::clone(&permits);
            let feature = group.feature.clone();
            let handle = tokio::spawn(async move {
                let _permit = permits.acquire_owned().await.ok();
                runner.run_group(&group).await
            });
            handles.push((feature, handle));
        }

        let mut results = Vec::new();
        for (feature, handle) in handles {
            match handle.await {
                Ok(group_results) => results.extend(group_results),
                Err(e) => {
                    tracing::error!(feature = %feature, error = %e, "scenario group task aborted");
                    results.push(ScenarioResult {
                        scenario: format!("{feature} (group)"),
                        feature,
                        outcome: ScenarioOutcome::failed(Duration::ZERO, e.to_string()),
                    });
                }
            }
        }
        results
    }

    /// Run one group on its own session; teardown always happens
    pub async fn run_group(&self, group: &ScenarioGroup) -> Vec<ScenarioResult> {
        let feature = group.feature();
        let mut fixture = SuiteFixture::new(self.config.clone(), Arc::clone(&self.factory))
            .with_timeouts(self.timeouts);

        let started = fixture.start().await;
        let session = match started.and_then(|()| fixture.session().cloned()) {
            Ok(session) => session,
            Err(e) => {
                tracing::error!(feature, error = %e, "session setup failed");
                let mut results = Vec::with_capacity(group.len());
                for scenario in group.scenarios() {
                    let report = self.start_report(feature, scenario);
                    let outcome = self.listener.on_failure(&report, &e, None).await;
                    results.push(self.result(feature, scenario, outcome));
                }
                if let Err(close_err) = fixture.close().await {
                    tracing::warn!(feature, error = %close_err, "teardown failed");
                }
                return results;
            }
        };

        let mut results = Vec::with_capacity(group.len());
        for scenario in group.scenarios() {
            let report = self.start_report(feature, scenario);
            let outcome = if let Some(reason) = scenario.skip_reason() {
                self.listener.on_skip(&report, reason)
            } else {
                let body = async {
                    fixture.before_scenario().await?;
                    let ctx = ScenarioContext::from_fixture(&fixture, report.clone())?;
                    (scenario.body)(&ctx).await
                };
                let run = match AssertUnwindSafe(body).catch_unwind().await {
                    Ok(run) => run,
                    Err(payload) => Err(E2eError::assertion(format!(
                        "scenario panicked: {}",
                        panic_message(&*payload)
                    ))),
                };
                let outcome = match run {
                    Ok(()) => self.listener.on_success(&report),
                    Err(e) => {
                        self.listener
                            .on_failure(&report, &e, Some(&session as &dyn ScreenCapture))
                            .await
                    }
                };
                if let Err(e) = fixture.after_scenario().await {
                    tracing::warn!(
                        scenario = scenario.name(),
                        error = %e,
                        "after-scenario hook failed"
                    );
                }
                outcome
            };
            results.push(self.result(feature, scenario, outcome));
        }

        if let Err(e) = fixture.close().await {
            tracing::warn!(feature, error = %e, "teardown failed");
        }
        results
    }

    fn start_report(&self, feature: &str, scenario: &Scenario) -> ScenarioReport {
        self.listener
            .on_scenario_start(scenario.name(), scenario.description(), feature)
    }

    fn result(
        &self,
        feature: &str,
        scenario: &Scenario,
        outcome: ScenarioOutcome,
    ) -> ScenarioResult {
        let result = ScenarioResult {
            feature: feature.to_string(),
            scenario: scenario.name().to_string(),
            outcome,
        };
        if let Some(observer) = &self.observer {
            observer.on_result(&result);
        }
        result
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{Driver, DriverConfig};
    use crate::ensure;
    use crate::page_object::PageObject;
    use crate::reporter::ScenarioStatus;
    use crate::sim::SimFactory;
    use async_trait::async_trait;

    fn config(dir: &std::path::Path) -> SuiteConfig {
        SuiteConfig::default()
            .with_report_path(dir.join("reports"))
            .with_screenshot_path(dir.join("shots"))
    }

    fn runner(dir: &std::path::Path, factory: Arc<dyn DriverFactory>) -> SuiteRunner {
        let config = config(dir);
        let listener = ReportingListener::new(&config);
        SuiteRunner::new(config, factory, listener)
            .with_timeouts(Timeouts::uniform(
                Duration::from_millis(300),
                Duration::from_millis(5),
            ))
    }

    async fn on_home(ctx: &ScenarioContext) -> E2eResult<()> {
        let title = ctx.session().title().await?;
        ensure!(title == "Emergent", "expected the home page, got '{title}'");
        Ok(())
    }

    async fn always_fails(_ctx: &ScenarioContext) -> E2eResult<()> {
        Err(E2eError::assertion("boom"))
    }

    fn group() -> ScenarioGroup {
        ScenarioGroup::new("smoke")
            .with_scenario(Scenario::new("on_home", |ctx| Box::pin(on_home(ctx))))
            .with_scenario(Scenario::new("always_fails", |ctx| Box::pin(always_fails(ctx))))
            .with_scenario(
                Scenario::new("later", |ctx| Box::pin(on_home(ctx))).skip("not ready"),
            )
    }

    async fn panics(_ctx: &ScenarioContext) -> E2eResult<()> {
        panic!("lost the dashboard");
    }

    fn panicking_group() -> ScenarioGroup {
        ScenarioGroup::new("smoke")
            .with_scenario(Scenario::new("panics", |ctx| Box::pin(panics(ctx))))
            .with_scenario(Scenario::new("on_home", |ctx| Box::pin(on_home(ctx))))
    }

    async fn shared_pages(ctx: &ScenarioContext) -> E2eResult<()> {
        let id = ctx.session().id();
        ensure!(ctx.home_page().session().id() == id, "home page on another session");
        ensure!(ctx.login_page().session().id() == id, "login page on another session");
        ensure!(ctx.dashboard_page().session().id() == id, "dashboard on another session");
        ensure!(ctx.signup_page().session().id() == id, "sign-up page on another session");
        let dashboard = ctx.login_with_default_credentials().await?;
        ensure!(dashboard.is_loaded().await, "dashboard did not load after login");
        Ok(())
    }

    #[derive(Debug)]
    struct FailingFactory;

    #[async_trait]
    impl DriverFactory for FailingFactory {
        async fn create(&self, _config: &DriverConfig) -> E2eResult<Arc<dyn Driver>> {
            Err(E2eError::BrowserLaunch {
                message: "no browser here".to_string(),
            })
        }
    }

    mod runner_tests {
        use super::*;

        #[tokio::test]
        async fn test_outcomes_and_teardown() {
            let dir = tempfile::tempdir().unwrap();
            let factory = SimFactory::new();
            let summary = runner(dir.path(), Arc::new(factory.clone()))
                .run(vec![group()])
                .await;
            assert_eq!(summary.total(), 3);
            assert_eq!(summary.passed_count(), 1);
            assert_eq!(summary.failed_count(), 1);
            assert_eq!(summary.skipped_count(), 1);
            assert!(!summary.all_passed());
            assert_eq!(summary.failures()[0].scenario, "always_fails");
            assert!(summary.failures()[0].outcome.screenshot_path.is_some());
            assert!(summary.report_path.as_ref().unwrap().exists());
            assert_eq!(factory.quit_count(), 1);
        }

        #[tokio::test]
        async fn test_parallel_uses_one_session_per_group() {
            let dir = tempfile::tempdir().unwrap();
            let factory = SimFactory::new();
            let groups = vec![group(), group().filtered("on_home"), group().filtered("later")];
            let summary = runner(dir.path(), Arc::new(factory.clone()))
                .with_parallel(3)
                .run(groups)
                .await;
            assert_eq!(summary.total(), 5);
            assert_eq!(summary.results[0].scenario, "on_home");
            assert_eq!(factory.launch_count(), 3);
            assert_eq!(factory.quit_count(), 3);
        }

        #[tokio::test]
        async fn test_setup_failure_fails_every_scenario() {
            let dir = tempfile::tempdir().unwrap();
            let summary = runner(dir.path(), Arc::new(FailingFactory))
                .run(vec![group()])
                .await;
            assert_eq!(summary.failed_count(), 3);
            assert!(summary.results.iter().all(|r| r.outcome.screenshot_path.is_none()));
        }

        #[tokio::test]
        async fn test_panic_fails_one_scenario_and_group_continues() {
            for parallel in [1, 2] {
                let dir = tempfile::tempdir().unwrap();
                let factory = SimFactory::new();
                let summary = runner(dir.path(), Arc::new(factory.clone()))
                    .with_parallel(parallel)
                    .run(vec![panicking_group()])
                    .await;
                assert_eq!(summary.total(), 2);
                assert_eq!(summary.results[0].scenario, "panics");
                assert_eq!(summary.results[0].outcome.status, ScenarioStatus::Failed);
                let detail = summary.results[0].outcome.detail.as_deref().unwrap();
                assert!(detail.contains("lost the dashboard"), "{detail}");
                assert_eq!(summary.results[1].scenario, "on_home");
                assert_eq!(summary.results[1].outcome.status, ScenarioStatus::Passed);
                assert_eq!(factory.launch_count(), 1);
                assert_eq!(factory.quit_count(), 1);
                assert!(summary.report_path.as_ref().unwrap().exists());
            }
        }

        #[tokio::test]
        async fn test_context_uses_fixture_pages() {
            let dir = tempfile::tempdir().unwrap();
            let scenario = Scenario::new("shared_pages", |ctx| Box::pin(shared_pages(ctx)));
            let group = ScenarioGroup::new("smoke").with_scenario(scenario);
            let summary = runner(dir.path(), Arc::new(SimFactory::new()))
                .run(vec![group])
                .await;
            assert!(summary.all_passed(), "{:?}", summary.failures());
        }

        #[derive(Debug, Default)]
        struct Seen(std::sync::Mutex<Vec<String>>);

        impl RunObserver for Seen {
            fn on_result(&self, result: &ScenarioResult) {
                self.0.lock().unwrap().push(result.scenario.clone());
            }
        }

        #[tokio::test]
        async fn test_observer_sees_every_result() {
            let dir = tempfile::tempdir().unwrap();
            let seen = Arc::new(Seen::default());
            let summary = runner(dir.path(), Arc::new(SimFactory::new()))
                .with_observer(Arc::clone(&seen) as Arc<dyn RunObserver>)
                .run(vec![group()])
                .await;
            let names = seen.0.lock().unwrap().clone();
            assert_eq!(names.len(), summary.total());
            assert_eq!(names, vec!["on_home", "always_fails", "later"]);
        }
    }

    mod group_tests {
        use super::*;

        #[test]
        fn test_filtered_keeps_matching_names() {
            let failing = group().filtered("fails");
            assert_eq!(failing.len(), 1);
            assert_eq!(failing.scenarios()[0].name(), "always_fails");
            assert!(group().filtered("nothing").is_empty());
        }

        #[test]
        fn test_summary_counts_empty() {
            let summary = SuiteSummary::default();
            assert!(summary.all_passed());
            assert_eq!(summary.total(), 0);
        }
    }
}
