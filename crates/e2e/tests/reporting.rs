//! Reporting listener end to end: runner outcomes, failure screenshots and
//! the single HTML report written per run

#![allow(clippy::expect_used, clippy::unwrap_used)]

use emergent_e2e::sim::{SimFactory, SimTiming};
use emergent_e2e::{
    ensure, E2eResult, ReportingListener, Scenario, ScenarioContext, ScenarioGroup,
    ScenarioStatus, SuiteConfig, SuiteRunner, Timeouts,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

fn config(dir: &Path) -> SuiteConfig {
    SuiteConfig::default()
        .with_report_path(dir.join("reports"))
        .with_screenshot_path(dir.join("screenshots"))
}

fn runner(config: SuiteConfig, listener: ReportingListener) -> SuiteRunner {
    SuiteRunner::new(
        config,
        Arc::new(SimFactory::with_timing(SimTiming::instant())),
        listener,
    )
    .with_timeouts(Timeouts::uniform(Duration::from_millis(250), Duration::from_millis(5)))
}

async fn logs_in(ctx: &ScenarioContext) -> E2eResult<()> {
    let dashboard = ctx.login_with_default_credentials().await?;
    ctx.report().info("Dashboard reached");
    ensure!(dashboard.is_user_logged_in().await, "user is not logged in");
    Ok(())
}

async fn expects_missing_project(ctx: &ScenarioContext) -> E2eResult<()> {
    let dashboard = ctx.login_with_default_credentials().await?;
    ensure!(
        dashboard.is_project_in_list("No Such Project").await,
        "project 'No Such Project' is not listed"
    );
    Ok(())
}

fn group() -> ScenarioGroup {
    ScenarioGroup::new("reporting")
        .with_scenario(
            Scenario::new("logs_in", |ctx| Box::pin(logs_in(ctx)))
                .with_description("Log in <with> the seeded account"),
        )
        .with_scenario(Scenario::new("expects_missing_project", |ctx| {
            Box::pin(expects_missing_project(ctx))
        }))
        .with_scenario(Scenario::new("not_yet", |ctx| Box::pin(logs_in(ctx))).skip("pending"))
}

#[tokio::test]
async fn test_report_lists_every_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let listener = ReportingListener::new(&config);
    let summary = runner(config, listener.clone()).run(vec![group()]).await;

    let path = summary.report_path.clone().unwrap();
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("E2eReport_"));
    assert!(Path::new(&name).extension().is_some_and(|ext| ext == "html"));

    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.contains("Results: 1 passed, 1 failed, 1 skipped (3 total)"));
    assert!(html.contains("Log in &lt;with&gt; the seeded account"));
    assert!(html.contains("Dashboard reached"));
    assert!(html.contains("project &#39;No Such Project&#39; is not listed"));
    assert!(html.contains("data:image/png;base64,"));
    assert!(html.contains("https://emergent.sh"));

    let entries = listener.entries();
    assert_eq!(entries.len(), 3);
    let statuses: Vec<_> = entries
        .iter()
        .map(|e| e.outcome.as_ref().unwrap().status)
        .collect();
    assert_eq!(
        statuses,
        vec![
            ScenarioStatus::Passed,
            ScenarioStatus::Failed,
            ScenarioStatus::Skipped
        ]
    );
}

#[tokio::test]
async fn test_failure_screenshot_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let listener = ReportingListener::new(&config);
    let summary = runner(config, listener).run(vec![group()]).await;

    let failure = &summary.failures()[0];
    let shot = failure.outcome.screenshot_path.as_ref().unwrap();
    assert!(shot.starts_with(dir.path().join("screenshots")));
    let file = shot.file_name().unwrap().to_string_lossy().to_string();
    assert!(file.starts_with("expects_missing_project_"));
    assert!(std::fs::read(shot).unwrap().starts_with(&[0x89, b'P', b'N', b'G']));
}

#[tokio::test]
async fn test_screenshots_can_be_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path());
    config.take_screenshot_on_failure = false;
    let listener = ReportingListener::new(&config);
    let summary = runner(config, listener).run(vec![group()]).await;

    assert_eq!(summary.failed_count(), 1);
    assert!(summary.failures()[0].outcome.screenshot_path.is_none());
    assert!(!dir.path().join("screenshots").exists());
}

#[tokio::test]
async fn test_flush_happens_once_per_listener() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let listener = ReportingListener::new(&config);
    let runner = runner(config, listener.clone());

    let first = runner.run(vec![group().filtered("logs_in")]).await;
    let again = listener.flush().unwrap();
    assert_eq!(first.report_path.unwrap(), again);

    let reports = std::fs::read_dir(dir.path().join("reports")).unwrap().count();
    assert_eq!(reports, 1);
}
