//! The full scenario catalogue against the simulated product
//!
//! Every feature group gets its own session; all of them share one product
//! backend, the way the real suite shares one account.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use emergent_e2e::sim::{SimFactory, SimTiming};
use emergent_e2e::{suites, ReportingListener, SuiteConfig, SuiteRunner, SuiteSummary, Timeouts};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

fn describe_failures(summary: &SuiteSummary) -> String {
    summary
        .failures()
        .iter()
        .map(|r| {
            format!(
                "{}::{}: {}",
                r.feature,
                r.scenario,
                r.outcome.detail.as_deref().unwrap_or("")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn runner(dir: &Path, factory: &SimFactory, wait: Duration) -> SuiteRunner {
    let config = SuiteConfig::default()
        .with_report_path(dir.join("reports"))
        .with_screenshot_path(dir.join("screenshots"));
    let listener = ReportingListener::new(&config);
    SuiteRunner::new(config, Arc::new(factory.clone()), listener)
        .with_timeouts(Timeouts::uniform(wait, Duration::from_millis(5)))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_whole_catalogue_passes() {
    let dir = tempfile::tempdir().unwrap();
    let factory = SimFactory::with_timing(SimTiming::instant());
    let groups = suites::all();
    let expected: usize = groups.iter().map(|g| g.len()).sum();

    let summary = runner(dir.path(), &factory, Duration::from_millis(500))
        .with_parallel(4)
        .run(groups)
        .await;

    assert!(summary.all_passed(), "failed scenarios:\n{}", describe_failures(&summary));
    assert_eq!(summary.total(), expected);
    assert_eq!(summary.skipped_count(), 0);
    assert_eq!(factory.launch_count(), suites::FEATURES.len());
    assert_eq!(factory.quit_count(), suites::FEATURES.len());
    assert!(summary.report_path.unwrap().exists());
}

#[tokio::test]
async fn test_delayed_responses_are_waited_for() {
    let dir = tempfile::tempdir().unwrap();
    let factory = SimFactory::new();
    let groups = suites::select(
        &["ai_agent".to_string(), "deployment".to_string()],
        Some("environment"),
    )
    .unwrap();
    assert_eq!(groups.len(), 1);

    let summary = runner(dir.path(), &factory, Duration::from_secs(3))
        .run(groups)
        .await;
    assert!(summary.all_passed(), "failed scenarios:\n{}", describe_failures(&summary));
    assert!(summary.total() > 0);
}

#[tokio::test]
async fn test_filter_narrows_catalogue() {
    let dir = tempfile::tempdir().unwrap();
    let factory = SimFactory::with_timing(SimTiming::instant());
    let groups = suites::select(&[], Some("logout")).unwrap();

    let summary = runner(dir.path(), &factory, Duration::from_millis(500))
        .run(groups)
        .await;
    assert_eq!(summary.total(), 1);
    assert!(summary.all_passed(), "failed scenarios:\n{}", describe_failures(&summary));
    assert_eq!(factory.launch_count(), 1);
}

#[test]
fn test_unknown_feature_is_rejected() {
    let err = suites::select(&["billing".to_string()], None).unwrap_err();
    assert!(err.to_string().contains("billing"));
}
