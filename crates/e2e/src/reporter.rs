//! Reporter - Scenario Reporting Listener
//!
//! Records the lifecycle of every scenario (start, pass, fail, skip), takes
//! a screenshot when a scenario fails and writes one HTML report per suite
//! run.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  on_scenario_start   ┌──────────────────┐
//! │ SuiteRunner  │ ───────────────────► │ ReportingListener│
//! │              │ ◄─────────────────── │  (Arc, shared)   │
//! └──────┬───────┘    ScenarioReport    └────────┬─────────┘
//!        │ info / warn / error                   │ Mutex
//!        ▼                                       ▼
//! ┌──────────────┐  on_success/skip/failure ┌──────────────┐
//! │ScenarioReport│ ───────────────────────► │ dyn ReportSink│──► E2eReport_*.html
//! └──────────────┘                          └──────────────┘
//! ```
//!
//! Per-scenario state travels in an explicit [`ScenarioReport`] value; there
//! is no thread-local "current test". A failure screenshot is requested
//! through the [`ScreenCapture`] capability, which [`crate::session::Session`]
//! implements.
//!
//! ## Toyota Way Application
//!
//! - **Andon**: Failures carry the error text and a screenshot of the screen
//! - **Genchi Genbutsu**: The report shows what the browser actually showed
//! - **Jidoka**: Reporting problems are logged, they never fail a scenario

use crate::config::SuiteConfig;
use crate::result::{E2eError, E2eResult};
use async_trait::async_trait;
use base64::Engine;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::{Duration, Instant};
use uuid::Uuid;

// =============================================================================
// SCREEN CAPTURE CAPABILITY
// =============================================================================

/// Something that can save a picture of the current screen
#[async_trait]
pub trait ScreenCapture: Send + Sync {
    /// Save a screenshot named after `name` under `dir` and return its path
    async fn capture(&self, name: &str, dir: &Path) -> E2eResult<PathBuf>;
}

// =============================================================================
// OUTCOMES
// =============================================================================

/// Final status of a scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScenarioStatus {
    /// Every step and assertion held
    Passed,
    /// A step or assertion failed
    Failed,
    /// Not executed
    Skipped,
}

impl ScenarioStatus {
    /// Check if status is passing
    #[must_use]
    pub const fn is_passed(self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Check if status is failing
    #[must_use]
    pub const fn is_failed(self) -> bool {
        matches!(self, Self::Failed)
    }

    const fn css_class(self) -> &'static str {
        match self {
            Self::Passed => "pass",
            Self::Failed => "fail",
            Self::Skipped => "skip",
        }
    }
}

impl fmt::Display for ScenarioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
            Self::Skipped => "SKIPPED",
        };
        f.write_str(label)
    }
}

/// Result of one scenario, created once and then only read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioOutcome {
    /// Status
    pub status: ScenarioStatus,
    /// Failure message or skip reason
    pub detail: Option<String>,
    /// Failure screenshot, if one was taken
    pub screenshot_path: Option<PathBuf>,
    /// Wall-clock duration
    pub duration: Duration,
}

impl ScenarioOutcome {
    /// Create a passing outcome
    #[must_use]
    pub const fn passed(duration: Duration) -> Self {
        Self {
            status: ScenarioStatus::Passed,
            detail: None,
            screenshot_path: None,
            duration,
        }
    }

    /// Create a failing outcome
    #[must_use]
    pub fn failed(duration: Duration, detail: impl Into<String>) -> Self {
        Self {
            status: ScenarioStatus::Failed,
            detail: Some(detail.into()),
            screenshot_path: None,
            duration,
        }
    }

    /// Create a skipped outcome
    #[must_use]
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            status: ScenarioStatus::Skipped,
            detail: Some(reason.into()),
            screenshot_path: None,
            duration: Duration::ZERO,
        }
    }

    /// Attach a screenshot path
    #[must_use]
    pub fn with_screenshot(mut self, path: PathBuf) -> Self {
        self.screenshot_path = Some(path);
        self
    }
}

// =============================================================================
// REPORT ENTRIES
// =============================================================================

/// Severity of a per-scenario log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LogLevel {
    /// Step taken
    Info,
    /// Recoverable oddity
    Warn,
    /// Failure detail
    Error,
}

impl LogLevel {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// One line logged against a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogLine {
    /// Severity
    pub level: LogLevel,
    /// Text as logged
    pub message: String,
    /// Local wall-clock time, `HH:MM:SS`
    pub at: String,
}

/// Everything the report knows about one scenario
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    /// Entry id, unique per run
    pub id: Uuid,
    /// Scenario name
    pub name: String,
    /// Scenario description
    pub description: String,
    /// Feature group the scenario belongs to
    pub feature: String,
    /// Lines logged while the scenario ran
    pub logs: Vec<LogLine>,
    /// Set once the scenario finishes
    pub outcome: Option<ScenarioOutcome>,
}

/// Environment shown in the report header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemInfo {
    /// Operating system and architecture
    pub os: String,
    /// Configured browser
    pub browser: String,
    /// Product under test
    pub base_url: String,
    /// Account running the suite
    pub user: String,
}

impl SystemInfo {
    /// Collect from the running process and the suite config
    #[must_use]
    pub fn collect(config: &SuiteConfig) -> Self {
        let user = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "unknown".to_string());
        Self {
            os: format!("{} ({})", std::env::consts::OS, std::env::consts::ARCH),
            browser: config.browser.to_string(),
            base_url: config.base_url().to_string(),
            user,
        }
    }
}

// =============================================================================
// REPORT SINK
// =============================================================================

/// Destination of report data
pub trait ReportSink: Send + fmt::Debug {
    /// Register a new scenario
    fn create_entry(&mut self, entry: ReportEntry);

    /// Append a log line to a scenario
    fn log(&mut self, id: Uuid, line: LogLine);

    /// Record a scenario's outcome
    fn attach(&mut self, id: Uuid, outcome: ScenarioOutcome);

    /// Entries recorded so far, in start order
    fn entries(&self) -> &[ReportEntry];

    /// Write the report under `dir` and return the file written
    fn flush(&mut self, system: &SystemInfo, dir: &Path) -> E2eResult<PathBuf>;
}

/// Writes a single self-contained HTML file
#[derive(Debug, Default)]
pub struct HtmlReportSink {
    title: String,
    entries: Vec<ReportEntry>,
}

impl HtmlReportSink {
    /// Create an empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::with_title("Emergent E2E Report")
    }

    /// Create an empty sink with a custom document title
    #[must_use]
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            entries: Vec::new(),
        }
    }

    fn entry_mut(&mut self, id: Uuid) -> Option<&mut ReportEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    fn count(&self, status: ScenarioStatus) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome.as_ref().map(|o| o.status) == Some(status))
            .count()
    }

    /// Render the report document
    #[must_use]
    pub fn render_html(&self, system: &SystemInfo) -> String {
        let mut html = String::new();

        html.push_str(&format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{}</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 20px; }}
        .summary {{ background: #f5f5f5; padding: 20px; border-radius: 8px; margin-bottom: 20px; }}
        .system td {{ padding: 2px 12px 2px 0; }}
        .scenario {{ padding: 10px; margin: 5px 0; border-radius: 4px; }}
        .scenario.pass {{ background: #e8f5e9; border-left: 4px solid #4caf50; }}
        .scenario.fail {{ background: #ffebee; border-left: 4px solid #f44336; }}
        .scenario.skip {{ background: #fff3e0; border-left: 4px solid #ff9800; }}
        .feature {{ font-size: 0.8em; background: #e0e0e0; padding: 2px 6px; border-radius: 4px; }}
        .detail {{ color: #d32f2f; font-family: monospace; white-space: pre-wrap; }}
        .log.warn {{ color: #ef6c00; }}
        .log.error {{ color: #d32f2f; }}
        img {{ max-width: 640px; border: 1px solid #ddd; margin-top: 8px; }}
    </style>
</head>
<body>
"#,
            escape_html(&self.title)
        ));

        html.push_str(&format!(
            r#"<div class="summary">
    <h1>{}</h1>
    <h2>Results: {} passed, {} failed, {} skipped ({} total)</h2>
    <table class="system">
        <tr><td>OS</td><td>{}</td></tr>
        <tr><td>Browser</td><td>{}</td></tr>
        <tr><td>Base URL</td><td>{}</td></tr>
        <tr><td>User</td><td>{}</td></tr>
    </table>
</div>
"#,
            escape_html(&self.title),
            self.count(ScenarioStatus::Passed),
            self.count(ScenarioStatus::Failed),
            self.count(ScenarioStatus::Skipped),
            self.entries.len(),
            escape_html(&system.os),
            escape_html(&system.browser),
            escape_html(&system.base_url),
            escape_html(&system.user),
        ));

        html.push_str("<h2>Scenarios</h2>\n");
        for entry in &self.entries {
            render_entry(&mut html, entry);
        }

        html.push_str("</body>\n</html>\n");
        html
    }
}

fn render_entry(html: &mut String, entry: &ReportEntry) {
    let (class, status, duration_ms) = entry.outcome.as_ref().map_or(
        ("skip", "NOT FINISHED".to_string(), 0.0),
        |o| {
            (
                o.status.css_class(),
                o.status.to_string(),
                o.duration.as_secs_f64() * 1000.0,
            )
        },
    );

    html.push_str(&format!(
        r#"<div class="scenario {class}">
    <strong>{}</strong> <span class="feature">{}</span> - {status} ({duration_ms:.0}ms)
    <p>{}</p>
"#,
        escape_html(&entry.name),
        escape_html(&entry.feature),
        escape_html(&entry.description),
    ));

    if !entry.logs.is_empty() {
        html.push_str("    <ul>\n");
        for line in &entry.logs {
            html.push_str(&format!(
                "        <li class=\"log {}\">[{}] {}</li>\n",
                line.level.as_str(),
                escape_html(&line.at),
                escape_html(&line.message)
            ));
        }
        html.push_str("    </ul>\n");
    }

    if let Some(outcome) = &entry.outcome {
        if let Some(detail) = &outcome.detail {
            html.push_str(&format!(
                "    <div class=\"detail\">{}</div>\n",
                escape_html(detail)
            ));
        }
        if let Some(path) = &outcome.screenshot_path {
            html.push_str(&screenshot_html(path));
        }
    }

    html.push_str("</div>\n");
}

/// Inline the PNG so the report stays a single file; fall back to a link
fn screenshot_html(path: &Path) -> String {
    match std::fs::read(path) {
        Ok(bytes) => format!(
            "    <img alt=\"failure screenshot\" src=\"data:image/png;base64,{}\">\n",
            base64::engine::general_purpose::STANDARD.encode(bytes)
        ),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot inline screenshot");
            format!(
                "    <p>Screenshot: {}</p>\n",
                escape_html(&path.display().to_string())
            )
        }
    }
}

impl ReportSink for HtmlReportSink {
    fn create_entry(&mut self, entry: ReportEntry) {
        self.entries.push(entry);
    }

    fn log(&mut self, id: Uuid, line: LogLine) {
        if let Some(entry) = self.entry_mut(id) {
            entry.logs.push(line);
        }
    }

    fn attach(&mut self, id: Uuid, outcome: ScenarioOutcome) {
        if let Some(entry) = self.entry_mut(id) {
            entry.outcome = Some(outcome);
        }
    }

    fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    fn flush(&mut self, system: &SystemInfo, dir: &Path) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("E2eReport_{stamp}.html"));
        std::fs::write(&path, self.render_html(system))?;
        Ok(path)
    }
}

/// Escape HTML special characters
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// =============================================================================
// LISTENER
// =============================================================================

/// Scenario lifecycle listener shared by every scenario of a run
#[derive(Debug, Clone)]
pub struct ReportingListener {
    inner: Arc<ListenerInner>,
}

#[derive(Debug)]
struct ListenerInner {
    sink: Mutex<Box<dyn ReportSink>>,
    system: SystemInfo,
    report_dir: PathBuf,
    screenshot_dir: PathBuf,
    screenshot_on_failure: bool,
    flushed: Mutex<Option<PathBuf>>,
}

static GLOBAL: OnceLock<ReportingListener> = OnceLock::new();

fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ReportingListener {
    /// Listener writing an HTML report
    #[must_use]
    pub fn new(config: &SuiteConfig) -> Self {
        Self::with_sink(config, Box::new(HtmlReportSink::new()))
    }

    /// Listener writing to a custom sink
    #[must_use]
    pub fn with_sink(config: &SuiteConfig, sink: Box<dyn ReportSink>) -> Self {
        Self {
            inner: Arc::new(ListenerInner {
                sink: Mutex::new(sink),
                system: SystemInfo::collect(config),
                report_dir: config.report_path.clone(),
                screenshot_dir: config.screenshot_path.clone(),
                screenshot_on_failure: config.take_screenshot_on_failure,
                flushed: Mutex::new(None),
            }),
        }
    }

    /// Process-wide listener, built from `config` on first access
    ///
    /// Later calls return the same listener and ignore their argument.
    pub fn global(config: &SuiteConfig) -> &'static Self {
        GLOBAL.get_or_init(|| {
            tracing::debug!("initialising global reporting listener");
            Self::new(config)
        })
    }

    /// Environment shown in the report header
    #[must_use]
    pub fn system_info(&self) -> &SystemInfo {
        &self.inner.system
    }

    /// Register a scenario and return its report context
    pub fn on_scenario_start(
        &self,
        name: &str,
        description: &str,
        feature: &str,
    ) -> ScenarioReport {
        let id = Uuid::new_v4();
        tracing::info!(scenario = name, feature, "Scenario started");
        lock(&self.inner.sink).create_entry(ReportEntry {
            id,
            name: name.to_string(),
            description: description.to_string(),
            feature: feature.to_string(),
            logs: Vec::new(),
            outcome: None,
        });
        ScenarioReport {
            id,
            name: name.to_string(),
            started: Instant::now(),
            listener: self.clone(),
        }
    }

    /// Record a pass
    pub fn on_success(&self, report: &ScenarioReport) -> ScenarioOutcome {
        report.info("Scenario passed");
        let outcome = ScenarioOutcome::passed(report.elapsed());
        self.attach(report, outcome.clone());
        outcome
    }

    /// Record a skip
    pub fn on_skip(&self, report: &ScenarioReport, reason: &str) -> ScenarioOutcome {
        report.warn(&format!("Scenario skipped: {reason}"));
        let outcome = ScenarioOutcome::skipped(reason);
        self.attach(report, outcome.clone());
        outcome
    }

    /// Record a failure, capturing the screen when configured to
    ///
    /// A capture that fails is logged and the outcome is recorded without a
    /// screenshot.
    pub async fn on_failure(
        &self,
        report: &ScenarioReport,
        error: &E2eError,
        capture: Option<&dyn ScreenCapture>,
    ) -> ScenarioOutcome {
        report.error(&format!("Scenario failed: {error}"));
        let mut outcome = ScenarioOutcome::failed(report.elapsed(), error.to_string());

        if let (true, Some(capture)) = (self.inner.screenshot_on_failure, capture) {
            match capture.capture(&report.name, &self.inner.screenshot_dir).await {
                Ok(path) => {
                    report.info(&format!("Screenshot saved to {}", path.display()));
                    outcome = outcome.with_screenshot(path);
                }
                Err(e) => {
                    tracing::warn!(
                        scenario = %report.name,
                        error = %e,
                        "failure screenshot not captured"
                    );
                }
            }
        }

        self.attach(report, outcome.clone());
        outcome
    }

    /// Snapshot of every entry recorded so far
    #[must_use]
    pub fn entries(&self) -> Vec<ReportEntry> {
        lock(&self.inner.sink).entries().to_vec()
    }

    /// Write the report once; later calls return the first path
    pub fn flush(&self) -> E2eResult<PathBuf> {
        let mut flushed = lock(&self.inner.flushed);
        if let Some(path) = flushed.as_ref() {
            return Ok(path.clone());
        }
        let path = lock(&self.inner.sink).flush(&self.inner.system, &self.inner.report_dir)?;
        tracing::info!(path = %path.display(), "Report written");
        *flushed = Some(path.clone());
        Ok(path)
    }

    fn attach(&self, report: &ScenarioReport, outcome: ScenarioOutcome) {
        tracing::info!(
            scenario = %report.name,
            status = %outcome.status,
            duration_ms = outcome.duration.as_millis() as u64,
            "Scenario finished"
        );
        lock(&self.inner.sink).attach(report.id, outcome);
    }

    fn log(&self, id: Uuid, level: LogLevel, message: &str) {
        let line = LogLine {
            level,
            message: message.to_string(),
            at: chrono::Local::now().format("%H:%M:%S").to_string(),
        };
        lock(&self.inner.sink).log(id, line);
    }
}

// =============================================================================
// SCENARIO REPORT
// =============================================================================

/// Report context of one running scenario
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    id: Uuid,
    name: String,
    started: Instant,
    listener: ReportingListener,
}

impl ScenarioReport {
    /// Entry id
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Scenario name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Time since the scenario started
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Log a step at `info`
    pub fn info(&self, message: &str) {
        tracing::info!(scenario = %self.name, "{message}");
        self.listener.log(self.id, LogLevel::Info, message);
    }

    /// Log at `warn`
    pub fn warn(&self, message: &str) {
        tracing::warn!(scenario = %self.name, "{message}");
        self.listener.log(self.id, LogLevel::Warn, message);
    }

    /// Log at `error`
    pub fn error(&self, message: &str) {
        tracing::error!(scenario = %self.name, "{message}");
        self.listener.log(self.id, LogLevel::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: &Path) -> SuiteConfig {
        SuiteConfig::default()
            .with_report_path(dir.join("reports"))
            .with_screenshot_path(dir.join("shots"))
    }

    #[derive(Debug)]
    struct FakeCapture {
        fail: bool,
    }

    #[async_trait]
    impl ScreenCapture for FakeCapture {
        async fn capture(&self, name: &str, dir: &Path) -> E2eResult<PathBuf> {
            if self.fail {
                return Err(E2eError::Screenshot {
                    message: "no window".into(),
                });
            }
            std::fs::create_dir_all(dir)?;
            let path = dir.join(format!("{name}.png"));
            std::fs::write(&path, [0x89, b'P', b'N', b'G'])?;
            Ok(path)
        }
    }

    mod status_tests {
        use super::*;

        #[test]
        fn test_status_predicates() {
            assert!(ScenarioStatus::Passed.is_passed());
            assert!(ScenarioStatus::Failed.is_failed());
            assert!(!ScenarioStatus::Skipped.is_passed());
            assert!(!ScenarioStatus::Skipped.is_failed());
        }

        #[test]
        fn test_outcome_constructors() {
            let failed = ScenarioOutcome::failed(Duration::from_millis(3), "boom");
            assert_eq!(failed.status, ScenarioStatus::Failed);
            assert_eq!(failed.detail.as_deref(), Some("boom"));
            let skipped = ScenarioOutcome::skipped("not on safari");
            assert_eq!(skipped.duration, Duration::ZERO);
        }
    }

    mod listener_tests {
        use super::*;

        #[test]
        fn test_success_records_outcome_and_logs() {
            let dir = tempfile::tempdir().unwrap();
            let listener = ReportingListener::new(&config(dir.path()));
            let report = listener.on_scenario_start("login", "valid login", "Authentication");
            report.info("Logging in");
            let outcome = listener.on_success(&report);
            assert!(outcome.status.is_passed());

            let entries = listener.entries();
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].feature, "Authentication");
            assert_eq!(entries[0].logs[0].message, "Logging in");
            assert_eq!(entries[0].outcome.as_ref().map(|o| o.status), Some(ScenarioStatus::Passed));
        }

        #[tokio::test]
        async fn test_failure_attaches_screenshot() {
            let dir = tempfile::tempdir().unwrap();
            let listener = ReportingListener::new(&config(dir.path()));
            let report = listener.on_scenario_start("deploy", "", "Deployment");
            let err = E2eError::assertion("status mismatch");
            let outcome = listener
                .on_failure(&report, &err, Some(&FakeCapture { fail: false }))
                .await;
            assert!(outcome.status.is_failed());
            let shot = outcome.screenshot_path.unwrap();
            assert!(shot.starts_with(dir.path().join("shots")));
        }

        #[tokio::test]
        async fn test_capture_failure_is_not_fatal() {
            let dir = tempfile::tempdir().unwrap();
            let listener = ReportingListener::new(&config(dir.path()));
            let report = listener.on_scenario_start("deploy", "", "Deployment");
            let outcome = listener
                .on_failure(&report, &E2eError::SessionClosed, Some(&FakeCapture { fail: true }))
                .await;
            assert!(outcome.status.is_failed());
            assert!(outcome.screenshot_path.is_none());
        }

        #[tokio::test]
        async fn test_screenshots_disabled() {
            let dir = tempfile::tempdir().unwrap();
            let mut cfg = config(dir.path());
            cfg.take_screenshot_on_failure = false;
            let listener = ReportingListener::new(&cfg);
            let report = listener.on_scenario_start("x", "", "f");
            let outcome = listener
                .on_failure(&report, &E2eError::SessionClosed, Some(&FakeCapture { fail: false }))
                .await;
            assert!(outcome.screenshot_path.is_none());
        }

        #[test]
        fn test_flush_writes_once() {
            let dir = tempfile::tempdir().unwrap();
            let listener = ReportingListener::new(&config(dir.path()));
            let report = listener.on_scenario_start("a <b>", "desc", "Testing");
            listener.on_skip(&report, "browser not available");

            let first = listener.flush().unwrap();
            let name = first.file_name().unwrap().to_string_lossy().to_string();
            assert!(name.starts_with("E2eReport_"));
            assert!(name.ends_with(".html"));

            let html = std::fs::read_to_string(&first).unwrap();
            assert!(html.contains("a &lt;b&gt;"));
            assert!(html.contains("browser not available"));
            assert!(html.contains("1 skipped"));

            assert_eq!(listener.flush().unwrap(), first);
            let count = std::fs::read_dir(dir.path().join("reports")).unwrap().count();
            assert_eq!(count, 1);
        }
    }

    mod html_tests {
        use super::*;

        #[test]
        fn test_render_inlines_screenshot() {
            let dir = tempfile::tempdir().unwrap();
            let png = dir.path().join("shot.png");
            std::fs::write(&png, b"png-bytes").unwrap();

            let mut sink = HtmlReportSink::new();
            let id = Uuid::new_v4();
            sink.create_entry(ReportEntry {
                id,
                name: "n".into(),
                description: String::new(),
                feature: "f".into(),
                logs: Vec::new(),
                outcome: None,
            });
            sink.attach(
                id,
                ScenarioOutcome::failed(Duration::from_millis(1), "oops").with_screenshot(png),
            );
            let system = SystemInfo {
                os: "linux".into(),
                browser: "chrome".into(),
                base_url: "https://emergent.sh".into(),
                user: "qa".into(),
            };
            let html = sink.render_html(&system);
            assert!(html.contains("data:image/png;base64,"));
            assert!(html.contains("https://emergent.sh"));
            assert!(html.contains("1 failed"));
        }

        #[test]
        fn test_escape_html() {
            let escaped = escape_html("<a href='x'>&</a>");
            assert_eq!(escaped, "&lt;a href=&#39;x&#39;&gt;&amp;&lt;/a&gt;");
        }
    }
}
