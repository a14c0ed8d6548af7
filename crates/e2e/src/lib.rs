//! Emergent E2E: page-object UI suite for the Emergent web app
//!
//! Drives the product through a browser the way a user would (sign up,
//! log in, create projects, talk to the AI agent, deploy, run tests) and
//! reports every scenario to an HTML report with failure screenshots.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    EMERGENT E2E Architecture                    │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Scenario   │    │ Page       │    │ Driver     │            │
//! │   │ catalogue  │───►│ objects    │───►│ (chromium  │            │
//! │   │ (suites)   │    │ + waits    │    │  or sim)   │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! │         │                                                       │
//! │         ▼                                                       │
//! │   ┌────────────┐    ┌────────────┐                              │
//! │   │ Suite      │───►│ Reporting  │──► HTML report + screenshots │
//! │   │ runner     │    │ listener   │                              │
//! │   └────────────┘    └────────────┘                              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use emergent_e2e::sim::SimFactory;
//! use emergent_e2e::{suites, ReportingListener, SuiteConfig, SuiteRunner};
//! use std::sync::Arc;
//!
//! # async fn run() -> emergent_e2e::E2eResult<()> {
//! let config = SuiteConfig::load(std::path::Path::new("config/suite.yaml"))?;
//! let listener = ReportingListener::new(&config);
//! let runner = SuiteRunner::new(config, Arc::new(SimFactory::new()), listener);
//! let summary = runner.run(suites::all()).await;
//! assert!(summary.all_passed());
//! # Ok(())
//! # }
//! ```

#[allow(clippy::missing_errors_doc)]
mod assertion;
#[cfg(feature = "browser")]
mod chromium;
mod config;
mod driver;
mod element;
mod fixture;
mod locator;
mod page_object;
mod reporter;
mod result;
mod scenario;
mod session;
mod wait;

pub mod constants;
pub mod data;
pub mod generator;
pub mod pages;
pub mod sim;
#[allow(clippy::missing_errors_doc)]
pub mod suites;

pub use assertion::{ensure_contains, ensure_contains_any, ensure_eq, ensure_not_empty};
#[cfg(feature = "browser")]
pub use chromium::ChromiumDriver;
pub use config::{SuiteConfig, Timeouts};
pub use driver::{
    BrowserFactory, BrowserKind, Driver, DriverConfig, DriverFactory, DriverTimeouts, ElementId,
    ElementState, Screenshot,
};
pub use element::Element;
pub use fixture::{FixtureState, SuiteFixture};
pub use locator::{xpath_containing_text, xpath_with_text, Locator, Strategy};
pub use page_object::{url_path, PageObject, UrlMatcher};
pub use reporter::{
    HtmlReportSink, LogLevel, LogLine, ReportEntry, ReportSink, ReportingListener, ScenarioOutcome,
    ScenarioReport, ScenarioStatus, ScreenCapture, SystemInfo,
};
pub use result::{E2eError, E2eResult};
pub use scenario::{
    RunObserver, Scenario, ScenarioContext, ScenarioFuture, ScenarioGroup, ScenarioResult,
    SuiteRunner, SuiteSummary,
};
pub use session::Session;
pub use wait::{
    Observation, Readiness, WaitOptions, WaitResult, Waiter, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_WAIT_TIMEOUT_MS,
};
