//! Wait Mechanisms
//!
//! Explicit polling waits that synchronise the suite with an asynchronous UI.
//! Every element interaction goes through [`Waiter::wait_until_ready`]; there
//! are no fixed sleeps anywhere in the page objects.
//!
//! ## Polling contract
//!
//! - The condition is checked before the first sleep, so a satisfied
//!   condition returns without sleeping and a zero timeout probes exactly once.
//! - Between probes the waiter sleeps `min(poll_interval, remaining)`, so the
//!   total wait never overshoots the timeout by more than one probe.
//! - Stale element references seen during a probe are transient and polling
//!   continues.
//!
//! ## Toyota Way Application
//!
//! - **Jidoka**: Timeouts stop the scenario with the last observed state
//! - **Poka-Yoke**: Readiness kinds are an enum, not ad-hoc predicates

use crate::driver::{Driver, ElementId};
use crate::element::Element;
use crate::locator::Locator;
use crate::result::{E2eError, E2eResult};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for wait operations (30 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 30_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

// =============================================================================
// READINESS
// =============================================================================

/// Condition an element must satisfy before it is handed out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Readiness {
    /// Attached to the DOM
    Present,
    /// Present and displayed
    Visible,
    /// Visible and enabled
    Clickable,
}

impl Readiness {
    /// Lowercase name used in diagnostics
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Visible => "visible",
            Self::Clickable => "clickable",
        }
    }
}

impl fmt::Display for Readiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the last probe of a failed wait did not satisfy its readiness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Observation {
    /// No element matched the locator
    NotFound,
    /// Matched, but not displayed
    Hidden,
    /// Displayed, but disabled
    Disabled,
}

impl Observation {
    /// Lowercase description used in diagnostics
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not found",
            Self::Hidden => "hidden",
            Self::Disabled => "disabled",
        }
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// WAIT RESULT
// =============================================================================

/// Outcome of a satisfied page-level wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitResult {
    /// Time spent waiting
    pub elapsed: Duration,
    /// What was waited for
    pub waited_for: String,
}

impl WaitResult {
    /// Create a successful wait result
    #[must_use]
    pub fn success(elapsed: Duration, waited_for: impl Into<String>) -> Self {
        Self {
            elapsed,
            waited_for: waited_for.into(),
        }
    }
}

// =============================================================================
// WAITER
// =============================================================================

/// Polls a driver until a condition holds or the timeout expires
#[derive(Debug, Clone)]
pub struct Waiter {
    driver: Arc<dyn Driver>,
    options: WaitOptions,
}

impl Waiter {
    /// Create a waiter with default options
    #[must_use]
    pub fn new(driver: Arc<dyn Driver>) -> Self {
        Self::with_options(driver, WaitOptions::default())
    }

    /// Create a waiter with custom options
    #[must_use]
    pub fn with_options(driver: Arc<dyn Driver>, options: WaitOptions) -> Self {
        Self { driver, options }
    }

    /// Options in effect
    #[must_use]
    pub const fn options(&self) -> &WaitOptions {
        &self.options
    }

    /// Wait until the first element matching `locator` satisfies `readiness`
    pub async fn wait_until_ready(
        &self,
        locator: &Locator,
        readiness: Readiness,
        timeout: Duration,
    ) -> E2eResult<Element> {
        let start = Instant::now();
        loop {
            let last_observed = match self.probe(locator, readiness).await {
                Ok(Ok(id)) => {
                    tracing::trace!(
                        %locator,
                        %readiness,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "element ready"
                    );
                    return Ok(Element::new(Arc::clone(&self.driver), id, locator.clone()));
                }
                Ok(Err(observation)) => observation,
                Err(e) if e.is_transient() => Observation::NotFound,
                Err(e) => return Err(e),
            };

            if !self.sleep_within(start, timeout).await {
                tracing::debug!(%locator, %readiness, %last_observed, "wait timed out");
                return Err(E2eError::ElementNotReady {
                    locator: locator.clone(),
                    readiness,
                    timeout_ms: timeout.as_millis() as u64,
                    last_observed,
                });
            }
        }
    }

    /// Wait until no element matching `locator` is displayed
    pub async fn wait_until_gone(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> E2eResult<WaitResult> {
        let driver = Arc::clone(&self.driver);
        self.wait_for(format!("{locator} to disappear"), timeout, || {
            let driver = Arc::clone(&driver);
            async move {
                for id in driver.find_elements(locator).await? {
                    match driver.element_state(&id).await {
                        Ok(state) if state.displayed => return Ok(false),
                        Ok(_) => {}
                        Err(e) if e.is_transient() => {}
                        Err(e) => return Err(e),
                    }
                }
                Ok(true)
            }
        })
        .await
    }

    /// Wait until `document.readyState` is `complete`
    pub async fn wait_for_document_ready(&self, timeout: Duration) -> E2eResult<WaitResult> {
        let driver = Arc::clone(&self.driver);
        self.wait_for("document ready state", timeout, || {
            let driver = Arc::clone(&driver);
            async move {
                let state = driver
                    .execute_script("return document.readyState", None)
                    .await?;
                Ok(state.as_str() == Some("complete"))
            }
        })
        .await
    }

    /// Poll an async predicate until it returns `true`
    pub async fn wait_for<F, Fut>(
        &self,
        waited_for: impl Into<String>,
        timeout: Duration,
        mut predicate: F,
    ) -> E2eResult<WaitResult>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = E2eResult<bool>>,
    {
        let waited_for = waited_for.into();
        let start = Instant::now();
        loop {
            match predicate().await {
                Ok(true) => return Ok(WaitResult::success(start.elapsed(), waited_for)),
                Ok(false) => {}
                Err(e) if e.is_transient() => {}
                Err(e) => return Err(e),
            }
            if !self.sleep_within(start, timeout).await {
                return Err(E2eError::WaitTimeout {
                    waited_for,
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
        }
    }

    async fn probe(
        &self,
        locator: &Locator,
        readiness: Readiness,
    ) -> E2eResult<Result<ElementId, Observation>> {
        let Some(id) = self.driver.find_elements(locator).await?.into_iter().next() else {
            return Ok(Err(Observation::NotFound));
        };
        if readiness == Readiness::Present {
            return Ok(Ok(id));
        }
        let state = self.driver.element_state(&id).await?;
        if !state.displayed {
            return Ok(Err(Observation::Hidden));
        }
        if readiness == Readiness::Clickable && !state.enabled {
            return Ok(Err(Observation::Disabled));
        }
        Ok(Ok(id))
    }

    /// Sleep until the next probe; `false` once the budget is spent
    async fn sleep_within(&self, start: Instant, timeout: Duration) -> bool {
        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return false;
        }
        let remaining = timeout - elapsed;
        tokio::time::sleep(self.options.poll_interval().min(remaining)).await;
        true
    }
}
