//! Browser session handle
//!
//! A [`Session`] is one live browser plus the timeouts it was configured
//! with. It is cheap to clone: page objects and scenarios hold clones of the
//! same `Arc`, while the lifecycle (launch and quit) belongs to
//! [`crate::fixture::SuiteFixture`].

use crate::config::Timeouts;
use crate::driver::Driver;
use crate::element::Element;
use crate::locator::Locator;
use crate::reporter::ScreenCapture;
use crate::result::{E2eError, E2eResult};
use crate::wait::{Readiness, WaitOptions, WaitResult, Waiter};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Shared handle to one browser session
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    id: Uuid,
    driver: Arc<dyn Driver>,
    timeouts: Timeouts,
    base_url: String,
    waiter: Waiter,
}

impl Session {
    /// Wrap a launched driver
    #[must_use]
    pub fn new(driver: Arc<dyn Driver>, timeouts: Timeouts, base_url: impl Into<String>) -> Self {
        let options = WaitOptions::new()
            .with_timeout(timeouts.default_wait.as_millis() as u64)
            .with_poll_interval(timeouts.poll_interval.as_millis() as u64);
        let waiter = Waiter::with_options(Arc::clone(&driver), options);
        let base_url: String = base_url.into();
        Self {
            inner: Arc::new(SessionInner {
                id: Uuid::new_v4(),
                driver,
                timeouts,
                base_url: base_url.trim_end_matches('/').to_string(),
                waiter,
            }),
        }
    }

    /// Unique session id
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Underlying driver
    #[must_use]
    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.inner.driver
    }

    /// Configured timeouts
    #[must_use]
    pub fn timeouts(&self) -> &Timeouts {
        &self.inner.timeouts
    }

    /// Product root URL without trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Absolute URL of a product route
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Waiter bound to this session's driver
    #[must_use]
    pub fn waiter(&self) -> &Waiter {
        &self.inner.waiter
    }

    /// Wait for `readiness` using the default timeout
    pub async fn wait_until_ready(
        &self,
        locator: &Locator,
        readiness: Readiness,
    ) -> E2eResult<Element> {
        self.wait_until_ready_within(locator, readiness, self.inner.timeouts.default_wait)
            .await
    }

    /// Wait for `readiness` with an explicit timeout
    pub async fn wait_until_ready_within(
        &self,
        locator: &Locator,
        readiness: Readiness,
        timeout: Duration,
    ) -> E2eResult<Element> {
        self.inner
            .waiter
            .wait_until_ready(locator, readiness, timeout)
            .await
    }

    /// Wait until nothing matching `locator` is displayed
    pub async fn wait_until_gone(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> E2eResult<WaitResult> {
        self.inner.waiter.wait_until_gone(locator, timeout).await
    }

    /// Every element currently matching `locator`, without waiting
    pub async fn find_all(&self, locator: &Locator) -> E2eResult<Vec<Element>> {
        let ids = self.inner.driver.find_elements(locator).await?;
        Ok(ids
            .into_iter()
            .map(|id| Element::new(Arc::clone(&self.inner.driver), id, locator.clone()))
            .collect())
    }

    /// Whether anything matches `locator` right now
    pub async fn is_element_present(&self, locator: &Locator) -> bool {
        match self.inner.driver.find_elements(locator).await {
            Ok(ids) => !ids.is_empty(),
            Err(e) => {
                tracing::debug!(%locator, error = %e, "presence check failed");
                false
            }
        }
    }

    /// Open `url` and wait for the document to finish loading
    pub async fn navigate(&self, url: &str) -> E2eResult<()> {
        tracing::debug!(session = %self.inner.id, url, "navigate");
        self.inner.driver.navigate(url).await?;
        self.inner
            .waiter
            .wait_for_document_ready(self.inner.timeouts.page_load)
            .await
            .map(|_| ())
    }

    /// Open the product root
    pub async fn navigate_to_base_url(&self) -> E2eResult<()> {
        let url = format!("{}/", self.inner.base_url);
        self.navigate(&url).await
    }

    /// Current URL
    pub async fn current_url(&self) -> E2eResult<String> {
        self.inner.driver.current_url().await
    }

    /// Document title
    pub async fn title(&self) -> E2eResult<String> {
        self.inner.driver.title().await
    }

    /// Reload the page
    pub async fn refresh(&self) -> E2eResult<()> {
        self.inner.driver.refresh().await
    }

    /// Scroll to the top of the page
    pub async fn scroll_to_top(&self) -> E2eResult<()> {
        self.inner
            .driver
            .execute_script("window.scrollTo(0, 0);", None)
            .await
            .map(|_| ())
    }

    /// Scroll to the bottom of the page
    pub async fn scroll_to_bottom(&self) -> E2eResult<()> {
        self.inner
            .driver
            .execute_script("window.scrollTo(0, document.body.scrollHeight);", None)
            .await
            .map(|_| ())
    }

    /// Save a PNG of the current view as `<dir>/<name>_<yyyyMMdd_HHmmss>.png`
    pub async fn capture_screenshot(&self, name: &str, dir: &Path) -> E2eResult<PathBuf> {
        let shot = self.inner.driver.screenshot().await?;
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("{}_{stamp}.png", sanitize_file_stem(name)));
        shot.save(&path)?;
        tracing::info!(path = %path.display(), "Screenshot captured");
        Ok(path)
    }

    /// Quit the browser
    pub(crate) async fn quit(&self) -> E2eResult<()> {
        match self.inner.driver.quit().await {
            Ok(()) | Err(E2eError::SessionClosed) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl ScreenCapture for Session {
    async fn capture(&self, name: &str, dir: &Path) -> E2eResult<PathBuf> {
        self.capture_screenshot(name, dir).await
    }
}

fn sanitize_file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "screenshot".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_stem() {
        assert_eq!(sanitize_file_stem("login: valid/creds"), "login__valid_creds");
        assert_eq!(sanitize_file_stem(""), "screenshot");
        assert_eq!(sanitize_file_stem("deploy-Staging_1"), "deploy-Staging_1");
    }
}
