//! Element handles returned by successful waits.
//!
//! A handle is valid only while its screen is current; after a navigation the
//! driver reports it as stale.

use crate::driver::{Driver, ElementId, ElementState};
use crate::locator::Locator;
use crate::result::E2eResult;
use std::sync::Arc;

/// A live reference to one DOM element
#[derive(Debug, Clone)]
pub struct Element {
    driver: Arc<dyn Driver>,
    id: ElementId,
    locator: Locator,
}

impl Element {
    /// Wrap a driver-scoped id
    #[must_use]
    pub fn new(driver: Arc<dyn Driver>, id: ElementId, locator: Locator) -> Self {
        Self {
            driver,
            id,
            locator,
        }
    }

    /// Driver-scoped id
    #[must_use]
    pub const fn id(&self) -> &ElementId {
        &self.id
    }

    /// Locator this element was resolved from
    #[must_use]
    pub const fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Click the element
    pub async fn click(&self) -> E2eResult<()> {
        self.driver.click(&self.id).await
    }

    /// Click through JavaScript, bypassing overlays
    pub async fn js_click(&self) -> E2eResult<()> {
        self.driver
            .execute_script("arguments[0].click();", Some(&self.id))
            .await
            .map(|_| ())
    }

    /// Replace the element's value with `text`
    pub async fn set_text(&self, text: &str) -> E2eResult<()> {
        self.driver.clear(&self.id).await?;
        self.driver.send_keys(&self.id, text).await
    }

    /// Visible text
    pub async fn text(&self) -> E2eResult<String> {
        self.driver.text(&self.id).await
    }

    /// Attribute or property value
    pub async fn attribute(&self, name: &str) -> E2eResult<Option<String>> {
        self.driver.attribute(&self.id, name).await
    }

    /// Current displayed/enabled state
    pub async fn state(&self) -> E2eResult<ElementState> {
        self.driver.element_state(&self.id).await
    }

    /// Whether the element is displayed right now
    pub async fn is_displayed(&self) -> E2eResult<bool> {
        Ok(self.state().await?.displayed)
    }

    /// Scroll the element into the viewport
    pub async fn scroll_into_view(&self) -> E2eResult<()> {
        self.driver
            .execute_script("arguments[0].scrollIntoView(true);", Some(&self.id))
            .await
            .map(|_| ())
    }
}
