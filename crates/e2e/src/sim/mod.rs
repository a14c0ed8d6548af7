//! In-memory product simulator
//!
//! [`SimDriver`] implements [`Driver`] against a scripted model of the
//! product, so page objects, waits, the fixture lifecycle and the scenario
//! catalogue can run without a browser or network access. The model keeps
//! the behaviour the suite relies on:
//!
//! - element ids go stale after every page load
//! - hidden and disabled elements reject clicks
//! - AI responses, deployments and test runs complete after a delay
//!
//! ```text
//! SimFactory ──create()──► SimDriver (one tab)
//!     │                        │
//!     └── Arc<Mutex<Product>> ◄┘  accounts + projects, shared by all tabs
//! ```

mod app;
mod dom;

pub use app::SimTiming;

use crate::driver::{
    Driver, DriverConfig, DriverFactory, DriverTimeouts, ElementId, ElementState, Screenshot,
};
use crate::locator::Locator;
use crate::result::{E2eError, E2eResult};
use app::{Browser, Product};
use async_trait::async_trait;
use dom::{Document, Node};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// 1x1 transparent PNG
const BLANK_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// FACTORY
// =============================================================================

/// Launches simulated browsers that share one product backend
///
/// Clones share the backend and the counters, so a test can keep a clone
/// and inspect it after handing another to a fixture.
#[derive(Clone)]
pub struct SimFactory {
    product: Arc<Mutex<Product>>,
    launched: Arc<AtomicUsize>,
    quits: Arc<AtomicUsize>,
}

impl fmt::Debug for SimFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimFactory")
            .field("launched", &self.launch_count())
            .field("quits", &self.quit_count())
            .finish_non_exhaustive()
    }
}

impl Default for SimFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl SimFactory {
    /// Backend with default timing and the seeded test account
    #[must_use]
    pub fn new() -> Self {
        Self::with_timing(SimTiming::default())
    }

    /// Backend with custom delays for slow operations
    #[must_use]
    pub fn with_timing(timing: SimTiming) -> Self {
        Self {
            product: Arc::new(Mutex::new(Product::new(timing))),
            launched: Arc::new(AtomicUsize::new(0)),
            quits: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Browsers launched so far
    #[must_use]
    pub fn launch_count(&self) -> usize {
        self.launched.load(Ordering::SeqCst)
    }

    /// Browsers quit so far
    #[must_use]
    pub fn quit_count(&self) -> usize {
        self.quits.load(Ordering::SeqCst)
    }

    /// Projects stored across all accounts
    #[must_use]
    pub fn project_count(&self) -> usize {
        lock(&self.product).project_count()
    }

    /// Launch one simulated browser directly
    #[must_use]
    pub fn launch(&self) -> SimDriver {
        self.launched.fetch_add(1, Ordering::SeqCst);
        SimDriver {
            browser: Mutex::new(Tab {
                browser: Browser::new(),
                closed: false,
                window: (1920, 1080),
                timeouts: DriverTimeouts::default(),
            }),
            product: Arc::clone(&self.product),
            quits: Arc::clone(&self.quits),
        }
    }
}

#[async_trait]
impl DriverFactory for SimFactory {
    async fn create(&self, config: &DriverConfig) -> E2eResult<Arc<dyn Driver>> {
        tracing::debug!(browser = %config.browser, "Launching simulated browser");
        let driver = self.launch();
        driver
            .set_window_size(config.window_width, config.window_height)
            .await?;
        Ok(Arc::new(driver))
    }
}

// =============================================================================
// DRIVER
// =============================================================================

#[derive(Debug)]
struct Tab {
    browser: Browser,
    closed: bool,
    window: (u32, u32),
    timeouts: DriverTimeouts,
}

/// One simulated browser tab
pub struct SimDriver {
    browser: Mutex<Tab>,
    product: Arc<Mutex<Product>>,
    quits: Arc<AtomicUsize>,
}

impl fmt::Debug for SimDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tab = lock(&self.browser);
        f.debug_struct("SimDriver")
            .field("url", &tab.browser.current_url())
            .field("closed", &tab.closed)
            .field("window", &tab.window)
            .field("timeouts", &tab.timeouts)
            .finish_non_exhaustive()
    }
}

impl SimDriver {
    /// Lock the tab, failing once the browser has quit
    fn tab(&self) -> E2eResult<MutexGuard<'_, Tab>> {
        let tab = lock(&self.browser);
        if tab.closed {
            return Err(E2eError::SessionClosed);
        }
        Ok(tab)
    }

    fn ensure_open(&self) -> E2eResult<()> {
        self.tab().map(|_| ())
    }

    fn render(&self, tab: &Tab) -> Document {
        tab.browser.render(&lock(&self.product), Instant::now())
    }

    /// Run `f` on the node behind `id` in a fresh render
    fn with_node<T>(&self, id: &ElementId, f: impl FnOnce(&Document, usize) -> T) -> E2eResult<T> {
        let tab = self.tab()?;
        let doc = self.render(&tab);
        let idx = resolve(&tab.browser, &doc, id)?;
        Ok(f(&doc, idx))
    }

    fn input_field(node: &Node, id: &ElementId) -> E2eResult<String> {
        if !matches!(node.tag, "input" | "textarea") {
            return Err(E2eError::interaction(format!(
                "element {id} is a <{}>, not a text field",
                node.tag
            )));
        }
        if !node.displayed || !node.enabled {
            return Err(E2eError::interaction(format!("element {id} is not interactable")));
        }
        node.attribute("name")
            .map(str::to_string)
            .ok_or_else(|| E2eError::interaction(format!("element {id} has no name")))
    }
}

fn element_id(browser: &Browser, node: &Node) -> ElementId {
    ElementId::new(format!("{}:{}", browser.epoch, node.key))
}

fn resolve(browser: &Browser, doc: &Document, id: &ElementId) -> E2eResult<usize> {
    let stale = || E2eError::StaleElement {
        id: id.to_string(),
    };
    let (epoch, key) = id.as_str().split_once(':').ok_or_else(stale)?;
    if epoch.parse::<u64>().ok() != Some(browser.epoch) {
        return Err(stale());
    }
    doc.index_of(key).ok_or_else(stale)
}

#[async_trait]
impl Driver for SimDriver {
    async fn navigate(&self, url: &str) -> E2eResult<()> {
        let mut tab = self.tab()?;
        let product = lock(&self.product);
        tab.browser.open(&product, url)
    }

    async fn current_url(&self) -> E2eResult<String> {
        Ok(self.tab()?.browser.current_url())
    }

    async fn title(&self) -> E2eResult<String> {
        let tab = self.tab()?;
        let product = lock(&self.product);
        Ok(tab.browser.title(&product))
    }

    async fn refresh(&self) -> E2eResult<()> {
        let mut tab = self.tab()?;
        let product = lock(&self.product);
        tab.browser.reload(&product);
        Ok(())
    }

    async fn find_elements(&self, locator: &Locator) -> E2eResult<Vec<ElementId>> {
        let tab = self.tab()?;
        let doc = self.render(&tab);
        Ok(doc
            .find(locator)?
            .into_iter()
            .map(|idx| element_id(&tab.browser, doc.node(idx)))
            .collect())
    }

    async fn element_state(&self, id: &ElementId) -> E2eResult<ElementState> {
        self.with_node(id, |doc, idx| {
            let node = doc.node(idx);
            ElementState {
                displayed: node.displayed,
                enabled: node.enabled,
            }
        })
    }

    async fn click(&self, id: &ElementId) -> E2eResult<()> {
        let mut tab = self.tab()?;
        let mut product = lock(&self.product);
        let now = Instant::now();
        let doc = tab.browser.render(&product, now);
        let idx = resolve(&tab.browser, &doc, id)?;
        let node = doc.node(idx);
        if !node.displayed {
            return Err(E2eError::interaction(format!("element {id} is not displayed")));
        }
        if !node.enabled {
            return Err(E2eError::interaction(format!("element {id} is disabled")));
        }
        if let Some(action) = node.action.clone() {
            tracing::trace!(%id, ?action, "sim click");
            tab.browser.dispatch(&mut product, action, now);
        }
        Ok(())
    }

    async fn clear(&self, id: &ElementId) -> E2eResult<()> {
        let field = self.with_node(id, |doc, idx| Self::input_field(doc.node(idx), id))??;
        self.tab()?.browser.set_input(&field, String::new());
        Ok(())
    }

    async fn send_keys(&self, id: &ElementId, text: &str) -> E2eResult<()> {
        let (field, current) = self.with_node(id, |doc, idx| {
            let node = doc.node(idx);
            Self::input_field(node, id)
                .map(|field| (field, node.attribute("value").unwrap_or_default().to_string()))
        })??;
        self.tab()?.browser.set_input(&field, current + text);
        Ok(())
    }

    async fn text(&self, id: &ElementId) -> E2eResult<String> {
        self.with_node(id, Document::visible_text)
    }

    async fn attribute(&self, id: &ElementId, name: &str) -> E2eResult<Option<String>> {
        self.with_node(id, |doc, idx| doc.node(idx).attribute(name).map(str::to_string))
    }

    async fn execute_script(
        &self,
        script: &str,
        target: Option<&ElementId>,
    ) -> E2eResult<serde_json::Value> {
        let script = script.trim();
        match (script, target) {
            ("return document.readyState", _) => {
                self.ensure_open()?;
                Ok(serde_json::Value::String("complete".to_string()))
            }
            (s, _) if s.starts_with("window.scrollTo(") => {
                self.ensure_open()?;
                Ok(serde_json::Value::Null)
            }
            ("arguments[0].click();", Some(id)) => {
                self.click(id).await?;
                Ok(serde_json::Value::Null)
            }
            ("arguments[0].scrollIntoView(true);", Some(id)) => {
                self.with_node(id, |_, _| ())?;
                Ok(serde_json::Value::Null)
            }
            _ => Err(E2eError::Script {
                message: format!("the simulator cannot evaluate `{script}`"),
            }),
        }
    }

    async fn screenshot(&self) -> E2eResult<Screenshot> {
        let tab = self.tab()?;
        Ok(Screenshot::new(BLANK_PNG.to_vec(), tab.window.0, tab.window.1))
    }

    async fn set_timeouts(&self, timeouts: &DriverTimeouts) -> E2eResult<()> {
        self.tab()?.timeouts = *timeouts;
        Ok(())
    }

    async fn set_window_size(&self, width: u32, height: u32) -> E2eResult<()> {
        if width == 0 || height == 0 {
            return Err(E2eError::interaction(format!(
                "invalid window size {width}x{height}"
            )));
        }
        self.tab()?.window = (width, height);
        Ok(())
    }

    async fn delete_all_cookies(&self) -> E2eResult<()> {
        self.tab()?.browser.clear_cookies();
        Ok(())
    }

    async fn quit(&self) -> E2eResult<()> {
        let mut tab = self.tab()?;
        tab.closed = true;
        self.quits.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("Simulated browser closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants;
    use std::time::Duration;

    const BASE: &str = "https://emergent.sh";

    async fn first(driver: &SimDriver, locator: &Locator) -> ElementId {
        driver.find_elements(locator).await.unwrap().remove(0)
    }

    async fn log_in(driver: &SimDriver) {
        driver.navigate(&format!("{BASE}/login")).await.unwrap();
        let email = first(driver, &Locator::id("email")).await;
        driver.send_keys(&email, constants::TEST_USERNAME).await.unwrap();
        let password = first(driver, &Locator::id("password")).await;
        driver.send_keys(&password, constants::TEST_PASSWORD).await.unwrap();
        let button = first(driver, &Locator::xpath("//button[contains(text(), 'Log in')]")).await;
        driver.click(&button).await.unwrap();
    }

    mod driver_tests {
        use super::*;

        #[tokio::test]
        async fn test_ids_go_stale_after_navigation() {
            let driver = SimFactory::new().launch();
            driver.navigate(&format!("{BASE}/login")).await.unwrap();
            let email = first(&driver, &Locator::id("email")).await;
            driver.navigate(&format!("{BASE}/signup")).await.unwrap();
            let err = driver.text(&email).await.unwrap_err();
            assert!(err.is_transient());
        }

        #[tokio::test]
        async fn test_send_keys_appends_and_clear_resets() {
            let driver = SimFactory::new().launch();
            driver.navigate(&format!("{BASE}/login")).await.unwrap();
            let email = first(&driver, &Locator::id("email")).await;
            driver.send_keys(&email, "a@").await.unwrap();
            driver.send_keys(&email, "b.co").await.unwrap();
            assert_eq!(driver.attribute(&email, "value").await.unwrap().as_deref(), Some("a@b.co"));
            driver.clear(&email).await.unwrap();
            assert_eq!(driver.attribute(&email, "value").await.unwrap().as_deref(), Some(""));
        }

        #[tokio::test]
        async fn test_hidden_element_rejects_click() {
            let driver = SimFactory::new().launch();
            log_in(&driver).await;
            let logout_button = Locator::xpath("//button[contains(text(), 'Logout')]");
            let logout = first(&driver, &logout_button).await;
            assert!(!driver.element_state(&logout).await.unwrap().displayed);
            assert!(matches!(
                driver.click(&logout).await.unwrap_err(),
                E2eError::Interaction { .. }
            ));
        }

        #[tokio::test]
        async fn test_login_and_cookie_reset() {
            let driver = SimFactory::new().launch();
            log_in(&driver).await;
            assert!(driver.current_url().await.unwrap().ends_with("/dashboard"));
            driver.delete_all_cookies().await.unwrap();
            driver.navigate(&format!("{BASE}/dashboard")).await.unwrap();
            assert!(driver.current_url().await.unwrap().ends_with("/login"));
        }

        #[tokio::test]
        async fn test_scripts() {
            let driver = SimFactory::new().launch();
            driver.navigate(&format!("{BASE}/")).await.unwrap();
            let state = driver
                .execute_script("return document.readyState", None)
                .await
                .unwrap();
            assert_eq!(state, serde_json::json!("complete"));
            assert!(driver.execute_script("alert(1)", None).await.is_err());
        }

        #[tokio::test]
        async fn test_lookup_ignores_implicit_wait() {
            let driver = SimFactory::new().launch();
            let timeouts = DriverTimeouts {
                implicit: Duration::from_secs(30),
                ..DriverTimeouts::default()
            };
            driver.set_timeouts(&timeouts).await.unwrap();
            driver.navigate(&format!("{BASE}/login")).await.unwrap();
            let missing = Locator::id("no-such-element");
            let lookup = driver.find_elements(&missing);
            let found = tokio::time::timeout(Duration::from_secs(1), lookup)
                .await
                .expect("lookup must not wait for the implicit timeout")
                .unwrap();
            assert!(found.is_empty());
        }

        #[tokio::test]
        async fn test_quit_closes_session() {
            let factory = SimFactory::new();
            let driver = factory.launch();
            driver.quit().await.unwrap();
            assert!(matches!(driver.quit().await, Err(E2eError::SessionClosed)));
            assert!(matches!(
                driver.current_url().await,
                Err(E2eError::SessionClosed)
            ));
            assert_eq!(factory.quit_count(), 1);
            assert_eq!(factory.launch_count(), 1);
        }

        #[tokio::test]
        async fn test_screenshot_is_png() {
            let driver = SimFactory::new().launch();
            let shot = driver.screenshot().await.unwrap();
            assert!(shot.is_valid());
            assert_eq!(&shot.data[1..4], b"PNG");
        }
    }

    mod factory_tests {
        use super::*;

        #[tokio::test]
        async fn test_tabs_share_accounts() {
            let factory = SimFactory::with_timing(SimTiming::instant());
            let a = factory.launch();
            let b = factory.launch();
            log_in(&a).await;
            assert!(b.current_url().await.unwrap().starts_with("about:"));
            log_in(&b).await;
            assert!(b.current_url().await.unwrap().ends_with("/dashboard"));
        }

        #[tokio::test]
        async fn test_create_applies_window_size() {
            let factory = SimFactory::new();
            let driver = factory
                .create(&DriverConfig::new().window(800, 600))
                .await
                .unwrap();
            let shot = driver.screenshot().await.unwrap();
            assert_eq!((shot.width, shot.height), (800, 600));
        }
    }
}
