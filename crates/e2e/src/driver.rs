//! Driver - Abstract Browser Automation Trait
//!
//! The suite never talks to a browser directly. Everything goes through the
//! [`Driver`] trait, so the same page objects run against a real browser
//! (`ChromiumDriver`, feature `browser`) or the in-memory product simulator
//! ([`crate::sim::SimDriver`]).
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  Driver (async trait)                                            │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────┐          ┌─────────────────────┐        │
//! │  │  ChromiumDriver     │          │  SimDriver          │        │
//! │  │  CDP via            │          │  In-memory product  │        │
//! │  │  chromiumoxide      │          │  model (tests)      │        │
//! │  └─────────────────────┘          └─────────────────────┘        │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

use crate::locator::Locator;
use crate::result::{E2eError, E2eResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Opaque, driver-scoped element reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(pub String);

impl ElementId {
    /// Create a new element id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Observable state of an element at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElementState {
    /// Rendered and visible to the user
    pub displayed: bool,
    /// Accepts input (not disabled)
    pub enabled: bool,
}

/// Screenshot data with metadata
#[derive(Debug, Clone)]
pub struct Screenshot {
    /// Raw PNG data
    pub data: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Timestamp when screenshot was taken
    pub timestamp: SystemTime,
}

impl Screenshot {
    /// Create a new screenshot
    #[must_use]
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
            timestamp: SystemTime::now(),
        }
    }

    /// Check if screenshot is valid (has data)
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.data.is_empty()
    }

    /// Write the PNG bytes to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> E2eResult<()> {
        if !self.is_valid() {
            return Err(E2eError::Screenshot {
                message: "empty screenshot".to_string(),
            });
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &self.data)?;
        Ok(())
    }
}

/// Session-level timeouts applied right after launch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverTimeouts {
    /// Implicit element lookup wait; recorded only, since
    /// [`Driver::find_elements`] must return immediately
    pub implicit: Duration,
    /// Page load timeout
    pub page_load: Duration,
    /// Script execution timeout
    pub script: Duration,
}

impl Default for DriverTimeouts {
    fn default() -> Self {
        Self {
            implicit: Duration::from_secs(10),
            page_load: Duration::from_secs(60),
            script: Duration::from_secs(30),
        }
    }
}

/// Supported browser families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BrowserKind {
    /// Google Chrome / Chromium
    #[default]
    Chrome,
    /// Mozilla Firefox
    Firefox,
    /// Microsoft Edge (Chromium)
    Edge,
    /// Apple Safari
    Safari,
}

impl BrowserKind {
    /// Lowercase name as used in configuration
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
            Self::Edge => "edge",
            Self::Safari => "safari",
        }
    }

    /// Whether the browser can run headless
    #[must_use]
    pub const fn supports_headless(self) -> bool {
        !matches!(self, Self::Safari)
    }

    /// Whether this build can drive the browser through CDP
    #[must_use]
    pub const fn is_chromium(self) -> bool {
        matches!(self, Self::Chrome | Self::Edge)
    }

    /// Parse a configured name, falling back to Chrome for unknown names
    #[must_use]
    pub fn parse_or_chrome(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            tracing::warn!(
                browser = name,
                "Browser type not supported, defaulting to chrome"
            );
            Self::Chrome
        })
    }
}

impl FromStr for BrowserKind {
    type Err = E2eError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chrome" | "chromium" => Ok(Self::Chrome),
            "firefox" => Ok(Self::Firefox),
            "edge" | "msedge" => Ok(Self::Edge),
            "safari" => Ok(Self::Safari),
            other => Err(E2eError::config(format!("unknown browser '{other}'"))),
        }
    }
}

impl From<String> for BrowserKind {
    fn from(value: String) -> Self {
        Self::parse_or_chrome(&value)
    }
}

impl From<BrowserKind> for String {
    fn from(value: BrowserKind) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Browser configuration for driver creation
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Browser family
    pub browser: BrowserKind,
    /// Run in headless mode
    pub headless: bool,
    /// Window width
    pub window_width: u32,
    /// Window height
    pub window_height: u32,
    /// Executable path override
    pub binary: Option<PathBuf>,
    /// Timeouts applied to the session
    pub timeouts: DriverTimeouts,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            browser: BrowserKind::Chrome,
            headless: false,
            window_width: 1920,
            window_height: 1080,
            binary: None,
            timeouts: DriverTimeouts::default(),
        }
    }
}

impl DriverConfig {
    /// Create new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set browser family
    #[must_use]
    pub const fn browser(mut self, browser: BrowserKind) -> Self {
        self.browser = browser;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set window dimensions
    #[must_use]
    pub const fn window(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Set executable path
    #[must_use]
    pub fn binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.binary = Some(path.into());
        self
    }

    /// Set session timeouts
    #[must_use]
    pub const fn timeouts(mut self, timeouts: DriverTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Headless flag after browser capabilities are taken into account
    #[must_use]
    pub const fn effective_headless(&self) -> bool {
        self.headless && self.browser.supports_headless()
    }
}

/// Abstract driver trait for browser automation
///
/// Implementations are shared behind `Arc<dyn Driver>`, so every method
/// takes `&self`.
#[async_trait]
pub trait Driver: Send + Sync + fmt::Debug {
    /// Navigate to URL
    async fn navigate(&self, url: &str) -> E2eResult<()>;

    /// Get current URL
    async fn current_url(&self) -> E2eResult<String>;

    /// Get the document title
    async fn title(&self) -> E2eResult<String>;

    /// Reload the current page
    async fn refresh(&self) -> E2eResult<()>;

    /// All elements matching `locator`, in document order, without waiting
    /// for any to appear
    async fn find_elements(&self, locator: &Locator) -> E2eResult<Vec<ElementId>>;

    /// Current displayed/enabled state of an element
    async fn element_state(&self, id: &ElementId) -> E2eResult<ElementState>;

    /// Click element
    async fn click(&self, id: &ElementId) -> E2eResult<()>;

    /// Clear an input's value
    async fn clear(&self, id: &ElementId) -> E2eResult<()>;

    /// Type text into element
    async fn send_keys(&self, id: &ElementId, text: &str) -> E2eResult<()>;

    /// Visible text of an element
    async fn text(&self, id: &ElementId) -> E2eResult<String>;

    /// Attribute (or property) value of an element
    async fn attribute(&self, id: &ElementId, name: &str) -> E2eResult<Option<String>>;

    /// Execute JavaScript; `target` is exposed to the script as `arguments[0]`
    async fn execute_script(
        &self,
        script: &str,
        target: Option<&ElementId>,
    ) -> E2eResult<serde_json::Value>;

    /// Take screenshot of the current viewport
    async fn screenshot(&self) -> E2eResult<Screenshot>;

    /// Apply implicit wait, page-load and script timeouts
    async fn set_timeouts(&self, timeouts: &DriverTimeouts) -> E2eResult<()>;

    /// Resize the browser window
    async fn set_window_size(&self, width: u32, height: u32) -> E2eResult<()>;

    /// Drop every cookie of the session
    async fn delete_all_cookies(&self) -> E2eResult<()>;

    /// Close the browser
    async fn quit(&self) -> E2eResult<()>;
}

/// Creates one driver per browser session
#[async_trait]
pub trait DriverFactory: Send + Sync + fmt::Debug {
    /// Launch a new session for `config`
    async fn create(&self, config: &DriverConfig) -> E2eResult<Arc<dyn Driver>>;
}

/// Factory switching over [`BrowserKind`] to launch a real browser
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserFactory;

#[async_trait]
impl DriverFactory for BrowserFactory {
    async fn create(&self, config: &DriverConfig) -> E2eResult<Arc<dyn Driver>> {
        tracing::info!(
            browser = %config.browser,
            headless = config.effective_headless(),
            "Launching browser session"
        );
        if config.browser == BrowserKind::Safari && config.headless {
            tracing::warn!("Safari does not support headless mode, launching headed");
        }
        match config.browser {
            BrowserKind::Chrome | BrowserKind::Edge => launch_chromium(config).await,
            BrowserKind::Firefox | BrowserKind::Safari => Err(E2eError::UnsupportedBrowser {
                browser: config.browser.to_string(),
                message: "only Chromium-family browsers are driven over CDP".to_string(),
            }),
        }
    }
}

#[cfg(feature = "browser")]
async fn launch_chromium(config: &DriverConfig) -> E2eResult<Arc<dyn Driver>> {
    let driver = crate::chromium::ChromiumDriver::launch(config).await?;
    Ok(Arc::new(driver))
}

#[cfg(not(feature = "browser"))]
async fn launch_chromium(config: &DriverConfig) -> E2eResult<Arc<dyn Driver>> {
    Err(E2eError::UnsupportedBrowser {
        browser: config.browser.to_string(),
        message: "built without the `browser` feature".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    mod browser_kind_tests {
        use super::*;

        #[test]
        fn test_parse_known_names() {
            let cases = [
                ("chrome", BrowserKind::Chrome),
                ("Firefox", BrowserKind::Firefox),
                (" edge ", BrowserKind::Edge),
                ("safari", BrowserKind::Safari),
            ];
            for (name, kind) in cases {
                assert_eq!(name.parse::<BrowserKind>().unwrap(), kind);
            }
        }

        #[test]
        fn test_unknown_falls_back_to_chrome() {
            assert!("opera".parse::<BrowserKind>().is_err());
            assert_eq!(BrowserKind::parse_or_chrome("opera"), BrowserKind::Chrome);
        }

        #[test]
        fn test_serde_uses_lowercase_names() {
            let kind: BrowserKind = serde_json::from_str("\"edge\"").unwrap();
            assert_eq!(kind, BrowserKind::Edge);
            let name = serde_json::to_string(&BrowserKind::Firefox).unwrap();
            assert_eq!(name, "\"firefox\"");
        }

        #[test]
        fn test_capabilities() {
            assert!(!BrowserKind::Safari.supports_headless());
            assert!(BrowserKind::Edge.is_chromium());
            assert!(!BrowserKind::Firefox.is_chromium());
        }
    }

    mod driver_config_tests {
        use super::*;

        #[test]
        fn test_config_default() {
            let config = DriverConfig::default();
            assert_eq!(config.browser, BrowserKind::Chrome);
            assert!(!config.headless);
            assert_eq!((config.window_width, config.window_height), (1920, 1080));
            assert_eq!(config.timeouts.page_load, Duration::from_secs(60));
        }

        #[test]
        fn test_config_builder() {
            let config = DriverConfig::new()
                .browser(BrowserKind::Safari)
                .headless(true)
                .window(800, 600)
                .binary("/opt/safari");
            assert_eq!(config.window_width, 800);
            assert_eq!(config.binary, Some(PathBuf::from("/opt/safari")));
            assert!(!config.effective_headless());
        }
    }

    mod screenshot_tests {
        use super::*;

        #[test]
        fn test_empty_screenshot_is_invalid() {
            assert!(!Screenshot::new(vec![], 10, 10).is_valid());
            assert!(Screenshot::new(vec![1, 2, 3], 10, 10).is_valid());
        }

        #[test]
        fn test_save_creates_directories() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("nested/shot.png");
            Screenshot::new(vec![0x89, 0x50, 0x4E, 0x47], 1, 1)
                .save(&path)
                .unwrap();
            assert_eq!(std::fs::read(&path).unwrap().len(), 4);
        }
    }

    #[cfg(not(feature = "browser"))]
    mod factory_tests {
        use super::*;

        #[tokio::test]
        async fn test_firefox_is_unsupported() {
            let config = DriverConfig::new().browser(BrowserKind::Firefox);
            let err = BrowserFactory.create(&config).await.unwrap_err();
            assert!(matches!(err, E2eError::UnsupportedBrowser { .. }));
        }

        #[tokio::test]
        async fn test_chrome_requires_browser_feature() {
            let config = DriverConfig::new();
            let err = BrowserFactory.create(&config).await.unwrap_err();
            assert!(err.to_string().contains("browser"));
        }
    }
}
