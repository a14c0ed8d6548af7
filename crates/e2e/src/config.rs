//! Suite configuration
//!
//! Loaded from a YAML file using the product's dotted keys
//! (`base.url`, `default.timeout`, ...) and overridable key by key with
//! `key=value` pairs. Durations are given in seconds and may be fractional.
//!
//! ```yaml
//! base.url: https://emergent.sh
//! browser: chrome
//! headless: true
//! default.timeout: 30
//! ```

use crate::constants;
use crate::driver::{BrowserKind, DriverConfig, DriverTimeouts};
use crate::result::{E2eError, E2eResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Resolved wait tiers and session timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Element waits in page objects
    pub default_wait: Duration,
    /// Quick checks
    pub short_wait: Duration,
    /// AI responses, deployments and test runs
    pub long_wait: Duration,
    /// Handed to the driver as its implicit wait; element lookups never
    /// block on it, page objects wait through [`crate::Waiter`]
    pub implicit_wait: Duration,
    /// Page load timeout
    pub page_load: Duration,
    /// Script timeout
    pub script: Duration,
    /// Wait polling interval
    pub poll_interval: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        SuiteConfig::default().timeouts()
    }
}

impl Timeouts {
    /// Uniform timeouts for fast runs against the simulator
    #[must_use]
    pub const fn uniform(wait: Duration, poll_interval: Duration) -> Self {
        Self {
            default_wait: wait,
            short_wait: wait,
            long_wait: wait,
            implicit_wait: Duration::ZERO,
            page_load: wait,
            script: wait,
            poll_interval,
        }
    }

    /// Set the default element wait
    #[must_use]
    pub const fn with_default_wait(mut self, wait: Duration) -> Self {
        self.default_wait = wait;
        self
    }

    /// Set the long element wait
    #[must_use]
    pub const fn with_long_wait(mut self, wait: Duration) -> Self {
        self.long_wait = wait;
        self
    }

    /// Driver-level part of the timeouts
    #[must_use]
    pub const fn driver(&self) -> DriverTimeouts {
        DriverTimeouts {
            implicit: self.implicit_wait,
            page_load: self.page_load,
            script: self.script,
        }
    }
}

/// Full suite configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteConfig {
    /// Product root URL
    #[serde(rename = "base.url")]
    pub base_url: String,
    /// Browser family
    pub browser: BrowserKind,
    /// Run without a visible window
    pub headless: bool,
    /// Default element wait (seconds)
    #[serde(rename = "default.timeout")]
    pub default_timeout: f64,
    /// Short element wait (seconds)
    #[serde(rename = "short.timeout")]
    pub short_timeout: f64,
    /// Long element wait (seconds)
    #[serde(rename = "long.timeout")]
    pub long_timeout: f64,
    /// Driver implicit wait (seconds)
    ///
    /// Kept for configuration compatibility. Lookups return at once and the
    /// explicit `timeout` tiers govern every wait.
    #[serde(rename = "implicit.wait")]
    pub implicit_wait: f64,
    /// Page load timeout (seconds)
    #[serde(rename = "page.load.timeout")]
    pub page_load_timeout: f64,
    /// Script timeout (seconds)
    #[serde(rename = "script.timeout")]
    pub script_timeout: f64,
    /// Wait polling interval (milliseconds)
    #[serde(rename = "poll.interval.ms")]
    pub poll_interval_ms: u64,
    /// Account used by the login helpers
    #[serde(rename = "test.username")]
    pub test_username: String,
    /// Password for `test.username`
    #[serde(rename = "test.password")]
    pub test_password: String,
    /// Directory for failure screenshots
    #[serde(rename = "screenshot.path")]
    pub screenshot_path: PathBuf,
    /// Directory for HTML reports
    #[serde(rename = "report.path")]
    pub report_path: PathBuf,
    /// Capture a screenshot when a scenario fails
    #[serde(rename = "take.screenshot.on.failure")]
    pub take_screenshot_on_failure: bool,
    /// Browser window width
    #[serde(rename = "window.width")]
    pub window_width: u32,
    /// Browser window height
    #[serde(rename = "window.height")]
    pub window_height: u32,
    /// Browser executable override
    #[serde(rename = "browser.binary")]
    pub browser_binary: Option<PathBuf>,
    /// Delete cookies after every scenario
    #[serde(rename = "reset.cookies")]
    pub reset_cookies: bool,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: constants::BASE_URL.to_string(),
            browser: BrowserKind::Chrome,
            headless: false,
            default_timeout: constants::DEFAULT_TIMEOUT_SECS,
            short_timeout: constants::SHORT_TIMEOUT_SECS,
            long_timeout: constants::LONG_TIMEOUT_SECS,
            implicit_wait: 10.0,
            page_load_timeout: 60.0,
            script_timeout: 30.0,
            poll_interval_ms: crate::wait::DEFAULT_POLL_INTERVAL_MS,
            test_username: constants::TEST_USERNAME.to_string(),
            test_password: constants::TEST_PASSWORD.to_string(),
            screenshot_path: PathBuf::from(constants::SCREENSHOT_PATH),
            report_path: PathBuf::from(constants::REPORT_PATH),
            take_screenshot_on_failure: true,
            window_width: 1920,
            window_height: 1080,
            browser_binary: None,
            reset_cookies: false,
        }
    }
}

impl SuiteConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> E2eResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML file
    pub fn load(path: &Path) -> E2eResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            E2eError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "Loaded suite configuration");
        Self::from_yaml_str(&text)
    }

    /// Set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set browser family
    #[must_use]
    pub const fn with_browser(mut self, browser: BrowserKind) -> Self {
        self.browser = browser;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set default element wait in seconds
    #[must_use]
    pub fn with_default_timeout(mut self, secs: f64) -> Self {
        self.default_timeout = secs;
        self
    }

    /// Set screenshot directory
    #[must_use]
    pub fn with_screenshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.screenshot_path = path.into();
        self
    }

    /// Set report directory
    #[must_use]
    pub fn with_report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = path.into();
        self
    }

    /// Apply one `key=value` override using the YAML key names
    pub fn set(&mut self, key: &str, value: &str) -> E2eResult<()> {
        let key = key.trim();
        let value = value.trim();
        match key {
            "base.url" => self.base_url = value.to_string(),
            "browser" => self.browser = BrowserKind::parse_or_chrome(value),
            "headless" => self.headless = parse_value(key, value)?,
            "default.timeout" => self.default_timeout = parse_value(key, value)?,
            "short.timeout" => self.short_timeout = parse_value(key, value)?,
            "long.timeout" => self.long_timeout = parse_value(key, value)?,
            "implicit.wait" => self.implicit_wait = parse_value(key, value)?,
            "page.load.timeout" => self.page_load_timeout = parse_value(key, value)?,
            "script.timeout" => self.script_timeout = parse_value(key, value)?,
            "poll.interval.ms" => self.poll_interval_ms = parse_value(key, value)?,
            "test.username" => self.test_username = value.to_string(),
            "test.password" => self.test_password = value.to_string(),
            "screenshot.path" => self.screenshot_path = PathBuf::from(value),
            "report.path" => self.report_path = PathBuf::from(value),
            "take.screenshot.on.failure" => {
                self.take_screenshot_on_failure = parse_value(key, value)?;
            }
            "window.width" => self.window_width = parse_value(key, value)?,
            "window.height" => self.window_height = parse_value(key, value)?,
            "browser.binary" => {
                self.browser_binary = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            "reset.cookies" => self.reset_cookies = parse_value(key, value)?,
            other => return Err(E2eError::config(format!("unknown key '{other}'"))),
        }
        Ok(())
    }

    /// Apply `key=value` overrides in order, then validate
    pub fn apply_overrides<I, S>(&mut self, overrides: I) -> E2eResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pair in overrides {
            let pair = pair.as_ref();
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| E2eError::config(format!("expected key=value, got '{pair}'")))?;
            self.set(key, value)?;
        }
        self.validate()
    }

    /// Check value ranges
    pub fn validate(&self) -> E2eResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(E2eError::config(format!(
                "base.url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        for (key, secs) in [
            ("default.timeout", self.default_timeout),
            ("short.timeout", self.short_timeout),
            ("long.timeout", self.long_timeout),
            ("implicit.wait", self.implicit_wait),
            ("page.load.timeout", self.page_load_timeout),
            ("script.timeout", self.script_timeout),
        ] {
            if !secs.is_finite() || secs < 0.0 {
                return Err(E2eError::config(format!(
                    "{key} must be a non-negative number of seconds"
                )));
            }
        }
        if self.poll_interval_ms == 0 {
            return Err(E2eError::config("poll.interval.ms must be positive"));
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(E2eError::config("window size must be positive"));
        }
        Ok(())
    }

    /// Base URL without a trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Absolute URL for a product route
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url())
    }

    /// Resolved timeouts
    #[must_use]
    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            default_wait: Duration::from_secs_f64(self.default_timeout),
            short_wait: Duration::from_secs_f64(self.short_timeout),
            long_wait: Duration::from_secs_f64(self.long_timeout),
            implicit_wait: Duration::from_secs_f64(self.implicit_wait),
            page_load: Duration::from_secs_f64(self.page_load_timeout),
            script: Duration::from_secs_f64(self.script_timeout),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }

    /// Driver launch configuration
    #[must_use]
    pub fn driver_config(&self) -> DriverConfig {
        let config = DriverConfig::new()
            .browser(self.browser)
            .headless(self.headless)
            .window(self.window_width, self.window_height)
            .timeouts(self.timeouts().driver());
        match &self.browser_binary {
            Some(path) => config.binary(path.clone()),
            None => config,
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> E2eResult<T> {
    value
        .parse()
        .map_err(|_| E2eError::config(format!("invalid value '{value}' for {key}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    mod default_tests {
        use super::*;

        #[test]
        fn test_defaults_match_product() {
            let config = SuiteConfig::default();
            assert_eq!(config.base_url, "https://emergent.sh");
            assert_eq!(config.browser, BrowserKind::Chrome);
            assert!(!config.headless);
            assert!(config.take_screenshot_on_failure);
            assert!(!config.reset_cookies);
            assert_eq!(config.test_username, "test@example.com");
            assert_eq!(config.screenshot_path, PathBuf::from("target/screenshots"));
        }

        #[test]
        fn test_default_timeouts() {
            let t = SuiteConfig::default().timeouts();
            assert_eq!(t.default_wait, Duration::from_secs(30));
            assert_eq!(t.short_wait, Duration::from_secs(5));
            assert_eq!(t.long_wait, Duration::from_secs(60));
            assert_eq!(t.implicit_wait, Duration::from_secs(10));
            assert_eq!(t.page_load, Duration::from_secs(60));
            assert_eq!(t.script, Duration::from_secs(30));
            assert_eq!(t.poll_interval, Duration::from_millis(50));
        }

        #[test]
        fn test_url_joins_without_double_slash() {
            let config = SuiteConfig::default().with_base_url("https://staging.emergent.sh/");
            assert_eq!(config.url("/login"), "https://staging.emergent.sh/login");
        }
    }

    mod yaml_tests {
        use super::*;

        #[test]
        fn test_dotted_keys() {
            let config = SuiteConfig::from_yaml_str(
                "base.url: http://localhost:3000\nbrowser: firefox\nheadless: true\ndefault.timeout: 0.5\n",
            )
            .unwrap();
            assert_eq!(config.base_url, "http://localhost:3000");
            assert_eq!(config.browser, BrowserKind::Firefox);
            assert!(config.headless);
            assert_eq!(config.timeouts().default_wait, Duration::from_millis(500));
            assert_eq!(config.long_timeout, 60.0);
        }

        #[test]
        fn test_unknown_browser_falls_back() {
            let config = SuiteConfig::from_yaml_str("browser: netscape\n").unwrap();
            assert_eq!(config.browser, BrowserKind::Chrome);
        }

        #[test]
        fn test_unknown_key_rejected() {
            assert!(SuiteConfig::from_yaml_str("base.uri: x\n").is_err());
        }

        #[test]
        fn test_load_from_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("suite.yaml");
            std::fs::write(&path, "reset.cookies: true\n").unwrap();
            assert!(SuiteConfig::load(&path).unwrap().reset_cookies);
            assert!(SuiteConfig::load(&dir.path().join("missing.yaml")).is_err());
        }
    }

    mod override_tests {
        use super::*;

        #[test]
        fn test_overrides_apply_in_order() {
            let mut config = SuiteConfig::default();
            config
                .apply_overrides(["headless=true", "default.timeout=2", "default.timeout=3"])
                .unwrap();
            assert!(config.headless);
            assert_eq!(config.default_timeout, 3.0);
        }

        #[test]
        fn test_override_errors() {
            let mut config = SuiteConfig::default();
            assert!(config.apply_overrides(["headless"]).is_err());
            assert!(config.apply_overrides(["headless=maybe"]).is_err());
            assert!(config.apply_overrides(["nope=1"]).is_err());
            assert!(config.apply_overrides(["default.timeout=-1"]).is_err());
            assert!(config.apply_overrides(["base.url=ftp://x"]).is_err());
        }

        #[test]
        fn test_browser_binary_override() {
            let mut config = SuiteConfig::default();
            config.set("browser.binary", "/usr/bin/chromium").unwrap();
            assert_eq!(
                config.driver_config().binary,
                Some(PathBuf::from("/usr/bin/chromium"))
            );
            config.set("browser.binary", "").unwrap();
            assert!(config.browser_binary.is_none());
        }
    }
}
