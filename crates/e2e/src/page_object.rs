//! Page Object Model Support
//!
//! One type per product screen. Every page object holds a [`Session`] handle
//! and nothing else; locators are `const` items next to the type.
//!
//! ## Two tiers
//!
//! - **Actions** resolve their element with [`Readiness::Clickable`], perform
//!   exactly one interaction and return `&Self` or the page object of the
//!   screen they lead to. Failures propagate.
//! - **Queries** (`*_text`, `is_*_displayed`, counts) never fail: any error
//!   is logged at `warn` together with what the wait last observed, and a
//!   default (`""`, `false`, `0`) is returned.
//!
//! ## Toyota Way Application:
//! - **Poka-Yoke**: Navigation targets are part of each action's signature
//! - **Muda**: Locators and waits live in one place per screen
//! - **Genchi Genbutsu**: Page objects reflect actual page structure

use crate::element::Element;
use crate::locator::Locator;
use crate::result::E2eResult;
use crate::session::Session;
use crate::wait::Readiness;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// A product screen
#[async_trait]
pub trait PageObject: Send + Sync {
    /// Session this page drives
    fn session(&self) -> &Session;

    /// Name used in logs
    fn page_name(&self) -> &'static str;

    /// URL pattern of the screen (e.g., "/login", "/projects/:id")
    fn url_pattern(&self) -> &'static str;

    /// Elements that must be visible for the screen to count as loaded
    fn defining_locators(&self) -> &'static [Locator];

    /// Whether every defining element becomes visible within the default
    /// timeout
    async fn is_loaded(&self) -> bool {
        for locator in self.defining_locators() {
            if let Err(e) = self
                .session()
                .wait_until_ready(locator, Readiness::Visible)
                .await
            {
                tracing::warn!(page = self.page_name(), error = %e, "page is not loaded");
                return false;
            }
        }
        tracing::debug!(page = self.page_name(), "page loaded");
        true
    }

    /// Whether the browser's current URL matches [`Self::url_pattern`]
    async fn is_current(&self) -> bool {
        match self.session().current_url().await {
            Ok(url) => UrlMatcher::new(self.url_pattern()).matches(url_path(&url)),
            Err(e) => {
                tracing::warn!(page = self.page_name(), error = %e, "cannot read current URL");
                false
            }
        }
    }

    /// Wait until `locator` is clickable and click it
    async fn click(&self, locator: &Locator) -> E2eResult<()> {
        self.session()
            .wait_until_ready(locator, Readiness::Clickable)
            .await?
            .click()
            .await
    }

    /// Wait until `locator` is clickable and replace its value with `text`
    async fn type_text(&self, locator: &Locator, text: &str) -> E2eResult<()> {
        self.session()
            .wait_until_ready(locator, Readiness::Clickable)
            .await?
            .set_text(text)
            .await
    }

    /// Wait until `locator` is visible using the default timeout
    async fn wait_visible(&self, locator: &Locator) -> E2eResult<Element> {
        self.session()
            .wait_until_ready(locator, Readiness::Visible)
            .await
    }

    /// Visible text of `locator`, or `""`
    async fn query_text(&self, locator: &Locator) -> String {
        self.query_text_within(locator, self.session().timeouts().default_wait)
            .await
    }

    /// Visible text of `locator` with an explicit timeout, or `""`
    async fn query_text_within(&self, locator: &Locator, timeout: Duration) -> String {
        let result = async {
            self.session()
                .wait_until_ready_within(locator, Readiness::Visible, timeout)
                .await?
                .text()
                .await
        }
        .await;
        result.unwrap_or_else(|e| {
            tracing::warn!(page = self.page_name(), %locator, error = %e, "text not available");
            String::new()
        })
    }

    /// Attribute of `locator`, or `""`
    async fn query_attribute(&self, locator: &Locator, name: &str) -> String {
        let result = async {
            self.session()
                .wait_until_ready(locator, Readiness::Visible)
                .await?
                .attribute(name)
                .await
        }
        .await;
        match result {
            Ok(value) => value.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(
                    page = self.page_name(),
                    %locator,
                    attribute = name,
                    error = %e,
                    "attribute not available"
                );
                String::new()
            }
        }
    }

    /// Whether `locator` becomes visible within the default timeout
    async fn query_displayed(&self, locator: &Locator) -> bool {
        match self.wait_visible(locator).await {
            Ok(element) => element.is_displayed().await.unwrap_or(false),
            Err(e) => {
                tracing::warn!(
                    page = self.page_name(),
                    %locator,
                    error = %e,
                    "element not displayed"
                );
                false
            }
        }
    }

    /// Number of elements currently matching `locator`, or `0`
    async fn query_count(&self, locator: &Locator) -> usize {
        match self.session().find_all(locator).await {
            Ok(elements) => elements.len(),
            Err(e) => {
                tracing::warn!(
                    page = self.page_name(),
                    %locator,
                    error = %e,
                    "count not available"
                );
                0
            }
        }
    }

    /// Texts of every element currently matching `locator`
    async fn query_all_texts(&self, locator: &Locator) -> Vec<String> {
        let elements = match self.session().find_all(locator).await {
            Ok(elements) => elements,
            Err(e) => {
                tracing::warn!(
                    page = self.page_name(),
                    %locator,
                    error = %e,
                    "elements not available"
                );
                return Vec::new();
            }
        };
        let mut texts = Vec::with_capacity(elements.len());
        for element in elements {
            match element.text().await {
                Ok(text) => texts.push(text),
                Err(e) => {
                    tracing::warn!(
                        page = self.page_name(),
                        %locator,
                        error = %e,
                        "element text not available"
                    );
                }
            }
        }
        texts
    }
}

/// Path part of an absolute URL (`https://host/a/b?q` -> `/a/b`)
#[must_use]
pub fn url_path(url: &str) -> &str {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = without_scheme.find('/').map_or("/", |i| &without_scheme[i..]);
    path.split(['?', '#']).next().unwrap_or(path)
}

/// URL pattern matcher for page objects
#[derive(Debug, Clone)]
pub struct UrlMatcher {
    pattern: String,
    segments: Vec<UrlSegment>,
}

#[derive(Debug, Clone)]
enum UrlSegment {
    Literal(String),
    Wildcard,
    Parameter(String),
}

impl UrlMatcher {
    /// Create a new URL matcher from a pattern
    ///
    /// Patterns support:
    /// - Literal segments: `/login`
    /// - Wildcards: `/projects/*`
    /// - Named parameters: `/projects/:id/deploy`
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if s == "*" {
                    UrlSegment::Wildcard
                } else if let Some(name) = s.strip_prefix(':') {
                    UrlSegment::Parameter(name.to_string())
                } else {
                    UrlSegment::Literal(s.to_string())
                }
            })
            .collect();

        Self {
            pattern: pattern.to_string(),
            segments,
        }
    }

    /// Check if a URL path matches the pattern
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if parts.len() != self.segments.len() {
            return false;
        }
        self.segments
            .iter()
            .zip(&parts)
            .all(|(segment, part)| match segment {
                UrlSegment::Literal(lit) => lit == part,
                UrlSegment::Wildcard | UrlSegment::Parameter(_) => true,
            })
    }

    /// Extract named parameters from a URL path
    #[must_use]
    pub fn extract_params(&self, path: &str) -> HashMap<String, String> {
        let parts = path.split('/').filter(|s| !s.is_empty());
        self.segments
            .iter()
            .zip(parts)
            .filter_map(|(segment, part)| match segment {
                UrlSegment::Parameter(name) => Some((name.clone(), part.to_string())),
                _ => None,
            })
            .collect()
    }

    /// Get the original pattern
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod url_matcher_tests {
        use super::*;

        #[test]
        fn test_literal_match() {
            let matcher = UrlMatcher::new("/login");
            assert!(matcher.matches("/login"));
            assert!(!matcher.matches("/signup"));
            assert!(!matcher.matches("/login/extra"));
        }

        #[test]
        fn test_root_pattern() {
            assert!(UrlMatcher::new("/").matches("/"));
            assert!(!UrlMatcher::new("/").matches("/dashboard"));
        }

        #[test]
        fn test_parameter_extraction() {
            let matcher = UrlMatcher::new("/projects/:id/deploy");
            assert!(matcher.matches("/projects/42/deploy"));
            assert!(!matcher.matches("/projects/42/settings"));
            let params = matcher.extract_params("/projects/42/deploy");
            assert_eq!(params.get("id").map(String::as_str), Some("42"));
        }

        #[test]
        fn test_wildcard() {
            let matcher = UrlMatcher::new("/projects/*");
            assert!(matcher.matches("/projects/7"));
            assert!(matcher.extract_params("/projects/7").is_empty());
            assert_eq!(matcher.pattern(), "/projects/*");
        }
    }

    mod url_path_tests {
        use super::*;

        #[test]
        fn test_url_path() {
            assert_eq!(url_path("https://emergent.sh/dashboard"), "/dashboard");
            assert_eq!(url_path("https://emergent.sh"), "/");
            assert_eq!(url_path("https://emergent.sh/projects/3?tab=code#top"), "/projects/3");
            assert_eq!(url_path("/login"), "/login");
        }
    }
}
