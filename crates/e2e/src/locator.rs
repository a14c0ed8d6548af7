//! Locators: named references to DOM elements.
//!
//! A locator is pure data (strategy + selector). Per-screen locators are
//! `const` items on each page object; dynamic ones (an `<option>` by its
//! label, a project card by name) are built at call time.
//!
//! Uniqueness is a runtime property of the DOM: when a locator matches more
//! than one element, the first one in document order is used.

use std::borrow::Cow;
use std::fmt;

/// Strategy used to resolve a selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// `id` attribute
    Id,
    /// CSS selector (e.g., "button.primary")
    Css,
    /// XPath expression (structural path)
    XPath,
    /// Leaf element whose text content contains the selector
    Text,
}

impl Strategy {
    /// Short prefix used in diagnostics
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Css => "css",
            Self::XPath => "xpath",
            Self::Text => "text",
        }
    }
}

/// A rule identifying zero or more elements on the current screen
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    strategy: Strategy,
    selector: Cow<'static, str>,
}

impl Locator {
    /// Locate by `id` attribute
    #[must_use]
    pub const fn id(selector: &'static str) -> Self {
        Self::fixed(Strategy::Id, selector)
    }

    /// Locate by CSS selector
    #[must_use]
    pub const fn css(selector: &'static str) -> Self {
        Self::fixed(Strategy::Css, selector)
    }

    /// Locate by XPath expression
    #[must_use]
    pub const fn xpath(selector: &'static str) -> Self {
        Self::fixed(Strategy::XPath, selector)
    }

    /// Locate by contained text
    #[must_use]
    pub const fn text(selector: &'static str) -> Self {
        Self::fixed(Strategy::Text, selector)
    }

    const fn fixed(strategy: Strategy, selector: &'static str) -> Self {
        Self {
            strategy,
            selector: Cow::Borrowed(selector),
        }
    }

    /// Build a locator from a selector computed at runtime
    #[must_use]
    pub fn dynamic(strategy: Strategy, selector: impl Into<String>) -> Self {
        Self {
            strategy,
            selector: Cow::Owned(selector.into()),
        }
    }

    /// Strategy of this locator
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Raw selector string
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// JavaScript expression evaluating to an array of all matches, in
    /// document order
    #[must_use]
    pub fn to_query_all(&self) -> String {
        let s = self.selector();
        match self.strategy {
            Strategy::Id => format!("[document.getElementById({s:?})].filter(Boolean)"),
            Strategy::Css => format!("Array.from(document.querySelectorAll({s:?}))"),
            Strategy::XPath => format!(
                "(() => {{ const r = document.evaluate({s:?}, document, null, \
                 XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); const out = []; \
                 for (let i = 0; i < r.snapshotLength; i++) {{ out.push(r.snapshotItem(i)); }} \
                 return out; }})()"
            ),
            Strategy::Text => format!(
                "Array.from(document.querySelectorAll('body *')).filter(el => \
                 el.children.length === 0 && el.textContent.includes({s:?}))"
            ),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy.prefix(), self.selector)
    }
}

/// XPath matching an element of `tag` whose text contains `text`
#[must_use]
pub fn xpath_containing_text(tag: &str, text: &str) -> Locator {
    Locator::dynamic(
        Strategy::XPath,
        format!("//{tag}[contains(text(), '{text}')]"),
    )
}

/// XPath matching an element of `tag` whose text equals `text`
#[must_use]
pub fn xpath_with_text(tag: &str, text: &str) -> Locator {
    Locator::dynamic(Strategy::XPath, format!("//{tag}[text()='{text}']"))
}
