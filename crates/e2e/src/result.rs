//! Result and error types for the suite.

use crate::locator::Locator;
use crate::wait::{Observation, Readiness};
use thiserror::Error;

/// Result type for suite operations
pub type E2eResult<T> = Result<T, E2eError>;

/// Errors that can occur while driving the product UI
#[derive(Debug, Error)]
pub enum E2eError {
    /// An element never satisfied its readiness condition in time
    #[error("Element {locator} not {readiness} after {timeout_ms}ms (last seen: {last_observed})")]
    ElementNotReady {
        /// Locator that was waited on
        locator: Locator,
        /// Readiness kind that was required
        readiness: Readiness,
        /// Timeout in milliseconds
        timeout_ms: u64,
        /// What the final probe saw
        last_observed: Observation,
    },

    /// A page-level condition did not hold in time
    #[error("Timed out after {timeout_ms}ms waiting for {waited_for}")]
    WaitTimeout {
        /// Description of the condition
        waited_for: String,
        /// Timeout in milliseconds
        timeout_ms: u64,
    },

    /// Element handle no longer refers to a live DOM node
    #[error("Stale element reference: {id}")]
    StaleElement {
        /// Driver-scoped element id
        id: String,
    },

    /// The browser session has already been closed
    #[error("Browser session is closed")]
    SessionClosed,

    /// Element interaction failed
    #[error("Interaction failed: {message}")]
    Interaction {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Script execution error
    #[error("Script execution failed: {message}")]
    Script {
        /// Error message
        message: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Browser kind has no driver backend in this build
    #[error("Browser '{browser}' is not supported: {message}")]
    UnsupportedBrowser {
        /// Browser name
        browser: String,
        /// Error message
        message: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Invalid state error (operation called in wrong state)
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Error message
        message: String,
    },

    /// Scenario assertion failed
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Report writing error
    #[error("Report error: {message}")]
    Report {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl E2eError {
    /// Create an interaction error
    #[must_use]
    pub fn interaction(message: impl Into<String>) -> Self {
        Self::Interaction {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid state error
    #[must_use]
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Create an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Whether a wait loop may keep polling after this error
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::StaleElement { .. })
    }

    /// Whether this is a readiness timeout
    #[must_use]
    pub const fn is_not_ready(&self) -> bool {
        matches!(self, Self::ElementNotReady { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_ready_message_names_locator_and_kind() {
        let err = E2eError::ElementNotReady {
            locator: Locator::id("email"),
            readiness: Readiness::Clickable,
            timeout_ms: 250,
            last_observed: Observation::Hidden,
        };
        let msg = err.to_string();
        assert!(msg.contains("id=email"));
        assert!(msg.contains("clickable"));
        assert!(msg.contains("250ms"));
        assert!(msg.contains("hidden"));
        assert!(err.is_not_ready());
        assert!(!err.is_transient());
    }

    #[test]
    fn test_stale_is_transient() {
        let err = E2eError::StaleElement { id: "3:7".into() };
        assert!(err.is_transient());
        assert!(!E2eError::SessionClosed.is_transient());
    }

    #[test]
    fn test_constructors() {
        assert!(matches!(
            E2eError::config("bad"),
            E2eError::Config { message } if message == "bad"
        ));
        assert!(matches!(
            E2eError::assertion("nope"),
            E2eError::AssertionFailed { .. }
        ));
    }
}
