//! Assertions for scenario bodies.
//!
//! Every helper returns `E2eResult<()>` so a scenario stops at the first
//! failed check with [`E2eError::AssertionFailed`], which the runner records
//! like any other failure.

use crate::result::{E2eError, E2eResult};
use std::fmt::Debug;

/// Fail the scenario unless `cond` holds
///
/// ```ignore
/// ensure!(dashboard.is_loaded().await, "dashboard did not load");
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::E2eError::assertion(format!($($arg)+)));
        }
    };
}

/// Assert two values are equal
pub fn ensure_eq<T: PartialEq + Debug + ?Sized>(
    expected: &T,
    actual: &T,
    what: &str,
) -> E2eResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(E2eError::assertion(format!(
            "{what}: expected {expected:?}, got {actual:?}"
        )))
    }
}

/// Assert a string contains a substring
pub fn ensure_contains(haystack: &str, needle: &str, what: &str) -> E2eResult<()> {
    if haystack.contains(needle) {
        Ok(())
    } else {
        Err(E2eError::assertion(format!(
            "{what}: expected '{haystack}' to contain '{needle}'"
        )))
    }
}

/// Assert a string contains at least one of `needles`, ignoring case
pub fn ensure_contains_any(haystack: &str, needles: &[&str], what: &str) -> E2eResult<()> {
    let lower = haystack.to_lowercase();
    if needles.iter().any(|n| lower.contains(&n.to_lowercase())) {
        Ok(())
    } else {
        Err(E2eError::assertion(format!(
            "{what}: expected one of {needles:?} in '{haystack}'"
        )))
    }
}

/// Assert a string is not blank
pub fn ensure_not_empty(value: &str, what: &str) -> E2eResult<()> {
    if value.trim().is_empty() {
        Err(E2eError::assertion(format!("{what} is empty")))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guarded(flag: bool) -> E2eResult<u8> {
        ensure!(flag, "flag was {}", flag);
        Ok(1)
    }

    #[test]
    fn test_ensure_macro() {
        assert_eq!(guarded(true).unwrap(), 1);
        let err = guarded(false).unwrap_err();
        assert_eq!(err.to_string(), "Assertion failed: flag was false");
    }

    #[test]
    fn test_equality() {
        assert!(ensure_eq("a", "a", "title").is_ok());
        let err = ensure_eq(&1, &2, "count").unwrap_err();
        assert!(err.to_string().contains("count: expected 1, got 2"));
    }

    #[test]
    fn test_contains_variants() {
        assert!(ensure_contains("Deploying to Staging", "Staging", "status").is_ok());
        assert!(ensure_contains("abc", "z", "x").is_err());
        assert!(ensure_contains_any("CREATE TABLE users", &["create table"], "code").is_ok());
        assert!(ensure_contains_any("<div>", &["react", "usestate"], "code").is_err());
    }

    #[test]
    fn test_not_empty() {
        assert!(ensure_not_empty("  ", "response").is_err());
        assert!(ensure_not_empty("ok", "response").is_ok());
    }
}
