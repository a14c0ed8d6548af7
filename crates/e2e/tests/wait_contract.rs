//! Wait primitive contract against the simulator
//!
//! Readiness waits return as soon as the condition holds, fail with
//! `ElementNotReady` no later than the timeout plus one poll, and say what
//! the last probe saw.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use emergent_e2e::constants::{TEST_PASSWORD, TEST_USERNAME};
use emergent_e2e::pages::{DashboardPage, LoginPage};
use emergent_e2e::sim::{SimFactory, SimTiming};
use emergent_e2e::{
    Driver, E2eError, Locator, Observation, Readiness, Session, Timeouts, Waiter, WaitOptions,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

const POLL: Duration = Duration::from_millis(10);

/// Poll interval long enough that any sleep would show up in elapsed time
const SLOW_POLL: Duration = Duration::from_millis(500);

fn session_polling(wait: Duration, poll: Duration) -> Session {
    let driver: Arc<dyn Driver> =
        Arc::new(SimFactory::with_timing(SimTiming::instant()).launch());
    Session::new(driver, Timeouts::uniform(wait, poll), "https://emergent.sh")
}

fn session(wait: Duration) -> Session {
    session_polling(wait, POLL)
}

async fn logged_in(wait: Duration) -> (Session, DashboardPage) {
    let session = session(wait);
    let login = LoginPage::new(session.clone());
    login.navigate_to().await.unwrap();
    let dashboard = login.login(TEST_USERNAME, TEST_PASSWORD).await.unwrap();
    (session, dashboard)
}

// ============================================================================
// Immediate success
// ============================================================================

#[tokio::test]
async fn test_ready_element_returns_without_sleeping() {
    let session = session_polling(Duration::from_secs(5), SLOW_POLL);
    session.navigate(&session.url("/login")).await.unwrap();

    let start = Instant::now();
    let element = session
        .wait_until_ready(&LoginPage::EMAIL_FIELD, Readiness::Clickable)
        .await
        .unwrap();
    assert!(start.elapsed() < SLOW_POLL / 2);
    assert_eq!(element.locator(), &LoginPage::EMAIL_FIELD);
}

#[tokio::test]
async fn test_zero_timeout_probes_once() {
    let session = session_polling(Duration::from_secs(5), SLOW_POLL);
    session.navigate(&session.url("/login")).await.unwrap();

    let ready = session
        .wait_until_ready_within(&LoginPage::PASSWORD_FIELD, Readiness::Visible, Duration::ZERO)
        .await;
    assert!(ready.is_ok());

    let start = Instant::now();
    let missing = session
        .wait_until_ready_within(&Locator::id("nope"), Readiness::Present, Duration::ZERO)
        .await;
    assert!(matches!(missing, Err(E2eError::ElementNotReady { .. })));
    assert!(start.elapsed() < SLOW_POLL / 2);
}

// ============================================================================
// Timeouts and diagnostics
// ============================================================================

#[tokio::test]
async fn test_missing_element_fails_within_bound() {
    let timeout = Duration::from_millis(120);
    let session = session(timeout);
    session.navigate(&session.url("/login")).await.unwrap();

    let start = Instant::now();
    let err = session
        .wait_until_ready(&Locator::css("div.does-not-exist"), Readiness::Present)
        .await
        .unwrap_err();
    let elapsed = start.elapsed();

    assert!(elapsed >= timeout);
    assert!(elapsed < timeout + POLL + Duration::from_millis(200));
    match err {
        E2eError::ElementNotReady {
            readiness,
            timeout_ms,
            last_observed,
            ..
        } => {
            assert_eq!(readiness, Readiness::Present);
            assert_eq!(timeout_ms, 120);
            assert_eq!(last_observed, Observation::NotFound);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_hidden_element_is_present_but_not_visible() {
    let (session, _dashboard) = logged_in(Duration::from_millis(60)).await;

    session
        .wait_until_ready(&DashboardPage::LOGOUT_OPTION, Readiness::Present)
        .await
        .unwrap();
    let err = session
        .wait_until_ready(&DashboardPage::LOGOUT_OPTION, Readiness::Visible)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        E2eError::ElementNotReady {
            last_observed: Observation::Hidden,
            ..
        }
    ));
    assert!(err.to_string().contains("hidden"));
}

#[tokio::test]
async fn test_opening_menu_makes_option_visible() {
    let (session, dashboard) = logged_in(Duration::from_secs(2)).await;
    dashboard.click_user_profile_menu().await.unwrap();
    session
        .wait_until_ready(&DashboardPage::LOGOUT_OPTION, Readiness::Clickable)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_waiter_uses_its_own_options() {
    let driver: Arc<dyn Driver> = Arc::new(SimFactory::new().launch());
    driver.navigate("https://emergent.sh/login").await.unwrap();
    let waiter = Waiter::with_options(
        driver,
        WaitOptions::new().with_timeout(40).with_poll_interval(5),
    );
    assert_eq!(waiter.options().timeout(), Duration::from_millis(40));

    let err = waiter
        .wait_until_ready(
            &Locator::id("missing"),
            Readiness::Visible,
            waiter.options().timeout(),
        )
        .await
        .unwrap_err();
    assert!(err.is_not_ready());
}

// ============================================================================
// Closed sessions
// ============================================================================

#[tokio::test]
async fn test_closed_session_error_propagates_immediately() {
    let session = session(Duration::from_secs(5));
    session.navigate(&session.url("/login")).await.unwrap();
    session.driver().quit().await.unwrap();

    let start = Instant::now();
    let err = session
        .wait_until_ready(&LoginPage::EMAIL_FIELD, Readiness::Present)
        .await
        .unwrap_err();
    assert!(matches!(err, E2eError::SessionClosed));
    assert!(start.elapsed() < Duration::from_secs(1));
}
