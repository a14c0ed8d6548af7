//! Page object behaviour against the simulated product
//!
//! Actions propagate failures and land on the screen their return type
//! names; queries never fail and fall back to `""`, `false` or `0`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use emergent_e2e::constants::{
    ERROR_DUPLICATE_PROJECT, ERROR_EMPTY_PROJECT_NAME, PROMPT_SIMPLE_WEB_APP, TEST_PASSWORD,
    TEST_USERNAME,
};
use emergent_e2e::pages::{
    DashboardPage, ForgotPasswordPage, HomePage, LoginPage, ProjectCreationPage,
    ProjectDetailsPage,
};
use emergent_e2e::sim::{SimFactory, SimTiming};
use emergent_e2e::{
    Driver, E2eError, Locator, Observation, PageObject, Readiness, Session, Timeouts,
};
use std::sync::Arc;
use std::time::Duration;

fn session() -> Session {
    let driver: Arc<dyn Driver> =
        Arc::new(SimFactory::with_timing(SimTiming::instant()).launch());
    Session::new(
        driver,
        Timeouts::uniform(Duration::from_millis(250), Duration::from_millis(5)),
        "https://emergent.sh",
    )
}

async fn dashboard(session: &Session) -> DashboardPage {
    let login = LoginPage::new(session.clone());
    login.navigate_to().await.unwrap();
    login.login(TEST_USERNAME, TEST_PASSWORD).await.unwrap()
}

async fn new_project(session: &Session, name: &str) -> ProjectDetailsPage {
    dashboard(session)
        .await
        .click_create_project()
        .await
        .unwrap()
        .create_project(name, "A project created by the page object tests", None)
        .await
        .unwrap()
}

// ============================================================================
// Navigation
// ============================================================================

#[tokio::test]
async fn test_valid_login_lands_on_dashboard() {
    let session = session();
    let dashboard = dashboard(&session).await;
    assert!(dashboard.is_loaded().await);
    assert!(dashboard.is_current().await);
    assert!(dashboard.is_user_logged_in().await);
}

#[tokio::test]
async fn test_chained_steps_equal_composite_login() {
    let chained = session();
    let login = LoginPage::new(chained.clone());
    let dashboard = login
        .navigate_to()
        .await
        .unwrap()
        .enter_email(TEST_USERNAME)
        .await
        .unwrap()
        .enter_password(TEST_PASSWORD)
        .await
        .unwrap()
        .click_login()
        .await
        .unwrap();

    let composite = session();
    let expected = self::dashboard(&composite).await;

    assert!(dashboard.is_loaded().await);
    assert_eq!(
        chained.current_url().await.unwrap(),
        composite.current_url().await.unwrap()
    );
    assert_eq!(dashboard.project_count().await, expected.project_count().await);
}

#[tokio::test]
async fn test_home_links_reach_login() {
    let session = session();
    let home = HomePage::new(session.clone());
    home.navigate_to().await.unwrap();
    assert!(home.is_login_link_displayed().await);
    let login = home.click_login().await.unwrap();
    assert!(login.is_loaded().await);
}

#[tokio::test]
async fn test_wrong_password_stays_on_login() {
    let session = session();
    let login = LoginPage::new(session);
    login.navigate_to().await.unwrap();
    login.enter_email(TEST_USERNAME).await.unwrap();
    login.enter_password("not-the-password").await.unwrap();
    login.click_login_expecting_error().await.unwrap();
    assert!(login.is_error_message_displayed().await);
    assert!(!login.error_message().await.is_empty());
    assert!(login.is_current().await);
}

#[tokio::test]
async fn test_forgot_password_links_back_to_login() {
    let session = session();
    let forgot = ForgotPasswordPage::new(session);
    forgot.navigate_to().await.unwrap();
    assert!(forgot.is_loaded().await);
    let login = forgot.click_back_to_login().await.unwrap();
    assert!(login.is_loaded().await);
}

#[tokio::test]
async fn test_element_script_helpers() {
    let session = session();
    let login = LoginPage::new(session.clone());
    login.navigate_to().await.unwrap();
    login.enter_email(TEST_USERNAME).await.unwrap();
    login.enter_password(TEST_PASSWORD).await.unwrap();

    let button = session
        .wait_until_ready(&LoginPage::LOGIN_BUTTON, Readiness::Clickable)
        .await
        .unwrap();
    button.scroll_into_view().await.unwrap();
    button.js_click().await.unwrap();

    assert!(DashboardPage::new(session.clone()).is_loaded().await);
    assert!(button.js_click().await.is_err());
}

// ============================================================================
// Project creation
// ============================================================================

#[tokio::test]
async fn test_empty_project_name_shows_error() {
    let session = session();
    let creation = dashboard(&session).await.click_create_project().await.unwrap();
    creation.enter_project_name("").await.unwrap();
    creation.click_create_expecting_error().await.unwrap();

    assert!(creation.is_error_message_displayed().await);
    assert!(creation.error_message().await.contains(ERROR_EMPTY_PROJECT_NAME));
}

#[tokio::test]
async fn test_duplicate_project_name_is_rejected() {
    let session = session();
    new_project(&session, "Test Project").await;

    let creation = dashboard(&session).await.click_create_project().await.unwrap();
    creation.enter_project_name("Test Project").await.unwrap();
    creation.click_create_expecting_error().await.unwrap();

    let message = creation.error_message().await;
    assert!(!message.is_empty());
    assert!(message.contains(ERROR_DUPLICATE_PROJECT));
    assert!(creation.is_current().await);
    assert!(!ProjectDetailsPage::new(session).is_loaded().await);
}

#[tokio::test]
async fn test_search_narrows_project_list() {
    let session = session();
    new_project(&session, "Alpha Search").await;
    new_project(&session, "Beta Search").await;

    let dashboard = dashboard(&session).await;
    assert!(dashboard.is_project_in_list("Alpha Search").await);
    assert!(dashboard.is_project_in_list("Beta Search").await);

    dashboard.search_project("alpha").await.unwrap();
    assert!(dashboard.is_project_in_list("Alpha Search").await);
    assert!(!dashboard.is_project_in_list("Beta Search").await);
}

#[tokio::test]
async fn test_cancel_returns_to_dashboard() {
    let session = session();
    let creation = dashboard(&session).await.click_create_project().await.unwrap();
    assert!(creation.is_loaded().await);
    let dashboard = creation.click_cancel().await.unwrap();
    assert!(dashboard.is_loaded().await);
    assert!(!ProjectCreationPage::new(session).is_current().await);
}

// ============================================================================
// Project details
// ============================================================================

#[tokio::test]
async fn test_prompt_yields_response_and_code() {
    let session = session();
    let details = new_project(&session, "Prompted Project").await;
    details.send_prompt(PROMPT_SIMPLE_WEB_APP).await.unwrap();

    let response = details.wait_for_ai_response().await.unwrap();
    assert!(!response.is_empty());
    assert!(details.is_code_preview_displayed().await);
    assert!(!details.code_preview().await.is_empty());
}

#[tokio::test]
async fn test_queries_are_idempotent() {
    let session = session();
    let details = new_project(&session, "Idempotent Project").await;
    let first = details.project_title().await;
    let second = details.project_title().await;
    assert_eq!(first, "Idempotent Project");
    assert_eq!(first, second);
}

// ============================================================================
// Query tier
// ============================================================================

#[tokio::test]
async fn test_queries_default_on_closed_session() {
    let session = session();
    let details = new_project(&session, "Closed Project").await;
    let dashboard = DashboardPage::new(session.clone());
    session.driver().quit().await.unwrap();

    assert_eq!(details.project_title().await, "");
    assert_eq!(details.ai_response().await, "");
    assert!(!details.is_prompt_input_displayed().await);
    assert_eq!(dashboard.project_count().await, 0);
    assert!(!dashboard.is_loaded().await);
    assert!(!dashboard.is_current().await);
}

#[tokio::test]
async fn test_queries_default_when_element_never_appears() {
    let session = session();
    session.navigate_to_base_url().await.unwrap();
    let details = ProjectDetailsPage::new(session.clone());

    assert_eq!(details.project_title().await, "");
    assert_eq!(details.ai_response().await, "");
    assert!(!details.is_prompt_input_displayed().await);
    assert!(!details.is_code_preview_displayed().await);
    assert!(!details.is_loaded().await);

    let missing = Locator::id("no-such-element");
    let err = session
        .wait_until_ready_within(&missing, Readiness::Visible, Duration::from_millis(50))
        .await
        .unwrap_err();
    match err {
        E2eError::ElementNotReady {
            locator,
            last_observed,
            ..
        } => {
            assert_eq!(locator, missing);
            assert_eq!(last_observed, Observation::NotFound);
        }
        other => panic!("expected ElementNotReady, got {other}"),
    }
    assert!(HomePage::new(session.clone()).is_loaded().await);
}

#[tokio::test]
async fn test_actions_propagate_on_closed_session() {
    let session = session();
    let login = LoginPage::new(session.clone());
    session.driver().quit().await.unwrap();
    assert!(login.navigate_to().await.is_err());
    assert!(login.enter_email(TEST_USERNAME).await.is_err());
}
