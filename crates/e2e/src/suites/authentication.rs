//! Login, sign-up, password reset and logout.

use super::row_name;
use crate::assertion::{ensure_contains, ensure_not_empty};
use crate::constants::{ERROR_PASSWORD_MISMATCH, SUCCESS_PASSWORD_RESET, TEST_USERNAME};
use crate::data::{LoginCredentials, SignUpCredentials, LOGIN_CREDENTIALS, SIGNUP_CREDENTIALS};
use crate::ensure;
use crate::generator;
use crate::page_object::PageObject;
use crate::pages::SignUpPage;
use crate::result::E2eResult;
use crate::scenario::{Scenario, ScenarioContext, ScenarioGroup};

pub const FEATURE: &str = "authentication";

#[must_use]
pub fn group() -> ScenarioGroup {
    let login_rows = LOGIN_CREDENTIALS.iter().enumerate().map(|(i, row)| {
        Scenario::new(row_name("login_with_credentials", i), move |ctx| {
            Box::pin(login_with_credentials(ctx, *row))
        })
        .with_description("Test login with various credentials")
    });
    let sign_up_rows = SIGNUP_CREDENTIALS
        .iter()
        .enumerate()
        .filter(|(_, row)| !row.expected_success)
        .map(|(i, row)| {
            Scenario::new(row_name("sign_up_with_invalid_data", i), move |ctx| {
                Box::pin(sign_up_with_invalid_data(ctx, *row))
            })
            .with_description("Test sign-up validation errors")
        });

    ScenarioGroup::new(FEATURE)
        .with_scenario(
            Scenario::new("successful_login", |ctx| Box::pin(successful_login(ctx)))
                .with_description("Test successful login with valid credentials"),
        )
        .with_scenarios(login_rows)
        .with_scenario(
            Scenario::new("successful_sign_up", |ctx| Box::pin(successful_sign_up(ctx)))
                .with_description("Test successful sign-up with valid information"),
        )
        .with_scenario(
            Scenario::new("sign_up_with_existing_email", |ctx| {
                Box::pin(sign_up_with_existing_email(ctx))
            })
            .with_description("Test sign-up with existing email"),
        )
        .with_scenario(
            Scenario::new("sign_up_with_password_mismatch", |ctx| {
                Box::pin(sign_up_with_password_mismatch(ctx))
            })
            .with_description("Test sign-up with password mismatch"),
        )
        .with_scenarios(sign_up_rows)
        .with_scenario(
            Scenario::new("forgot_password", |ctx| Box::pin(forgot_password(ctx)))
                .with_description("Test forgot password functionality"),
        )
        .with_scenario(
            Scenario::new("logout", |ctx| Box::pin(logout(ctx)))
                .with_description("Test logout functionality"),
        )
}

async fn successful_login(ctx: &ScenarioContext) -> E2eResult<()> {
    let login = ctx.home_page().click_login().await?;
    ensure!(login.is_loaded().await, "Login page did not load");

    let dashboard = login
        .login(&ctx.config().test_username, &ctx.config().test_password)
        .await?;
    ensure!(dashboard.is_loaded().await, "Dashboard page did not load after login");
    ensure!(dashboard.is_user_logged_in().await, "User is not logged in");
    Ok(())
}

async fn login_with_credentials(ctx: &ScenarioContext, row: LoginCredentials) -> E2eResult<()> {
    ctx.report().info(&format!(
        "Logging in as '{}', expecting success: {}",
        row.email, row.expected_success
    ));
    let login = ctx.login_page();
    login.navigate_to().await?;
    login.enter_email(row.email).await?;
    login.enter_password(row.password).await?;

    if row.expected_success {
        let dashboard = login.click_login().await?;
        ensure!(dashboard.is_loaded().await, "Dashboard page did not load after login");
    } else {
        login.click_login_expecting_error().await?;
        ensure!(
            login.is_error_message_displayed().await,
            "Error message not displayed for invalid credentials"
        );
        let message = login.error_message().await;
        ctx.report().info(&format!("Error message displayed: {message}"));
        ensure_not_empty(&message, "Error message")?;
    }
    Ok(())
}

async fn fill_sign_up_form(
    page: &SignUpPage,
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> E2eResult<()> {
    page.enter_name(name).await?;
    page.enter_email(email).await?;
    page.enter_password(password).await?;
    page.enter_confirm_password(confirm_password).await?;
    page.check_terms().await?;
    Ok(())
}

async fn successful_sign_up(ctx: &ScenarioContext) -> E2eResult<()> {
    let sign_up = ctx.home_page().click_sign_up().await?;
    ensure!(sign_up.is_loaded().await, "Sign-up page did not load");

    let name = generator::random_name();
    let email = generator::random_email();
    let password = generator::random_password();
    ctx.report().info(&format!("Signing up as {name} <{email}>"));

    let dashboard = sign_up.sign_up(&name, &email, &password, &password).await?;
    ensure!(dashboard.is_loaded().await, "Dashboard page did not load after sign-up");
    ensure!(dashboard.is_user_logged_in().await, "User is not logged in after sign-up");
    Ok(())
}

async fn sign_up_with_existing_email(ctx: &ScenarioContext) -> E2eResult<()> {
    let sign_up = ctx.signup_page();
    sign_up.navigate_to().await?;
    ensure!(sign_up.is_loaded().await, "Sign-up page did not load");

    let password = generator::random_password();
    fill_sign_up_form(&sign_up, &generator::random_name(), TEST_USERNAME, &password, &password)
        .await?;
    sign_up.click_sign_up_expecting_error().await?;

    ensure!(
        sign_up.is_error_message_displayed().await,
        "Error message not displayed for existing email"
    );
    ensure_not_empty(&sign_up.error_message().await, "Error message")
}

async fn sign_up_with_password_mismatch(ctx: &ScenarioContext) -> E2eResult<()> {
    let sign_up = ctx.signup_page();
    sign_up.navigate_to().await?;
    ensure!(sign_up.is_loaded().await, "Sign-up page did not load");

    let password = generator::random_password();
    let confirm = format!("{password}x");
    fill_sign_up_form(
        &sign_up,
        &generator::random_name(),
        &generator::random_email(),
        &password,
        &confirm,
    )
    .await?;
    sign_up.click_sign_up_expecting_error().await?;

    ensure!(
        sign_up.is_error_message_displayed().await,
        "Error message not displayed for password mismatch"
    );
    ensure_contains(
        &sign_up.error_message().await,
        ERROR_PASSWORD_MISMATCH,
        "Error message",
    )
}

async fn sign_up_with_invalid_data(ctx: &ScenarioContext, row: SignUpCredentials) -> E2eResult<()> {
    ctx.report().info(&format!(
        "Signing up with name '{}' and email '{}'",
        row.name, row.email
    ));
    let sign_up = ctx.signup_page();
    sign_up.navigate_to().await?;
    fill_sign_up_form(&sign_up, row.name, row.email, row.password, row.confirm_password).await?;
    sign_up.click_sign_up_expecting_error().await?;

    let message = sign_up.error_message().await;
    ctx.report().info(&format!("Error message displayed: {message}"));
    ensure_not_empty(&message, "Error message")
}

async fn forgot_password(ctx: &ScenarioContext) -> E2eResult<()> {
    let forgot = ctx.home_page().click_forgot_password().await?;
    ensure!(forgot.is_loaded().await, "Forgot password page did not load");

    forgot.reset_password(TEST_USERNAME).await?;
    ensure!(
        forgot.is_success_message_displayed().await,
        "Success message not displayed after password reset request"
    );
    ensure_contains(
        &forgot.success_message().await,
        SUCCESS_PASSWORD_RESET,
        "Success message",
    )
}

async fn logout(ctx: &ScenarioContext) -> E2eResult<()> {
    let dashboard = ctx.login_with_default_credentials().await?;
    ensure!(dashboard.is_loaded().await, "Dashboard page did not load after login");

    let home = dashboard.logout().await?;
    ensure!(home.is_loaded().await, "Home page did not load after logout");
    ensure!(
        home.is_login_link_displayed().await,
        "Login link not displayed after logout"
    );
    Ok(())
}
