//! Account registration screen.

use super::{DashboardPage, LoginPage};
use crate::constants;
use crate::locator::Locator;
use crate::page_object::PageObject;
use crate::result::E2eResult;
use crate::session::Session;
use crate::wait::Readiness;
use async_trait::async_trait;

/// Sign-up form
#[derive(Debug, Clone)]
pub struct SignUpPage {
    session: Session,
}

impl SignUpPage {
    pub const NAME_FIELD: Locator = Locator::id("name");
    pub const EMAIL_FIELD: Locator = Locator::id("email");
    pub const PASSWORD_FIELD: Locator = Locator::id("password");
    pub const CONFIRM_PASSWORD_FIELD: Locator = Locator::id("confirmPassword");
    pub const SIGN_UP_BUTTON: Locator = Locator::xpath("//button[contains(text(), 'Sign up')]");
    pub const ERROR_MESSAGE: Locator = Locator::xpath("//div[contains(@class, 'error-message')]");
    pub const LOGIN_LINK: Locator = Locator::xpath("//a[contains(text(), 'Log in')]");
    pub const TERMS_CHECKBOX: Locator = Locator::xpath("//input[@type='checkbox']");

    const DEFINING: &'static [Locator] = &[
        Self::NAME_FIELD,
        Self::EMAIL_FIELD,
        Self::PASSWORD_FIELD,
        Self::CONFIRM_PASSWORD_FIELD,
        Self::SIGN_UP_BUTTON,
    ];

    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub async fn navigate_to(&self) -> E2eResult<&Self> {
        tracing::info!("Navigating to sign up page");
        self.session
            .navigate(&self.session.url(constants::SIGNUP_PATH))
            .await?;
        Ok(self)
    }

    pub async fn enter_name(&self, name: &str) -> E2eResult<&Self> {
        tracing::info!(name, "Entering name");
        self.type_text(&Self::NAME_FIELD, name).await?;
        Ok(self)
    }

    pub async fn enter_email(&self, email: &str) -> E2eResult<&Self> {
        tracing::info!(email, "Entering email");
        self.type_text(&Self::EMAIL_FIELD, email).await?;
        Ok(self)
    }

    pub async fn enter_password(&self, password: &str) -> E2eResult<&Self> {
        tracing::info!("Entering password");
        self.type_text(&Self::PASSWORD_FIELD, password).await?;
        Ok(self)
    }

    pub async fn enter_confirm_password(&self, password: &str) -> E2eResult<&Self> {
        tracing::info!("Entering confirm password");
        self.type_text(&Self::CONFIRM_PASSWORD_FIELD, password).await?;
        Ok(self)
    }

    /// Tick the terms checkbox unless it already is
    pub async fn check_terms(&self) -> E2eResult<&Self> {
        tracing::info!("Checking terms and conditions");
        let checkbox = self
            .session
            .wait_until_ready(&Self::TERMS_CHECKBOX, Readiness::Clickable)
            .await?;
        let checked = checkbox.attribute("checked").await?;
        if !matches!(checked.as_deref(), Some("true" | "checked")) {
            checkbox.click().await?;
        }
        Ok(self)
    }

    pub async fn click_sign_up(&self) -> E2eResult<DashboardPage> {
        tracing::info!("Clicking on sign up button");
        self.click(&Self::SIGN_UP_BUTTON).await?;
        Ok(DashboardPage::new(self.session.clone()))
    }

    /// Submit the form and wait for the validation error to show
    pub async fn click_sign_up_expecting_error(&self) -> E2eResult<&Self> {
        tracing::info!("Clicking on sign up button expecting an error");
        self.click(&Self::SIGN_UP_BUTTON).await?;
        self.wait_visible(&Self::ERROR_MESSAGE).await?;
        Ok(self)
    }

    pub async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> E2eResult<DashboardPage> {
        tracing::info!(email, "Signing up");
        self.enter_name(name).await?;
        self.enter_email(email).await?;
        self.enter_password(password).await?;
        self.enter_confirm_password(confirm_password).await?;
        self.check_terms().await?;
        self.click_sign_up().await
    }

    pub async fn click_login(&self) -> E2eResult<LoginPage> {
        tracing::info!("Clicking on login link");
        self.click(&Self::LOGIN_LINK).await?;
        Ok(LoginPage::new(self.session.clone()))
    }

    pub async fn error_message(&self) -> String {
        self.query_text(&Self::ERROR_MESSAGE).await
    }

    pub async fn is_error_message_displayed(&self) -> bool {
        self.query_displayed(&Self::ERROR_MESSAGE).await
    }
}

#[async_trait]
impl PageObject for SignUpPage {
    fn session(&self) -> &Session {
        &self.session
    }

    fn page_name(&self) -> &'static str {
        "sign-up"
    }

    fn url_pattern(&self) -> &'static str {
        constants::SIGNUP_PATH
    }

    fn defining_locators(&self) -> &'static [Locator] {
        Self::DEFINING
    }
}
