//! Email/password login screen.

use super::{DashboardPage, ForgotPasswordPage, SignUpPage};
use crate::constants;
use crate::locator::Locator;
use crate::page_object::PageObject;
use crate::result::E2eResult;
use crate::session::Session;
use async_trait::async_trait;

/// Login form
#[derive(Debug, Clone)]
pub struct LoginPage {
    session: Session,
}

impl LoginPage {
    pub const EMAIL_FIELD: Locator = Locator::id("email");
    pub const PASSWORD_FIELD: Locator = Locator::id("password");
    pub const LOGIN_BUTTON: Locator = Locator::xpath("//button[contains(text(), 'Log in')]");
    pub const ERROR_MESSAGE: Locator = Locator::xpath("//div[contains(@class, 'error-message')]");
    pub const SIGN_UP_LINK: Locator = Locator::xpath("//a[contains(text(), 'Sign up')]");
    pub const FORGOT_PASSWORD_LINK: Locator =
        Locator::xpath("//a[contains(text(), 'Forgot Password')]");

    const DEFINING: &'static [Locator] =
        &[Self::EMAIL_FIELD, Self::PASSWORD_FIELD, Self::LOGIN_BUTTON];

    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub async fn navigate_to(&self) -> E2eResult<&Self> {
        tracing::info!("Navigating to login page");
        self.session
            .navigate(&self.session.url(constants::LOGIN_PATH))
            .await?;
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

    /// Submit the form, expecting to land on the dashboard
    pub async fn click_login(&self) -> E2eResult<DashboardPage> {
        tracing::info!("Clicking on login button");
        self.click(&Self::LOGIN_BUTTON).await?;
        Ok(DashboardPage::new(self.session.clone()))
    }

    /// Submit the form and wait for the validation error to show
    pub async fn click_login_expecting_error(&self) -> E2eResult<&Self> {
        tracing::info!("Clicking on login button expecting an error");
        self.click(&Self::LOGIN_BUTTON).await?;
        self.wait_visible(&Self::ERROR_MESSAGE).await?;
        Ok(self)
    }

    pub async fn login(&self, email: &str, password: &str) -> E2eResult<DashboardPage> {
        tracing::info!(email, "Logging in");
        self.enter_email(email).await?;
        self.enter_password(password).await?;
        self.click_login().await
    }

    pub async fn click_sign_up(&self) -> E2eResult<SignUpPage> {
        tracing::info!("Clicking on sign up link");
        self.click(&Self::SIGN_UP_LINK).await?;
        Ok(SignUpPage::new(self.session.clone()))
    }

    pub async fn click_forgot_password(&self) -> E2eResult<ForgotPasswordPage> {
        tracing::info!("Clicking on forgot password link");
        self.click(&Self::FORGOT_PASSWORD_LINK).await?;
        Ok(ForgotPasswordPage::new(self.session.clone()))
    }

    pub async fn error_message(&self) -> String {
        self.query_text(&Self::ERROR_MESSAGE).await
    }

    pub async fn is_error_message_displayed(&self) -> bool {
        self.query_displayed(&Self::ERROR_MESSAGE).await
    }
}

#[async_trait]
impl PageObject for LoginPage {
    fn session(&self) -> &Session {
        &self.session
    }

    fn page_name(&self) -> &'static str {
        "login"
    }

    fn url_pattern(&self) -> &'static str {
        constants::LOGIN_PATH
    }

    fn defining_locators(&self) -> &'static [Locator] {
        Self::DEFINING
    }
}
