//! Password reset request screen.

use super::LoginPage;
use crate::constants;
use crate::locator::Locator;
use crate::page_object::PageObject;
use crate::result::E2eResult;
use crate::session::Session;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct ForgotPasswordPage {
    session: Session,
}

impl ForgotPasswordPage {
    pub const EMAIL_FIELD: Locator = Locator::id("email");
    pub const RESET_PASSWORD_BUTTON: Locator =
        Locator::xpath("//button[contains(text(), 'Reset Password')]");
    pub const SUCCESS_MESSAGE: Locator =
        Locator::xpath("//div[contains(@class, 'success-message')]");
    pub const ERROR_MESSAGE: Locator = Locator::xpath("//div[contains(@class, 'error-message')]");
    pub const BACK_TO_LOGIN_LINK: Locator =
        Locator::xpath("//a[contains(text(), 'Back to Login')]");
    pub const TITLE: Locator = Locator::xpath("//h1[contains(text(), 'Forgot Password')]");

    const DEFINING: &'static [Locator] =
        &[Self::TITLE, Self::EMAIL_FIELD, Self::RESET_PASSWORD_BUTTON];

    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub async fn navigate_to(&self) -> E2eResult<&Self> {
        tracing::info!("Navigating to forgot password page");
        self.session
            .navigate(&self.session.url(constants::FORGOT_PASSWORD_PATH))
            .await?;
        Ok(self)
    }

    pub async fn enter_email(&self, email: &str) -> E2eResult<&Self> {
        tracing::info!(email, "Entering email");
        self.type_text(&Self::EMAIL_FIELD, email).await?;
        Ok(self)
    }

    pub async fn click_reset_password(&self) -> E2eResult<&Self> {
        tracing::info!("Clicking on reset password button");
        self.click(&Self::RESET_PASSWORD_BUTTON).await?;
        Ok(self)
    }

    pub async fn reset_password(&self, email: &str) -> E2eResult<&Self> {
        tracing::info!(email, "Requesting password reset");
        self.enter_email(email).await?;
        self.click_reset_password().await
    }

    pub async fn click_back_to_login(&self) -> E2eResult<LoginPage> {
        tracing::info!("Clicking on back to login link");
        self.click(&Self::BACK_TO_LOGIN_LINK).await?;
        Ok(LoginPage::new(self.session.clone()))
    }

    pub async fn success_message(&self) -> String {
        self.query_text(&Self::SUCCESS_MESSAGE).await
    }

    pub async fn error_message(&self) -> String {
        self.query_text(&Self::ERROR_MESSAGE).await
    }

    pub async fn is_success_message_displayed(&self) -> bool {
        self.query_displayed(&Self::SUCCESS_MESSAGE).await
    }
}

#[async_trait]
impl PageObject for ForgotPasswordPage {
    fn session(&self) -> &Session {
        &self.session
    }

    fn page_name(&self) -> &'static str {
        "forgot-password"
    }

    fn url_pattern(&self) -> &'static str {
        constants::FORGOT_PASSWORD_PATH
    }

    fn defining_locators(&self) -> &'static [Locator] {
        Self::DEFINING
    }
}
