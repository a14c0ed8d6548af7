//! Landing screen.

use super::{ForgotPasswordPage, LoginPage, SignUpPage};
use crate::locator::Locator;
use crate::page_object::PageObject;
use crate::result::E2eResult;
use crate::session::Session;
use async_trait::async_trait;

/// Public landing page at the product root
#[derive(Debug, Clone)]
pub struct HomePage {
    session: Session,
}

impl HomePage {
    pub const SIGN_UP_LINK: Locator =
        Locator::xpath("//a[contains(text(), \"Don't have an account\")]");
    pub const LOGIN_LINK: Locator = Locator::xpath("//a[contains(text(), 'Log in with email')]");
    pub const FORGOT_PASSWORD_LINK: Locator =
        Locator::xpath("//a[contains(text(), 'Forgot Password')]");

    const DEFINING: &'static [Locator] = &[Self::SIGN_UP_LINK, Self::LOGIN_LINK];

    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Open the product root
    pub async fn navigate_to(&self) -> E2eResult<&Self> {
        tracing::info!("Navigating to home page");
        self.session.navigate_to_base_url().await?;
        Ok(self)
    }

    pub async fn click_login(&self) -> E2eResult<LoginPage> {
        tracing::info!("Clicking on login link");
        self.click(&Self::LOGIN_LINK).await?;
        Ok(LoginPage::new(self.session.clone()))
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

    pub async fn is_login_link_displayed(&self) -> bool {
        self.query_displayed(&Self::LOGIN_LINK).await
    }
}

#[async_trait]
impl PageObject for HomePage {
    fn session(&self) -> &Session {
        &self.session
    }

    fn page_name(&self) -> &'static str {
        "home"
    }

    fn url_pattern(&self) -> &'static str {
        "/"
    }

    fn defining_locators(&self) -> &'static [Locator] {
        Self::DEFINING
    }
}
