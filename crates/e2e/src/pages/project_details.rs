//! Project workspace: prompt the AI agent and inspect generated code.

use super::{DashboardPage, DeploymentPage, ProjectSettingsPage, TestingPage};
use crate::locator::Locator;
use crate::page_object::PageObject;
use crate::result::E2eResult;
use crate::session::Session;
use crate::wait::Readiness;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct ProjectDetailsPage {
    session: Session,
}

impl ProjectDetailsPage {
    pub const PROJECT_TITLE: Locator = Locator::xpath("//h1[@class='project-title']");
    pub const PROJECT_DESCRIPTION: Locator =
        Locator::xpath("//div[@class='project-description']");
    pub const BACK_TO_DASHBOARD_BUTTON: Locator =
        Locator::xpath("//button[contains(text(), 'Back to Dashboard')]");
    pub const PROMPT_INPUT: Locator =
        Locator::xpath("//textarea[@placeholder='Enter your prompt here']");
    pub const SEND_PROMPT_BUTTON: Locator = Locator::xpath("//button[contains(text(), 'Send')]");
    pub const AI_RESPONSE: Locator = Locator::xpath("//div[contains(@class, 'ai-response')]");
    pub const ERROR_MESSAGE: Locator = Locator::xpath("//div[contains(@class, 'error-message')]");
    pub const CODE_PREVIEW: Locator = Locator::xpath("//div[contains(@class, 'code-preview')]");
    pub const DEPLOY_BUTTON: Locator = Locator::xpath("//button[contains(text(), 'Deploy')]");
    pub const TEST_BUTTON: Locator = Locator::xpath("//button[contains(text(), 'Test')]");
    pub const SETTINGS_BUTTON: Locator = Locator::xpath("//button[contains(text(), 'Settings')]");

    const DEFINING: &'static [Locator] = &[
        Self::PROJECT_TITLE,
        Self::PROMPT_INPUT,
        Self::SEND_PROMPT_BUTTON,
    ];

    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub async fn click_back_to_dashboard(&self) -> E2eResult<DashboardPage> {
        tracing::info!("Clicking on back to dashboard button");
        self.click(&Self::BACK_TO_DASHBOARD_BUTTON).await?;
        Ok(DashboardPage::new(self.session.clone()))
    }

    pub async fn enter_prompt(&self, prompt: &str) -> E2eResult<&Self> {
        tracing::info!(prompt, "Entering prompt");
        self.type_text(&Self::PROMPT_INPUT, prompt).await?;
        Ok(self)
    }

    pub async fn click_send_prompt(&self) -> E2eResult<&Self> {
        tracing::info!("Clicking on send prompt button");
        self.click(&Self::SEND_PROMPT_BUTTON).await?;
        Ok(self)
    }

    pub async fn send_prompt(&self, prompt: &str) -> E2eResult<&Self> {
        tracing::info!(prompt, "Sending prompt");
        self.enter_prompt(prompt).await?;
        self.click_send_prompt().await
    }

    /// Wait (long timeout) for the agent's answer and return its text
    pub async fn wait_for_ai_response(&self) -> E2eResult<String> {
        tracing::info!("Waiting for AI response");
        self.session
            .wait_until_ready_within(
                &Self::AI_RESPONSE,
                Readiness::Visible,
                self.session.timeouts().long_wait,
            )
            .await?
            .text()
            .await
    }

    pub async fn click_deploy(&self) -> E2eResult<DeploymentPage> {
        tracing::info!("Clicking on deploy button");
        self.click(&Self::DEPLOY_BUTTON).await?;
        Ok(DeploymentPage::new(self.session.clone()))
    }

    pub async fn click_test(&self) -> E2eResult<TestingPage> {
        tracing::info!("Clicking on test button");
        self.click(&Self::TEST_BUTTON).await?;
        Ok(TestingPage::new(self.session.clone()))
    }

    pub async fn click_settings(&self) -> E2eResult<ProjectSettingsPage> {
        tracing::info!("Clicking on settings button");
        self.click(&Self::SETTINGS_BUTTON).await?;
        Ok(ProjectSettingsPage::new(self.session.clone()))
    }

    pub async fn wait_for_page_to_load(&self) -> E2eResult<&Self> {
        tracing::info!("Waiting for project details page to load completely");
        for locator in Self::DEFINING {
            self.session
                .wait_until_ready(locator, Readiness::Clickable)
                .await?;
        }
        Ok(self)
    }

    pub async fn project_title(&self) -> String {
        self.query_text(&Self::PROJECT_TITLE).await
    }

    pub async fn project_description(&self) -> String {
        self.query_text(&Self::PROJECT_DESCRIPTION).await
    }

    pub async fn ai_response(&self) -> String {
        self.query_text(&Self::AI_RESPONSE).await
    }

    pub async fn code_preview(&self) -> String {
        self.query_text(&Self::CODE_PREVIEW).await
    }

    pub async fn error_message(&self) -> String {
        self.query_text(&Self::ERROR_MESSAGE).await
    }

    pub async fn is_prompt_input_displayed(&self) -> bool {
        self.query_displayed(&Self::PROMPT_INPUT).await
    }

    pub async fn is_code_preview_displayed(&self) -> bool {
        self.query_displayed(&Self::CODE_PREVIEW).await
    }

    pub async fn is_error_message_displayed(&self) -> bool {
        self.query_displayed(&Self::ERROR_MESSAGE).await
    }
}

#[async_trait]
impl PageObject for ProjectDetailsPage {
    fn session(&self) -> &Session {
        &self.session
    }

    fn page_name(&self) -> &'static str {
        "project-details"
    }

    fn url_pattern(&self) -> &'static str {
        "/projects/:id"
    }

    fn defining_locators(&self) -> &'static [Locator] {
        Self::DEFINING
    }
}
