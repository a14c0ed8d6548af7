//! Deployment screen of a project.

use super::ProjectDetailsPage;
use crate::locator::{xpath_with_text, Locator};
use crate::page_object::PageObject;
use crate::result::E2eResult;
use crate::session::Session;
use crate::wait::Readiness;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct DeploymentPage {
    session: Session,
}

impl DeploymentPage {
    pub const TITLE: Locator = Locator::xpath("//h1[contains(text(), 'Deployment')]");
    pub const DEPLOY_BUTTON: Locator = Locator::xpath("//button[contains(text(), 'Deploy')]");
    pub const ENVIRONMENT_DROPDOWN: Locator = Locator::xpath("//select[@id='environment']");
    pub const STATUS_INDICATOR: Locator =
        Locator::xpath("//div[contains(@class, 'deployment-status')]");
    pub const LOGS_AREA: Locator = Locator::xpath("//div[contains(@class, 'deployment-logs')]");
    pub const BACK_TO_PROJECT_BUTTON: Locator =
        Locator::xpath("//button[contains(text(), 'Back to Project')]");
    pub const PROGRESS_INDICATOR: Locator =
        Locator::xpath("//div[contains(@class, 'progress-indicator')]");
    pub const DEPLOYMENT_URL_LINK: Locator =
        Locator::xpath("//a[contains(@class, 'deployment-url')]");

    const DEFINING: &'static [Locator] = &[Self::TITLE, Self::DEPLOY_BUTTON];

    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Open the environment dropdown and pick `environment`
    pub async fn select_environment(&self, environment: &str) -> E2eResult<&Self> {
        tracing::info!(environment, "Selecting environment");
        self.click(&Self::ENVIRONMENT_DROPDOWN).await?;
        self.click(&xpath_with_text("option", environment)).await?;
        Ok(self)
    }

    pub async fn click_deploy(&self) -> E2eResult<&Self> {
        tracing::info!("Clicking on deploy button");
        self.click(&Self::DEPLOY_BUTTON).await?;
        Ok(self)
    }

    pub async fn deploy(&self, environment: &str) -> E2eResult<&Self> {
        tracing::info!(environment, "Deploying");
        self.select_environment(environment).await?;
        self.click_deploy().await
    }

    /// Wait (long timeout) for the progress indicator to go away; a timeout
    /// is logged, not raised
    pub async fn wait_for_deployment_to_complete(&self) -> E2eResult<&Self> {
        tracing::info!("Waiting for deployment to complete");
        match self
            .session
            .wait_until_gone(&Self::PROGRESS_INDICATOR, self.session.timeouts().long_wait)
            .await
        {
            Ok(result) => {
                tracing::info!(
                    elapsed_ms = result.elapsed.as_millis() as u64,
                    "Deployment completed"
                );
            }
            Err(e) => tracing::warn!(error = %e, "Error waiting for deployment to complete"),
        }
        Ok(self)
    }

    pub async fn click_back_to_project(&self) -> E2eResult<ProjectDetailsPage> {
        tracing::info!("Clicking on back to project button");
        self.click(&Self::BACK_TO_PROJECT_BUTTON).await?;
        Ok(ProjectDetailsPage::new(self.session.clone()))
    }

    pub async fn wait_for_page_to_load(&self) -> E2eResult<&Self> {
        tracing::info!("Waiting for deployment page to load completely");
        self.session
            .wait_until_ready(&Self::TITLE, Readiness::Visible)
            .await?;
        self.session
            .wait_until_ready(&Self::DEPLOY_BUTTON, Readiness::Present)
            .await?;
        Ok(self)
    }

    pub async fn deployment_status(&self) -> String {
        self.query_text(&Self::STATUS_INDICATOR).await
    }

    pub async fn deployment_logs(&self) -> String {
        self.query_text(&Self::LOGS_AREA).await
    }

    /// `href` of the deployed application link, or `""`
    pub async fn deployment_url(&self) -> String {
        self.query_attribute(&Self::DEPLOYMENT_URL_LINK, "href")
            .await
    }
}

#[async_trait]
impl PageObject for DeploymentPage {
    fn session(&self) -> &Session {
        &self.session
    }

    fn page_name(&self) -> &'static str {
        "deployment"
    }

    fn url_pattern(&self) -> &'static str {
        "/projects/:id/deploy"
    }

    fn defining_locators(&self) -> &'static [Locator] {
        Self::DEFINING
    }
}
