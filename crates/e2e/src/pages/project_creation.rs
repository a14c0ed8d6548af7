//! New project form.

use super::{DashboardPage, ProjectDetailsPage};
use crate::locator::{Locator, Strategy};
use crate::page_object::PageObject;
use crate::result::E2eResult;
use crate::session::Session;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct ProjectCreationPage {
    session: Session,
}

impl ProjectCreationPage {
    pub const PROJECT_NAME_FIELD: Locator = Locator::id("projectName");
    pub const PROJECT_DESCRIPTION_FIELD: Locator = Locator::id("projectDescription");
    pub const CREATE_BUTTON: Locator = Locator::xpath("//button[contains(text(), 'Create')]");
    pub const CANCEL_BUTTON: Locator = Locator::xpath("//button[contains(text(), 'Cancel')]");
    pub const TEMPLATE_OPTIONS: Locator =
        Locator::xpath("//div[contains(@class, 'template-option')]");
    pub const ERROR_MESSAGE: Locator = Locator::xpath("//div[contains(@class, 'error-message')]");
    pub const TITLE: Locator = Locator::xpath("//h1[contains(text(), 'Create Project')]");

    const DEFINING: &'static [Locator] = &[
        Self::TITLE,
        Self::PROJECT_NAME_FIELD,
        Self::PROJECT_DESCRIPTION_FIELD,
        Self::CREATE_BUTTON,
    ];

    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Template tile labelled `template_name`
    #[must_use]
    pub fn template_option(template_name: &str) -> Locator {
        Locator::dynamic(
            Strategy::XPath,
            format!("//div[contains(@class, 'template-option') and contains(., '{template_name}')]"),
        )
    }

    pub async fn enter_project_name(&self, name: &str) -> E2eResult<&Self> {
        tracing::info!(name, "Entering project name");
        self.type_text(&Self::PROJECT_NAME_FIELD, name).await?;
        Ok(self)
    }

    pub async fn enter_project_description(&self, description: &str) -> E2eResult<&Self> {
        tracing::info!("Entering project description");
        self.type_text(&Self::PROJECT_DESCRIPTION_FIELD, description)
            .await?;
        Ok(self)
    }

    pub async fn select_template(&self, template_name: &str) -> E2eResult<&Self> {
        tracing::info!(template_name, "Selecting template");
        self.click(&Self::template_option(template_name)).await?;
        Ok(self)
    }

    pub async fn click_create(&self) -> E2eResult<ProjectDetailsPage> {
        tracing::info!("Clicking on create button");
        self.click(&Self::CREATE_BUTTON).await?;
        Ok(ProjectDetailsPage::new(self.session.clone()))
    }

    /// Submit and wait for the validation error to show
    pub async fn click_create_expecting_error(&self) -> E2eResult<&Self> {
        tracing::info!("Clicking on create button expecting an error");
        self.click(&Self::CREATE_BUTTON).await?;
        self.wait_visible(&Self::ERROR_MESSAGE).await?;
        Ok(self)
    }

    pub async fn click_cancel(&self) -> E2eResult<DashboardPage> {
        tracing::info!("Clicking on cancel button");
        self.click(&Self::CANCEL_BUTTON).await?;
        Ok(DashboardPage::new(self.session.clone()))
    }

    /// Fill the form and submit; an empty `template` keeps the default
    pub async fn create_project(
        &self,
        name: &str,
        description: &str,
        template: Option<&str>,
    ) -> E2eResult<ProjectDetailsPage> {
        tracing::info!(name, "Creating project");
        self.enter_project_name(name).await?;
        self.enter_project_description(description).await?;
        if let Some(template) = template.filter(|t| !t.is_empty()) {
            self.select_template(template).await?;
        }
        self.click_create().await
    }

    pub async fn error_message(&self) -> String {
        self.query_text(&Self::ERROR_MESSAGE).await
    }

    pub async fn is_error_message_displayed(&self) -> bool {
        self.query_displayed(&Self::ERROR_MESSAGE).await
    }
}

#[async_trait]
impl PageObject for ProjectCreationPage {
    fn session(&self) -> &Session {
        &self.session
    }

    fn page_name(&self) -> &'static str {
        "project-creation"
    }

    fn url_pattern(&self) -> &'static str {
        "/projects/new"
    }

    fn defining_locators(&self) -> &'static [Locator] {
        Self::DEFINING
    }
}
