//! Project settings: rename, describe, delete.

use super::{DashboardPage, ProjectDetailsPage};
use crate::locator::Locator;
use crate::page_object::PageObject;
use crate::result::E2eResult;
use crate::session::Session;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct ProjectSettingsPage {
    session: Session,
}

impl ProjectSettingsPage {
    pub const TITLE: Locator = Locator::xpath("//h1[contains(text(), 'Project Settings')]");
    pub const PROJECT_NAME_FIELD: Locator = Locator::id("projectName");
    pub const PROJECT_DESCRIPTION_FIELD: Locator = Locator::id("projectDescription");
    pub const SAVE_CHANGES_BUTTON: Locator =
        Locator::xpath("//button[contains(text(), 'Save Changes')]");
    pub const DELETE_PROJECT_BUTTON: Locator =
        Locator::xpath("//button[contains(text(), 'Delete Project')]");
    pub const CONFIRM_DELETE_BUTTON: Locator =
        Locator::xpath("//button[contains(text(), 'Confirm Delete')]");
    pub const CANCEL_DELETE_BUTTON: Locator =
        Locator::xpath("//button[contains(text(), 'Cancel')]");
    pub const BACK_TO_PROJECT_BUTTON: Locator =
        Locator::xpath("//button[contains(text(), 'Back to Project')]");
    pub const SUCCESS_MESSAGE: Locator =
        Locator::xpath("//div[contains(@class, 'success-message')]");
    pub const ERROR_MESSAGE: Locator = Locator::xpath("//div[contains(@class, 'error-message')]");

    const DEFINING: &'static [Locator] = &[
        Self::TITLE,
        Self::PROJECT_NAME_FIELD,
        Self::PROJECT_DESCRIPTION_FIELD,
        Self::SAVE_CHANGES_BUTTON,
    ];

    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { session }
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

    pub async fn click_save_changes(&self) -> E2eResult<&Self> {
        tracing::info!("Clicking on save changes button");
        self.click(&Self::SAVE_CHANGES_BUTTON).await?;
        Ok(self)
    }

    pub async fn update_project_settings(&self, name: &str, description: &str) -> E2eResult<&Self> {
        tracing::info!(name, "Updating project settings");
        self.enter_project_name(name).await?;
        self.enter_project_description(description).await?;
        self.click_save_changes().await
    }

    pub async fn click_delete_project(&self) -> E2eResult<&Self> {
        tracing::info!("Clicking on delete project button");
        self.click(&Self::DELETE_PROJECT_BUTTON).await?;
        Ok(self)
    }

    pub async fn click_confirm_delete(&self) -> E2eResult<DashboardPage> {
        tracing::info!("Clicking on confirm delete button");
        self.click(&Self::CONFIRM_DELETE_BUTTON).await?;
        Ok(DashboardPage::new(self.session.clone()))
    }

    pub async fn click_cancel_delete(&self) -> E2eResult<&Self> {
        tracing::info!("Clicking on cancel delete button");
        self.click(&Self::CANCEL_DELETE_BUTTON).await?;
        Ok(self)
    }

    pub async fn delete_project(&self) -> E2eResult<DashboardPage> {
        tracing::info!("Deleting project");
        self.click_delete_project().await?;
        self.click_confirm_delete().await
    }

    pub async fn click_back_to_project(&self) -> E2eResult<ProjectDetailsPage> {
        tracing::info!("Clicking on back to project button");
        self.click(&Self::BACK_TO_PROJECT_BUTTON).await?;
        Ok(ProjectDetailsPage::new(self.session.clone()))
    }

    /// Current value of the name field
    pub async fn project_name(&self) -> String {
        self.query_attribute(&Self::PROJECT_NAME_FIELD, "value").await
    }

    /// Current value of the description field
    pub async fn project_description(&self) -> String {
        self.query_attribute(&Self::PROJECT_DESCRIPTION_FIELD, "value")
            .await
    }

    pub async fn success_message(&self) -> String {
        self.query_text(&Self::SUCCESS_MESSAGE).await
    }

    pub async fn error_message(&self) -> String {
        self.query_text(&Self::ERROR_MESSAGE).await
    }

    pub async fn is_settings_title_displayed(&self) -> bool {
        self.query_displayed(&Self::TITLE).await
    }
}

#[async_trait]
impl PageObject for ProjectSettingsPage {
    fn session(&self) -> &Session {
        &self.session
    }

    fn page_name(&self) -> &'static str {
        "project-settings"
    }

    fn url_pattern(&self) -> &'static str {
        "/projects/:id/settings"
    }

    fn defining_locators(&self) -> &'static [Locator] {
        Self::DEFINING
    }
}
