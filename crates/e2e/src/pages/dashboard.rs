//! Signed-in dashboard listing the user's projects.

use super::{HomePage, ProjectCreationPage, ProjectDetailsPage};
use crate::constants;
use crate::locator::{Locator, Strategy};
use crate::page_object::PageObject;
use crate::result::E2eResult;
use crate::session::Session;
use crate::wait::Readiness;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct DashboardPage {
    session: Session,
}

impl DashboardPage {
    pub const CREATE_PROJECT_BUTTON: Locator =
        Locator::xpath("//button[contains(text(), 'Create Project')]");
    pub const PROJECT_CARDS: Locator = Locator::xpath("//div[contains(@class, 'project-card')]");
    pub const PROJECT_CARD_TITLES: Locator =
        Locator::xpath("//div[contains(@class, 'project-card')]//h3");
    pub const USER_PROFILE_MENU: Locator =
        Locator::xpath("//div[contains(@class, 'user-profile')]");
    pub const LOGOUT_OPTION: Locator = Locator::xpath("//button[contains(text(), 'Logout')]");
    pub const TITLE: Locator = Locator::xpath("//h1[contains(text(), 'Dashboard')]");
    pub const SEARCH_BOX: Locator = Locator::xpath("//input[@placeholder='Search projects']");

    const DEFINING: &'static [Locator] = &[Self::TITLE, Self::CREATE_PROJECT_BUTTON];

    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// "Open" button inside the card of `project_name`
    #[must_use]
    pub fn open_project_button(project_name: &str) -> Locator {
        Locator::dynamic(
            Strategy::XPath,
            format!(
                "//div[contains(@class, 'project-card') and contains(., '{project_name}')]\
                 //button[contains(text(), 'Open')]"
            ),
        )
    }

    pub async fn navigate_to(&self) -> E2eResult<&Self> {
        tracing::info!("Navigating to dashboard page");
        self.session
            .navigate(&self.session.url(constants::DASHBOARD_PATH))
            .await?;
        Ok(self)
    }

    pub async fn click_create_project(&self) -> E2eResult<ProjectCreationPage> {
        tracing::info!("Clicking on create project button");
        self.click(&Self::CREATE_PROJECT_BUTTON).await?;
        Ok(ProjectCreationPage::new(self.session.clone()))
    }

    pub async fn open_project(&self, project_name: &str) -> E2eResult<ProjectDetailsPage> {
        tracing::info!(project_name, "Opening project");
        self.click(&Self::open_project_button(project_name)).await?;
        Ok(ProjectDetailsPage::new(self.session.clone()))
    }

    pub async fn search_project(&self, search_term: &str) -> E2eResult<&Self> {
        tracing::info!(search_term, "Searching for project");
        self.type_text(&Self::SEARCH_BOX, search_term).await?;
        Ok(self)
    }

    pub async fn click_user_profile_menu(&self) -> E2eResult<&Self> {
        tracing::info!("Clicking on user profile menu");
        self.click(&Self::USER_PROFILE_MENU).await?;
        Ok(self)
    }

    pub async fn click_logout_option(&self) -> E2eResult<HomePage> {
        tracing::info!("Clicking on logout option");
        self.click(&Self::LOGOUT_OPTION).await?;
        Ok(HomePage::new(self.session.clone()))
    }

    pub async fn logout(&self) -> E2eResult<HomePage> {
        tracing::info!("Logging out");
        self.click_user_profile_menu().await?;
        self.click_logout_option().await
    }

    /// Wait for the title and the primary button, then for the document
    pub async fn wait_for_page_to_load(&self) -> E2eResult<&Self> {
        tracing::info!("Waiting for dashboard page to load completely");
        for locator in Self::DEFINING {
            self.session
                .wait_until_ready(locator, Readiness::Clickable)
                .await?;
        }
        self.session
            .waiter()
            .wait_for_document_ready(self.session.timeouts().page_load)
            .await?;
        Ok(self)
    }

    pub async fn is_user_logged_in(&self) -> bool {
        self.query_displayed(&Self::USER_PROFILE_MENU).await
    }

    /// Number of project cards currently rendered
    pub async fn project_count(&self) -> usize {
        self.query_count(&Self::PROJECT_CARDS).await
    }

    /// Whether a card titled exactly `project_name` is rendered
    pub async fn is_project_in_list(&self, project_name: &str) -> bool {
        self.query_all_texts(&Self::PROJECT_CARD_TITLES)
            .await
            .iter()
            .any(|title| title.trim() == project_name)
    }
}

#[async_trait]
impl PageObject for DashboardPage {
    fn session(&self) -> &Session {
        &self.session
    }

    fn page_name(&self) -> &'static str {
        "dashboard"
    }

    fn url_pattern(&self) -> &'static str {
        constants::DASHBOARD_PATH
    }

    fn defining_locators(&self) -> &'static [Locator] {
        Self::DEFINING
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_project_button_scopes_to_card() {
        let locator = DashboardPage::open_project_button("Project Nova 1234");
        assert_eq!(locator.strategy(), Strategy::XPath);
        assert_eq!(
            locator.selector(),
            "//div[contains(@class, 'project-card') and contains(., 'Project Nova 1234')]\
             //button[contains(text(), 'Open')]"
        );
    }
}
