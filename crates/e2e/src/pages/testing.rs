//! Testing tab of a project: generated test cases and their runs.

use super::ProjectDetailsPage;
use crate::locator::Locator;
use crate::page_object::PageObject;
use crate::result::E2eResult;
use crate::session::Session;
use crate::wait::Readiness;
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct TestingPage {
    session: Session,
}

impl TestingPage {
    pub const TITLE: Locator = Locator::xpath("//h1[contains(text(), 'Testing')]");
    pub const RUN_ALL_TESTS_BUTTON: Locator =
        Locator::xpath("//button[contains(text(), 'Run All Tests')]");
    pub const CREATE_TEST_BUTTON: Locator =
        Locator::xpath("//button[contains(text(), 'Create Test')]");
    pub const TEST_RESULTS: Locator = Locator::xpath("//div[contains(@class, 'test-result')]");
    pub const TEST_STATUS: Locator = Locator::xpath("//div[contains(@class, 'test-status')]");
    pub const BACK_TO_PROJECT_BUTTON: Locator =
        Locator::xpath("//button[contains(text(), 'Back to Project')]");
    pub const TEST_PROMPT_INPUT: Locator =
        Locator::xpath("//textarea[@placeholder='Enter test description']");
    // Exact text, so "Create Test" is not picked up first
    pub const CREATE_TEST_PROMPT_BUTTON: Locator = Locator::xpath("//button[text()='Create']");
    pub const PROGRESS_INDICATOR: Locator =
        Locator::xpath("//div[contains(@class, 'progress-indicator')]");

    const DEFINING: &'static [Locator] = &[
        Self::TITLE,
        Self::RUN_ALL_TESTS_BUTTON,
        Self::CREATE_TEST_BUTTON,
    ];

    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub async fn click_run_all_tests(&self) -> E2eResult<&Self> {
        tracing::info!("Clicking on run all tests button");
        self.click(&Self::RUN_ALL_TESTS_BUTTON).await?;
        Ok(self)
    }

    pub async fn click_create_test(&self) -> E2eResult<&Self> {
        tracing::info!("Clicking on create test button");
        self.click(&Self::CREATE_TEST_BUTTON).await?;
        Ok(self)
    }

    pub async fn enter_test_prompt(&self, prompt: &str) -> E2eResult<&Self> {
        tracing::info!(prompt, "Entering test prompt");
        self.type_text(&Self::TEST_PROMPT_INPUT, prompt).await?;
        Ok(self)
    }

    pub async fn click_create_test_prompt(&self) -> E2eResult<&Self> {
        tracing::info!("Clicking on create test prompt button");
        self.click(&Self::CREATE_TEST_PROMPT_BUTTON).await?;
        Ok(self)
    }

    pub async fn create_test(&self, prompt: &str) -> E2eResult<&Self> {
        tracing::info!(prompt, "Creating test");
        self.click_create_test().await?;
        self.enter_test_prompt(prompt).await?;
        self.click_create_test_prompt().await
    }

    /// Wait for the progress indicator to go away (long timeout unless
    /// `timeout` is given); a timeout is logged, not raised
    pub async fn wait_for_tests_to_complete(&self, timeout: Option<Duration>) -> E2eResult<&Self> {
        let timeout = timeout.unwrap_or(self.session.timeouts().long_wait);
        tracing::info!(timeout_ms = timeout.as_millis() as u64, "Waiting for tests to complete");
        match self
            .session
            .wait_until_gone(&Self::PROGRESS_INDICATOR, timeout)
            .await
        {
            Ok(_) => tracing::info!("Tests completed"),
            Err(e) => tracing::warn!(error = %e, "Error waiting for tests to complete"),
        }
        Ok(self)
    }

    pub async fn click_back_to_project(&self) -> E2eResult<ProjectDetailsPage> {
        tracing::info!("Clicking on back to project button");
        self.click(&Self::BACK_TO_PROJECT_BUTTON).await?;
        Ok(ProjectDetailsPage::new(self.session.clone()))
    }

    pub async fn wait_for_page_to_load(&self) -> E2eResult<&Self> {
        tracing::info!("Waiting for testing page to load completely");
        for locator in Self::DEFINING {
            self.session
                .wait_until_ready(locator, Readiness::Clickable)
                .await?;
        }
        Ok(self)
    }

    /// Text of every result row, one per line
    pub async fn test_results(&self) -> String {
        self.query_all_texts(&Self::TEST_RESULTS).await.join("\n")
    }

    pub async fn test_result_count(&self) -> usize {
        self.query_count(&Self::TEST_RESULTS).await
    }

    pub async fn test_status(&self) -> String {
        self.query_text(&Self::TEST_STATUS).await
    }

    pub async fn is_testing_title_displayed(&self) -> bool {
        self.query_displayed(&Self::TITLE).await
    }
}

#[async_trait]
impl PageObject for TestingPage {
    fn session(&self) -> &Session {
        &self.session
    }

    fn page_name(&self) -> &'static str {
        "testing"
    }

    fn url_pattern(&self) -> &'static str {
        "/projects/:id/tests"
    }

    fn defining_locators(&self) -> &'static [Locator] {
        Self::DEFINING
    }
}
