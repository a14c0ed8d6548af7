//! The project's testing tab: creating and running test cases.

use super::{open_project_with_response, row_name};
use crate::assertion::{ensure_contains, ensure_not_empty};
use crate::data::TEST_CASE_TEMPLATES;
use crate::ensure;
use crate::page_object::PageObject;
use crate::pages::TestingPage;
use crate::result::E2eResult;
use crate::scenario::{Scenario, ScenarioContext, ScenarioGroup};

pub const FEATURE: &str = "testing";

/// Prompt that gives every scenario code to test
pub const SETUP_PROMPT: &str = "Create a simple hello world function in JavaScript";

pub const TEST_PROMPT: &str = "Test that the hello world function returns the correct string";

#[must_use]
pub fn group() -> ScenarioGroup {
    let template_rows = TEST_CASE_TEMPLATES.iter().enumerate().map(|(i, prompt)| {
        Scenario::new(row_name("create_multiple_test_cases", i), move |ctx| {
            Box::pin(create_multiple_test_cases(ctx, *prompt))
        })
        .with_description("Test creating multiple test cases")
    });

    ScenarioGroup::new(FEATURE)
        .with_scenario(
            Scenario::new("navigate_to_testing_page", |ctx| {
                Box::pin(navigate_to_testing_page(ctx))
            })
            .with_description("Test navigating to the testing page"),
        )
        .with_scenario(
            Scenario::new("create_test_case", |ctx| Box::pin(create_test_case(ctx)))
                .with_description("Test creating a new test case"),
        )
        .with_scenario(
            Scenario::new("run_all_tests", |ctx| Box::pin(run_all_tests(ctx)))
                .with_description("Test running all tests"),
        )
        .with_scenario(
            Scenario::new("view_test_results", |ctx| Box::pin(view_test_results(ctx)))
                .with_description("Test viewing test results"),
        )
        .with_scenarios(template_rows)
        .with_scenario(
            Scenario::new("back_to_project", |ctx| Box::pin(back_to_project(ctx)))
                .with_description("Test navigating back to the project page"),
        )
}

/// Project with an AI response, showing its testing screen
async fn open_testing_page(ctx: &ScenarioContext) -> E2eResult<TestingPage> {
    let project = open_project_with_response(ctx, SETUP_PROMPT).await?;
    let testing = project.details.click_test().await?;
    ensure!(testing.is_loaded().await, "Testing page did not load");
    Ok(testing)
}

/// Create a test case unless one is already listed
async fn ensure_test_case(ctx: &ScenarioContext, testing: &TestingPage) -> E2eResult<()> {
    if testing.test_result_count().await == 0 {
        ctx.report().info("No test cases yet, creating one");
        testing.create_test(TEST_PROMPT).await?;
    }
    Ok(())
}

async fn navigate_to_testing_page(ctx: &ScenarioContext) -> E2eResult<()> {
    let testing = open_testing_page(ctx).await?;
    testing.wait_for_page_to_load().await?;
    ensure!(
        testing.is_testing_title_displayed().await,
        "Testing page title is not displayed"
    );
    Ok(())
}

async fn create_test_case(ctx: &ScenarioContext) -> E2eResult<()> {
    let testing = open_testing_page(ctx).await?;
    testing.create_test(TEST_PROMPT).await?;

    ensure!(
        testing.test_result_count().await > 0,
        "No test cases were created"
    );
    ensure_contains(&testing.test_results().await, TEST_PROMPT, "Test results")
}

async fn run_all_tests(ctx: &ScenarioContext) -> E2eResult<()> {
    let testing = open_testing_page(ctx).await?;
    ensure_test_case(ctx, &testing).await?;

    testing.click_run_all_tests().await?;
    testing.wait_for_tests_to_complete(None).await?;

    let status = testing.test_status().await;
    ctx.report().info(&format!("Test status: {status}"));
    ensure_not_empty(&status, "Test status")?;
    ensure!(
        testing.test_result_count().await > 0,
        "No test results are displayed"
    );
    Ok(())
}

async fn view_test_results(ctx: &ScenarioContext) -> E2eResult<()> {
    let testing = open_testing_page(ctx).await?;
    ensure_test_case(ctx, &testing).await?;
    testing.click_run_all_tests().await?;
    testing.wait_for_tests_to_complete(None).await?;

    let results = testing.test_results().await;
    ctx.report().info(&format!("Test results: {results}"));
    ensure_not_empty(&results, "Test results")?;
    ensure_not_empty(&testing.test_status().await, "Test status")
}

async fn create_multiple_test_cases(ctx: &ScenarioContext, prompt: &str) -> E2eResult<()> {
    let testing = open_testing_page(ctx).await?;
    let before = testing.test_result_count().await;
    ctx.report()
        .info(&format!("{before} test cases before creating '{prompt}'"));

    testing.create_test(prompt).await?;
    let after = testing.test_result_count().await;
    ensure!(after > before, "New test case was not created ({before} -> {after})");
    ensure_contains(&testing.test_results().await, prompt, "Test results")
}

async fn back_to_project(ctx: &ScenarioContext) -> E2eResult<()> {
    let testing = open_testing_page(ctx).await?;
    let details = testing.click_back_to_project().await?;
    ensure!(details.is_loaded().await, "Project details page did not load");
    ensure!(
        details.is_prompt_input_displayed().await,
        "Prompt input is not displayed on project details page"
    );
    Ok(())
}
