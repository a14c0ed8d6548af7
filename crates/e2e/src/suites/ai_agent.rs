//! Conversations with the AI agent on the project details screen.

use super::{open_new_project, preview, row_name};
use crate::assertion::{ensure_contains, ensure_contains_any, ensure_not_empty};
use crate::constants::{ERROR_EMPTY_PROMPT, PROMPT_SIMPLE_WEB_APP};
use crate::data::{PromptData, PROMPT_DATA, PROMPT_TEMPLATES};
use crate::ensure;
use crate::pages::ProjectDetailsPage;
use crate::result::E2eResult;
use crate::scenario::{Scenario, ScenarioContext, ScenarioGroup};

pub const FEATURE: &str = "ai_agent";

pub const COMPLEX_PROMPT: &str = "Create a RESTful API with Node.js and Express that has \
    endpoints for CRUD operations on a 'users' resource. Include input validation and error \
    handling.";
pub const INITIAL_PROMPT: &str = "Create a simple React component";
pub const FOLLOW_UP_PROMPT: &str = "Add state management to the component";

#[must_use]
pub fn group() -> ScenarioGroup {
    let template_rows = PROMPT_TEMPLATES.iter().enumerate().map(|(i, prompt)| {
        Scenario::new(row_name("send_prompt_template", i), move |ctx| {
            Box::pin(send_prompt_template(ctx, *prompt))
        })
        .with_description("Test sending prompts with special instructions")
    });
    let response_rows = PROMPT_DATA.iter().enumerate().map(|(i, row)| {
        Scenario::new(row_name("prompt_response_mentions_technology", i), move |ctx| {
            Box::pin(prompt_response_mentions_technology(ctx, *row))
        })
        .with_description("Test that the AI response matches the requested technology")
    });

    ScenarioGroup::new(FEATURE)
        .with_scenario(
            Scenario::new("send_simple_prompt", |ctx| Box::pin(send_simple_prompt(ctx)))
                .with_description("Test sending a simple prompt to the AI agent"),
        )
        .with_scenario(
            Scenario::new("send_complex_prompt", |ctx| Box::pin(send_complex_prompt(ctx)))
                .with_description("Test sending a complex prompt to the AI agent"),
        )
        .with_scenario(
            Scenario::new("send_follow_up_prompt", |ctx| Box::pin(send_follow_up_prompt(ctx)))
                .with_description("Test sending a follow-up prompt to the AI agent"),
        )
        .with_scenario(
            Scenario::new("send_empty_prompt", |ctx| Box::pin(send_empty_prompt(ctx)))
                .with_description("Test sending an empty prompt to the AI agent"),
        )
        .with_scenarios(template_rows)
        .with_scenarios(response_rows)
}

/// Send `prompt`, wait for the answer and check it came with code
async fn ask(
    ctx: &ScenarioContext,
    details: &ProjectDetailsPage,
    prompt: &str,
) -> E2eResult<String> {
    details.send_prompt(prompt).await?;
    let response = details.wait_for_ai_response().await?;
    ctx.report()
        .info(&format!("AI response received: {}", preview(&response)));
    ensure_not_empty(&response, "AI response")?;
    ensure!(
        details.is_code_preview_displayed().await,
        "Code preview is not displayed after AI response"
    );
    Ok(response)
}

async fn send_simple_prompt(ctx: &ScenarioContext) -> E2eResult<()> {
    let project = open_new_project(ctx).await?;
    ask(ctx, &project.details, PROMPT_SIMPLE_WEB_APP).await?;
    Ok(())
}

async fn send_complex_prompt(ctx: &ScenarioContext) -> E2eResult<()> {
    let project = open_new_project(ctx).await?;
    let response = ask(ctx, &project.details, COMPLEX_PROMPT).await?;
    ensure_contains_any(&response, &["api", "express", "node", "crud"], "AI response")
}

async fn send_follow_up_prompt(ctx: &ScenarioContext) -> E2eResult<()> {
    let project = open_new_project(ctx).await?;
    ask(ctx, &project.details, INITIAL_PROMPT).await?;
    let follow_up = ask(ctx, &project.details, FOLLOW_UP_PROMPT).await?;
    ensure_contains_any(&follow_up, &["state", "usestate", "setstate"], "Follow-up AI response")
}

async fn send_empty_prompt(ctx: &ScenarioContext) -> E2eResult<()> {
    let project = open_new_project(ctx).await?;
    project.details.enter_prompt("").await?;
    project.details.click_send_prompt().await?;

    ensure!(
        project.details.is_error_message_displayed().await,
        "Error message not displayed for empty prompt"
    );
    ensure_contains(
        &project.details.error_message().await,
        ERROR_EMPTY_PROMPT,
        "Error message",
    )
}

async fn send_prompt_template(ctx: &ScenarioContext, prompt: &str) -> E2eResult<()> {
    ctx.report().info(&format!("Sending prompt template: {prompt}"));
    let project = open_new_project(ctx).await?;
    ask(ctx, &project.details, prompt).await?;
    Ok(())
}

async fn prompt_response_mentions_technology(
    ctx: &ScenarioContext,
    row: PromptData,
) -> E2eResult<()> {
    let project = open_new_project(ctx).await?;
    let response = ask(ctx, &project.details, row.prompt).await?;
    ensure_contains_any(&response, &[row.expected_response], "AI response")
}
