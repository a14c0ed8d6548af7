//! Deploying a project to an environment.

use super::{open_project_with_response, row_name};
use crate::assertion::{ensure_contains, ensure_contains_any, ensure_not_empty};
use crate::constants::ENV_DEVELOPMENT;
use crate::data::{DeploymentEnvironment, DEPLOYMENT_ENVIRONMENTS};
use crate::ensure;
use crate::page_object::PageObject;
use crate::pages::DeploymentPage;
use crate::result::E2eResult;
use crate::scenario::{Scenario, ScenarioContext, ScenarioGroup};

pub const FEATURE: &str = "deployment";

/// Prompt that gives every scenario something to deploy
pub const SETUP_PROMPT: &str = "Create a simple hello world web application";

#[must_use]
pub fn group() -> ScenarioGroup {
    let environment_rows = DEPLOYMENT_ENVIRONMENTS.iter().enumerate().map(|(i, row)| {
        Scenario::new(row_name("deploy_to_environment", i), move |ctx| {
            Box::pin(deploy_to_environment(ctx, *row))
        })
        .with_description("Test deploying to different environments")
    });

    ScenarioGroup::new(FEATURE)
        .with_scenario(
            Scenario::new("navigate_to_deployment_page", |ctx| {
                Box::pin(navigate_to_deployment_page(ctx))
            })
            .with_description("Test navigating to the deployment page"),
        )
        .with_scenarios(environment_rows)
        .with_scenario(
            Scenario::new("view_deployment_logs", |ctx| Box::pin(view_deployment_logs(ctx)))
                .with_description("Test viewing deployment logs"),
        )
        .with_scenario(
            Scenario::new("deployed_application_url", |ctx| {
                Box::pin(deployed_application_url(ctx))
            })
            .with_description("Test accessing the deployed application URL"),
        )
        .with_scenario(
            Scenario::new("back_to_project", |ctx| Box::pin(back_to_project(ctx)))
                .with_description("Test navigating back to the project page"),
        )
}

/// Project with an AI response, showing its deployment screen
async fn open_deployment_page(ctx: &ScenarioContext) -> E2eResult<DeploymentPage> {
    let project = open_project_with_response(ctx, SETUP_PROMPT).await?;
    let deployment = project.details.click_deploy().await?;
    ensure!(deployment.is_loaded().await, "Deployment page did not load");
    Ok(deployment)
}

/// Deploy to `environment` and wait for it to finish
async fn deploy(
    ctx: &ScenarioContext,
    deployment: &DeploymentPage,
    environment: &str,
) -> E2eResult<()> {
    ctx.report().info(&format!("Deploying to {environment}"));
    deployment.deploy(environment).await?;
    deployment.wait_for_deployment_to_complete().await?;
    Ok(())
}

async fn navigate_to_deployment_page(ctx: &ScenarioContext) -> E2eResult<()> {
    let deployment = open_deployment_page(ctx).await?;
    deployment.wait_for_page_to_load().await?;
    ensure!(deployment.is_current().await, "Not on the deployment page");
    Ok(())
}

async fn deploy_to_environment(ctx: &ScenarioContext, row: DeploymentEnvironment) -> E2eResult<()> {
    let deployment = open_deployment_page(ctx).await?;
    deploy(ctx, &deployment, row.environment).await?;

    let status = deployment.deployment_status().await;
    ctx.report().info(&format!("Deployment status: {status}"));
    ensure_contains_any(&status, &["success", "deployed", "complete"], "Deployment status")?;

    let url = deployment.deployment_url().await;
    ctx.report().info(&format!("Deployment URL: {url}"));
    ensure_contains(&url, row.expected_url_pattern, "Deployment URL")
}

async fn view_deployment_logs(ctx: &ScenarioContext) -> E2eResult<()> {
    let deployment = open_deployment_page(ctx).await?;
    deploy(ctx, &deployment, ENV_DEVELOPMENT).await?;

    let logs = deployment.deployment_logs().await;
    ctx.report().info(&format!("Deployment logs: {logs}"));
    ensure_not_empty(&logs, "Deployment logs")
}

async fn deployed_application_url(ctx: &ScenarioContext) -> E2eResult<()> {
    let deployment = open_deployment_page(ctx).await?;
    deploy(ctx, &deployment, ENV_DEVELOPMENT).await?;

    let url = deployment.deployment_url().await;
    ensure_not_empty(&url, "Deployment URL")?;
    ensure!(
        url.starts_with("http"),
        "Deployment URL is not a valid URL: {url}"
    );
    Ok(())
}

async fn back_to_project(ctx: &ScenarioContext) -> E2eResult<()> {
    let deployment = open_deployment_page(ctx).await?;
    let details = deployment.click_back_to_project().await?;
    ensure!(details.is_loaded().await, "Project details page did not load");
    ensure!(
        details.is_prompt_input_displayed().await,
        "Prompt input is not displayed on project details page"
    );
    Ok(())
}
