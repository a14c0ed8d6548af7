//! Creating projects from the dashboard.

use super::{row_name, unique};
use crate::assertion::{ensure_contains, ensure_eq, ensure_not_empty};
use crate::constants::{ERROR_DUPLICATE_PROJECT, ERROR_EMPTY_PROJECT_NAME};
use crate::data::{ProjectData, PROJECT_DATA, PROJECT_TEMPLATES};
use crate::ensure;
use crate::generator;
use crate::page_object::PageObject;
use crate::pages::{DashboardPage, ProjectCreationPage};
use crate::result::E2eResult;
use crate::scenario::{Scenario, ScenarioContext, ScenarioGroup};

pub const FEATURE: &str = "project_creation";

/// Name the duplicate-name scenario collides with
pub const DUPLICATE_NAME: &str = "Test Project";

#[must_use]
pub fn group() -> ScenarioGroup {
    let template_rows = PROJECT_TEMPLATES.iter().enumerate().map(|(i, template)| {
        Scenario::new(row_name("project_creation_with_template", i), move |ctx| {
            Box::pin(project_creation_with_template(ctx, *template))
        })
        .with_description("Test project creation with templates")
    });
    let data_rows = PROJECT_DATA.iter().enumerate().map(|(i, row)| {
        Scenario::new(row_name("project_creation_with_data", i), move |ctx| {
            Box::pin(project_creation_with_data(ctx, *row))
        })
        .with_description("Test project creation with various inputs")
    });

    ScenarioGroup::new(FEATURE)
        .with_scenario(
            Scenario::new("successful_project_creation", |ctx| {
                Box::pin(successful_project_creation(ctx))
            })
            .with_description("Test successful project creation with valid details"),
        )
        .with_scenario(
            Scenario::new("project_creation_with_empty_name", |ctx| {
                Box::pin(project_creation_with_empty_name(ctx))
            })
            .with_description("Test project creation with empty name"),
        )
        .with_scenarios(template_rows)
        .with_scenario(
            Scenario::new("project_creation_with_duplicate_name", |ctx| {
                Box::pin(project_creation_with_duplicate_name(ctx))
            })
            .with_description("Test project creation with duplicate name"),
        )
        .with_scenarios(data_rows)
        .with_scenario(
            Scenario::new("cancel_project_creation", |ctx| {
                Box::pin(cancel_project_creation(ctx))
            })
            .with_description("Test canceling project creation"),
        )
}

/// Log in and open the creation form
async fn open_creation_form(ctx: &ScenarioContext) -> E2eResult<ProjectCreationPage> {
    let dashboard = ctx.login_with_default_credentials().await?;
    ensure!(dashboard.is_loaded().await, "Dashboard page did not load");
    let creation = dashboard.click_create_project().await?;
    ensure!(creation.is_loaded().await, "Project creation page did not load");
    Ok(creation)
}

/// Make sure a project called `name` exists, leaving the browser on the
/// dashboard
async fn ensure_project_exists(ctx: &ScenarioContext, name: &str) -> E2eResult<DashboardPage> {
    let dashboard = ctx.dashboard_page().clone();
    dashboard.navigate_to().await?;
    dashboard.wait_for_page_to_load().await?;
    if dashboard.is_project_in_list(name).await {
        return Ok(dashboard);
    }
    ctx.report().info(&format!("Creating project '{name}' first"));
    let details = dashboard
        .click_create_project()
        .await?
        .create_project(name, &generator::random_project_description(), None)
        .await?;
    ensure!(details.is_loaded().await, "Project details page did not load");
    let dashboard = details.click_back_to_dashboard().await?;
    ensure!(dashboard.is_loaded().await, "Dashboard page did not load");
    Ok(dashboard)
}

/// Submit and check the form stayed put with a validation error
async fn expect_creation_error(creation: &ProjectCreationPage, expected: &str) -> E2eResult<()> {
    creation.click_create_expecting_error().await?;
    ensure!(
        creation.is_error_message_displayed().await,
        "Error message not displayed"
    );
    let message = creation.error_message().await;
    ensure_not_empty(&message, "Error message")?;
    ensure_contains(&message, expected, "Error message")?;
    ensure!(
        creation.is_current().await,
        "Left the creation page despite the error"
    );
    Ok(())
}

async fn successful_project_creation(ctx: &ScenarioContext) -> E2eResult<()> {
    let creation = open_creation_form(ctx).await?;

    let name = unique(&generator::random_project_name());
    let description = generator::random_project_description();
    let details = creation.create_project(&name, &description, None).await?;

    ensure!(details.is_loaded().await, "Project details page did not load");
    ensure_eq(
        name.as_str(),
        details.project_title().await.as_str(),
        "Project title",
    )?;
    ensure_eq(
        description.as_str(),
        details.project_description().await.as_str(),
        "Project description",
    )
}

async fn project_creation_with_empty_name(ctx: &ScenarioContext) -> E2eResult<()> {
    let creation = open_creation_form(ctx).await?;
    creation.enter_project_name("").await?;
    creation
        .enter_project_description(&generator::random_project_description())
        .await?;
    expect_creation_error(&creation, ERROR_EMPTY_PROJECT_NAME).await
}

async fn project_creation_with_template(ctx: &ScenarioContext, template: &str) -> E2eResult<()> {
    ctx.report().info(&format!("Creating project from template '{template}'"));
    let creation = open_creation_form(ctx).await?;

    let name = unique(&generator::random_project_name());
    let details = creation
        .create_project(&name, &generator::random_project_description(), Some(template))
        .await?;
    ensure!(details.is_loaded().await, "Project details page did not load");
    ensure_eq(
        name.as_str(),
        details.project_title().await.as_str(),
        "Project title",
    )
}

async fn project_creation_with_duplicate_name(ctx: &ScenarioContext) -> E2eResult<()> {
    ctx.login_with_default_credentials().await?;
    let dashboard = ensure_project_exists(ctx, DUPLICATE_NAME).await?;

    let creation = dashboard.click_create_project().await?;
    ensure!(creation.is_loaded().await, "Project creation page did not load");
    creation.enter_project_name(DUPLICATE_NAME).await?;
    creation
        .enter_project_description(&generator::random_project_description())
        .await?;
    expect_creation_error(&creation, ERROR_DUPLICATE_PROJECT).await
}

async fn project_creation_with_data(ctx: &ScenarioContext, row: ProjectData) -> E2eResult<()> {
    ctx.report().info(&format!(
        "Creating project '{}' with template '{}', expecting success: {}",
        row.name, row.template, row.expected_success
    ));
    ctx.login_with_default_credentials().await?;

    let name = if row.expected_success {
        unique(row.name)
    } else {
        row.name.to_string()
    };
    let dashboard = if !row.expected_success && !name.is_empty() {
        ensure_project_exists(ctx, &name).await?
    } else {
        let dashboard = ctx.dashboard_page().clone();
        dashboard.navigate_to().await?;
        dashboard
    };

    let creation = dashboard.click_create_project().await?;
    ensure!(creation.is_loaded().await, "Project creation page did not load");
    creation.enter_project_name(&name).await?;
    creation.enter_project_description(row.description).await?;
    creation.select_template(row.template).await?;

    if row.expected_success {
        let details = creation.click_create().await?;
        ensure!(details.is_loaded().await, "Project details page did not load");
        ensure_eq(
            name.as_str(),
            details.project_title().await.as_str(),
            "Project title",
        )
    } else if name.is_empty() {
        expect_creation_error(&creation, ERROR_EMPTY_PROJECT_NAME).await
    } else {
        expect_creation_error(&creation, ERROR_DUPLICATE_PROJECT).await
    }
}

async fn cancel_project_creation(ctx: &ScenarioContext) -> E2eResult<()> {
    let creation = open_creation_form(ctx).await?;

    let name = unique(&generator::random_project_name());
    creation.enter_project_name(&name).await?;
    creation
        .enter_project_description(&generator::random_project_description())
        .await?;
    let dashboard = creation.click_cancel().await?;

    ensure!(
        dashboard.is_loaded().await,
        "Dashboard page did not load after canceling project creation"
    );
    ensure!(
        !dashboard.is_project_in_list(&name).await,
        "Canceled project '{name}' appears in the project list"
    );
    Ok(())
}
