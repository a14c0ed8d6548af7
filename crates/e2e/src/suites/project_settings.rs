//! Renaming and deleting a project from its settings screen.

use super::{open_new_project, row_name, unique, NewProject};
use crate::assertion::{ensure_contains, ensure_contains_any, ensure_eq, ensure_not_empty};
use crate::constants::ERROR_EMPTY_PROJECT_NAME;
use crate::data::{ProjectUpdate, SettingsUpdate, PROJECT_SETTINGS_UPDATES, PROJECT_UPDATE_DATA};
use crate::ensure;
use crate::page_object::PageObject;
use crate::pages::ProjectSettingsPage;
use crate::result::E2eResult;
use crate::scenario::{Scenario, ScenarioContext, ScenarioGroup};

pub const FEATURE: &str = "project_settings";

#[must_use]
pub fn group() -> ScenarioGroup {
    let update_rows = PROJECT_SETTINGS_UPDATES.iter().enumerate().map(|(i, row)| {
        Scenario::new(row_name("update_project_settings", i), move |ctx| {
            Box::pin(update_project_settings(ctx, *row))
        })
        .with_description("Test updating project name and description")
    });
    let rename_rows = PROJECT_UPDATE_DATA.iter().enumerate().map(|(i, row)| {
        Scenario::new(row_name("update_project_with_data", i), move |ctx| {
            Box::pin(update_project_with_data(ctx, *row))
        })
        .with_description("Test renaming a project with various inputs")
    });

    ScenarioGroup::new(FEATURE)
        .with_scenario(
            Scenario::new("navigate_to_project_settings", |ctx| {
                Box::pin(navigate_to_project_settings(ctx))
            })
            .with_description("Test navigating to the project settings page"),
        )
        .with_scenarios(update_rows)
        .with_scenario(
            Scenario::new("update_with_empty_name", |ctx| Box::pin(update_with_empty_name(ctx)))
                .with_description("Test updating project with an empty name"),
        )
        .with_scenarios(rename_rows)
        .with_scenario(
            Scenario::new("delete_project", |ctx| Box::pin(delete_project(ctx)))
                .with_description("Test deleting a project"),
        )
        .with_scenario(
            Scenario::new("cancel_project_deletion", |ctx| {
                Box::pin(cancel_project_deletion(ctx))
            })
            .with_description("Test canceling project deletion"),
        )
}

/// Settings screen of `project`
async fn open_settings(project: &NewProject) -> E2eResult<ProjectSettingsPage> {
    let settings = project.details.click_settings().await?;
    ensure!(settings.is_loaded().await, "Project settings page did not load");
    Ok(settings)
}

async fn navigate_to_project_settings(ctx: &ScenarioContext) -> E2eResult<()> {
    let project = open_new_project(ctx).await?;
    let settings = open_settings(&project).await?;

    ensure!(
        settings.is_settings_title_displayed().await,
        "Settings title is not displayed"
    );
    ensure_eq(
        project.name.as_str(),
        settings.project_name().await.as_str(),
        "Project name",
    )?;
    ensure_eq(
        project.description.as_str(),
        settings.project_description().await.as_str(),
        "Project description",
    )
}

async fn update_project_settings(ctx: &ScenarioContext, row: SettingsUpdate) -> E2eResult<()> {
    let project = open_new_project(ctx).await?;
    let settings = open_settings(&project).await?;

    let new_name = unique(row.new_name);
    ctx.report()
        .info(&format!("Renaming '{}' to '{new_name}'", project.name));
    settings
        .update_project_settings(&new_name, row.new_description)
        .await?;

    let message = settings.success_message().await;
    ctx.report().info(&format!("Success message: {message}"));
    ensure_contains_any(&message, &["success", "updated"], "Success message")?;
    ensure_eq(
        new_name.as_str(),
        settings.project_name().await.as_str(),
        "Project name",
    )?;
    ensure_eq(
        row.new_description,
        settings.project_description().await.as_str(),
        "Project description",
    )
}

async fn update_with_empty_name(ctx: &ScenarioContext) -> E2eResult<()> {
    let project = open_new_project(ctx).await?;
    let settings = open_settings(&project).await?;

    settings.enter_project_name("").await?;
    settings.click_save_changes().await?;

    let message = settings.error_message().await;
    ctx.report().info(&format!("Error message: {message}"));
    ensure_contains(&message, ERROR_EMPTY_PROJECT_NAME, "Error message")?;
    ensure_eq(
        project.name.as_str(),
        settings.project_name().await.as_str(),
        "Project name after failed update",
    )
}

async fn update_project_with_data(ctx: &ScenarioContext, row: ProjectUpdate) -> E2eResult<()> {
    let dashboard = ctx.login_with_default_credentials().await?;
    ensure!(dashboard.is_loaded().await, "Dashboard page did not load");

    let original_name = unique(row.original_name);
    let details = dashboard
        .click_create_project()
        .await?
        .create_project(&original_name, row.original_description, None)
        .await?;
    ensure!(details.is_loaded().await, "Project details page did not load");
    let settings = details.click_settings().await?;
    ensure!(settings.is_loaded().await, "Project settings page did not load");

    let new_name = if row.new_name.is_empty() {
        String::new()
    } else {
        unique(row.new_name)
    };
    settings
        .update_project_settings(&new_name, row.new_description)
        .await?;

    if row.expected_success {
        ensure_not_empty(&settings.success_message().await, "Success message")?;
        ensure_eq(
            new_name.as_str(),
            settings.project_name().await.as_str(),
            "Project name",
        )
    } else {
        ensure_not_empty(&settings.error_message().await, "Error message")?;
        ensure_eq(
            original_name.as_str(),
            settings.project_name().await.as_str(),
            "Project name after failed update",
        )
    }
}

async fn delete_project(ctx: &ScenarioContext) -> E2eResult<()> {
    let project = open_new_project(ctx).await?;
    let settings = open_settings(&project).await?;

    let dashboard = settings.delete_project().await?;
    ensure!(
        dashboard.is_loaded().await,
        "Dashboard page did not load after deleting project"
    );
    ensure!(
        !dashboard.is_project_in_list(&project.name).await,
        "Deleted project '{}' still appears in the project list",
        project.name
    );
    Ok(())
}

async fn cancel_project_deletion(ctx: &ScenarioContext) -> E2eResult<()> {
    let project = open_new_project(ctx).await?;
    let settings = open_settings(&project).await?;

    settings.click_delete_project().await?;
    settings.click_cancel_delete().await?;

    ensure!(
        settings.is_loaded().await,
        "Project settings page did not stay open after canceling deletion"
    );
    ensure_eq(
        project.name.as_str(),
        settings.project_name().await.as_str(),
        "Project name",
    )
}
