//! Scenario catalogue: every product scenario, grouped by feature area.
//!
//! | Feature | Group builder |
//! |---------|---------------|
//! | `authentication` | [`authentication::group`] |
//! | `project_creation` | [`project_creation::group`] |
//! | `ai_agent` | [`ai_agent::group`] |
//! | `code_generation` | [`code_generation::group`] |
//! | `deployment` | [`deployment::group`] |
//! | `project_settings` | [`project_settings::group`] |
//! | `testing` | [`testing::group`] |
//!
//! Data-driven scenarios get one entry per provider row, named
//! `<scenario>[<row>]`.

pub mod ai_agent;
pub mod authentication;
pub mod code_generation;
pub mod deployment;
pub mod project_creation;
pub mod project_settings;
pub mod testing;

use crate::ensure;
use crate::generator;
use crate::page_object::PageObject;
use crate::pages::ProjectDetailsPage;
use crate::result::{E2eError, E2eResult};
use crate::scenario::{ScenarioContext, ScenarioGroup};

/// Feature areas in catalogue order
pub const FEATURES: &[&str] = &[
    "authentication",
    "project_creation",
    "ai_agent",
    "code_generation",
    "deployment",
    "project_settings",
    "testing",
];

/// Every scenario group
#[must_use]
pub fn all() -> Vec<ScenarioGroup> {
    vec![
        authentication::group(),
        project_creation::group(),
        ai_agent::group(),
        code_generation::group(),
        deployment::group(),
        project_settings::group(),
        testing::group(),
    ]
}

/// Groups for `features` (all when empty), keeping scenarios whose name
/// contains `filter`; groups left empty are dropped
pub fn select(features: &[String], filter: Option<&str>) -> E2eResult<Vec<ScenarioGroup>> {
    if let Some(unknown) = features.iter().find(|f| !FEATURES.contains(&f.as_str())) {
        return Err(E2eError::config(format!(
            "unknown feature '{unknown}', expected one of: {}",
            FEATURES.join(", ")
        )));
    }
    let groups = all()
        .into_iter()
        .filter(|g| features.is_empty() || features.iter().any(|f| f == g.feature()))
        .map(|g| match filter {
            Some(pattern) => g.filtered(pattern),
            None => g,
        })
        .filter(|g| !g.is_empty())
        .collect();
    Ok(groups)
}

/// `<name>[<row>]`
pub(crate) fn row_name(name: &str, row: usize) -> String {
    format!("{name}[{row}]")
}

/// `label` plus a short random suffix, for names that must not collide
/// with earlier runs on the same account
pub(crate) fn unique(label: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("{label} {}", &id[..8])
}

/// A project created for the running scenario
#[derive(Debug, Clone)]
pub(crate) struct NewProject {
    pub(crate) details: ProjectDetailsPage,
    pub(crate) name: String,
    pub(crate) description: String,
}

/// Log in with the default account and create a project with generated
/// name and description
pub(crate) async fn open_new_project(ctx: &ScenarioContext) -> E2eResult<NewProject> {
    let dashboard = ctx.login_with_default_credentials().await?;
    ensure!(dashboard.is_loaded().await, "Dashboard page did not load");

    let name = unique(&generator::random_project_name());
    let description = generator::random_project_description();
    ctx.report().info(&format!("Creating project '{name}'"));
    let details = dashboard
        .click_create_project()
        .await?
        .create_project(&name, &description, None)
        .await?;
    ensure!(details.is_loaded().await, "Project details page did not load");
    Ok(NewProject {
        details,
        name,
        description,
    })
}

/// [`open_new_project`], then send `prompt` and wait for the answer
pub(crate) async fn open_project_with_response(
    ctx: &ScenarioContext,
    prompt: &str,
) -> E2eResult<NewProject> {
    let project = open_new_project(ctx).await?;
    project.details.send_prompt(prompt).await?;
    let response = project.details.wait_for_ai_response().await?;
    ctx.report().info(&format!("AI response received: {}", preview(&response)));
    Ok(project)
}

/// First 100 characters of `text`, for log lines
pub(crate) fn preview(text: &str) -> String {
    match text.char_indices().nth(100) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod catalogue_tests {
        use super::*;
        use std::collections::HashSet;

        #[test]
        fn test_all_groups_follow_feature_order() {
            let features: Vec<String> = all().iter().map(|g| g.feature().to_string()).collect();
            assert_eq!(features, FEATURES);
        }

        #[test]
        fn test_scenario_names_unique_within_group() {
            for group in all() {
                let names: HashSet<&str> = group.scenarios().iter().map(|s| s.name()).collect();
                assert_eq!(names.len(), group.len(), "{}", group.feature());
            }
        }

        #[test]
        fn test_select_by_feature_and_filter() {
            let groups = select(&["authentication".to_string()], Some("logout")).unwrap();
            assert_eq!(groups.len(), 1);
            assert_eq!(groups[0].len(), 1);
            assert_eq!(groups[0].scenarios()[0].name(), "logout");
        }

        #[test]
        fn test_select_drops_empty_groups() {
            let groups = select(&[], Some("no_such_scenario")).unwrap();
            assert!(groups.is_empty());
        }

        #[test]
        fn test_select_rejects_unknown_feature() {
            let err = select(&["billing".to_string()], None).unwrap_err();
            assert!(err.to_string().contains("unknown feature 'billing'"));
        }
    }

    mod helper_tests {
        use super::*;

        #[test]
        fn test_row_name() {
            assert_eq!(row_name("login_with_credentials", 2), "login_with_credentials[2]");
        }

        #[test]
        fn test_unique_names_differ() {
            let a = unique("Renamed Project");
            assert!(a.starts_with("Renamed Project "));
            assert_ne!(a, unique("Renamed Project"));
        }

        #[test]
        fn test_preview_truncates() {
            assert_eq!(preview("short"), "short");
            let long = "x".repeat(150);
            assert_eq!(preview(&long).len(), 103);
        }
    }
}
