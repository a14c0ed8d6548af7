//! Generated code shown in the code preview.

use super::{open_new_project, preview, row_name};
use crate::assertion::{ensure_contains, ensure_contains_any, ensure_not_empty};
use crate::data::{CodeTechnology, CODE_GENERATION_TECHNOLOGIES};
use crate::ensure;
use crate::result::E2eResult;
use crate::scenario::{Scenario, ScenarioContext, ScenarioGroup};

pub const FEATURE: &str = "code_generation";

pub const WEB_APP_PROMPT: &str =
    "Create a simple HTML page with a header, navigation menu, and a contact form";
pub const REACT_APP_PROMPT: &str =
    "Create a React application with a navigation bar and a product listing page";
pub const BACKEND_API_PROMPT: &str =
    "Create a Node.js Express API with endpoints for user authentication and product management";
pub const DATABASE_SCHEMA_PROMPT: &str = "Create a SQL database schema for an e-commerce \
    application with tables for users, products, orders, and reviews";

#[must_use]
pub fn group() -> ScenarioGroup {
    let technology_rows = CODE_GENERATION_TECHNOLOGIES
        .iter()
        .enumerate()
        .map(|(i, row)| {
            Scenario::new(row_name("generate_with_technology", i), move |ctx| {
                Box::pin(generate_with_technology(ctx, *row))
            })
            .with_description("Test generating code with specific technology requirements")
        });

    ScenarioGroup::new(FEATURE)
        .with_scenario(
            Scenario::new("generate_simple_web_app", |ctx| {
                Box::pin(generate_simple_web_app(ctx))
            })
            .with_description("Test generating a simple web application"),
        )
        .with_scenario(
            Scenario::new("generate_react_app", |ctx| Box::pin(generate_react_app(ctx)))
                .with_description("Test generating a React application"),
        )
        .with_scenario(
            Scenario::new("generate_backend_api", |ctx| Box::pin(generate_backend_api(ctx)))
                .with_description("Test generating a backend API"),
        )
        .with_scenario(
            Scenario::new("generate_database_schema", |ctx| {
                Box::pin(generate_database_schema(ctx))
            })
            .with_description("Test generating a database schema"),
        )
        .with_scenarios(technology_rows)
}

/// Create a project, send `prompt` and return the code preview text
async fn generate(ctx: &ScenarioContext, prompt: &str) -> E2eResult<String> {
    let project = open_new_project(ctx).await?;
    let details = &project.details;
    details.send_prompt(prompt).await?;

    let response = details.wait_for_ai_response().await?;
    ctx.report()
        .info(&format!("AI response received: {}", preview(&response)));
    ensure_not_empty(&response, "AI response")?;
    ensure!(
        details.is_code_preview_displayed().await,
        "Code preview is not displayed after AI response"
    );

    let code = details.code_preview().await;
    ctx.report()
        .info(&format!("Code preview: {}", preview(&code)));
    ensure_not_empty(&code, "Code preview")?;
    Ok(code)
}

async fn generate_simple_web_app(ctx: &ScenarioContext) -> E2eResult<()> {
    let code = generate(ctx, WEB_APP_PROMPT).await?;
    for tag in ["<html", "<header", "<form"] {
        ensure_contains(&code, tag, "Code preview")?;
    }
    Ok(())
}

async fn generate_react_app(ctx: &ScenarioContext) -> E2eResult<()> {
    let code = generate(ctx, REACT_APP_PROMPT).await?;
    ensure_contains_any(
        &code,
        &["import React", "from 'react'", "useState", "useEffect"],
        "Code preview",
    )
}

async fn generate_backend_api(ctx: &ScenarioContext) -> E2eResult<()> {
    let code = generate(ctx, BACKEND_API_PROMPT).await?;
    ensure_contains(&code, "express", "Code preview")?;
    ensure_contains_any(
        &code,
        &["app.get", "app.post", "router.get", "router.post"],
        "Code preview",
    )
}

async fn generate_database_schema(ctx: &ScenarioContext) -> E2eResult<()> {
    let code = generate(ctx, DATABASE_SCHEMA_PROMPT).await?;
    ensure_contains(&code, "CREATE TABLE", "Code preview")?;
    ensure_contains(&code, "PRIMARY KEY", "Code preview")?;
    for table in ["users", "products", "orders"] {
        ensure_contains_any(&code, &[table], "Code preview")?;
    }
    Ok(())
}

async fn generate_with_technology(ctx: &ScenarioContext, row: CodeTechnology) -> E2eResult<()> {
    ctx.report()
        .info(&format!("Generating {} code", row.technology));
    let code = generate(ctx, row.prompt).await?;
    ensure_contains_any(&code, row.expected_keywords, "Code preview")
}
