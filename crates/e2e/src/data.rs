//! Data providers: fixed parameter rows for data-driven scenarios.
//!
//! Every provider is a `const` slice of an immutable row type. Rows that
//! expect failure carry `expected_success: false`.

use crate::constants::{
    ENV_DEVELOPMENT, ENV_STAGING, PROMPT_BACKEND_API, PROMPT_DATABASE_SCHEMA, PROMPT_REACT_APP,
    PROMPT_SIMPLE_WEB_APP, TEMPLATE_API, TEMPLATE_DATABASE, TEMPLATE_MOBILE_APP,
    TEMPLATE_WEB_APP, TEST_PASSWORD, TEST_USERNAME,
};
use crate::driver::BrowserKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginCredentials {
    pub email: &'static str,
    pub password: &'static str,
    pub expected_success: bool,
}

pub const LOGIN_CREDENTIALS: &[LoginCredentials] = &[
    LoginCredentials {
        email: TEST_USERNAME,
        password: TEST_PASSWORD,
        expected_success: true,
    },
    LoginCredentials {
        email: "invalid@example.com",
        password: TEST_PASSWORD,
        expected_success: false,
    },
    LoginCredentials {
        email: TEST_USERNAME,
        password: "wrongpassword",
        expected_success: false,
    },
    LoginCredentials {
        email: "",
        password: TEST_PASSWORD,
        expected_success: false,
    },
    LoginCredentials {
        email: TEST_USERNAME,
        password: "",
        expected_success: false,
    },
    LoginCredentials {
        email: "notanemail",
        password: TEST_PASSWORD,
        expected_success: false,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignUpCredentials {
    pub name: &'static str,
    pub email: &'static str,
    pub password: &'static str,
    pub confirm_password: &'static str,
    pub expected_success: bool,
}

/// Sign-up rows; the valid row's email must be made unique before use
pub const SIGNUP_CREDENTIALS: &[SignUpCredentials] = &[
    SignUpCredentials {
        name: "New User",
        email: "newuser@example.com",
        password: "Password123!",
        confirm_password: "Password123!",
        expected_success: true,
    },
    SignUpCredentials {
        name: "",
        email: "newuser@example.com",
        password: "Password123!",
        confirm_password: "Password123!",
        expected_success: false,
    },
    SignUpCredentials {
        name: "New User",
        email: "",
        password: "Password123!",
        confirm_password: "Password123!",
        expected_success: false,
    },
    SignUpCredentials {
        name: "New User",
        email: "newuser@example.com",
        password: "",
        confirm_password: "Password123!",
        expected_success: false,
    },
    SignUpCredentials {
        name: "New User",
        email: "newuser@example.com",
        password: "Password123!",
        confirm_password: "",
        expected_success: false,
    },
    SignUpCredentials {
        name: "New User",
        email: "newuser@example.com",
        password: "Password123!",
        confirm_password: "DifferentPass!",
        expected_success: false,
    },
    SignUpCredentials {
        name: "New User",
        email: "notanemail",
        password: "Password123!",
        confirm_password: "Password123!",
        expected_success: false,
    },
    SignUpCredentials {
        name: "New User",
        email: "newuser@example.com",
        password: "short",
        confirm_password: "short",
        expected_success: false,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectData {
    pub name: &'static str,
    pub description: &'static str,
    pub template: &'static str,
    pub expected_success: bool,
}

/// Project creation rows
///
/// The last row only fails when a project named "Duplicate Project" already
/// exists; scenarios create it first.
pub const PROJECT_DATA: &[ProjectData] = &[
    ProjectData {
        name: "Test Project",
        description: "A test project description",
        template: TEMPLATE_WEB_APP,
        expected_success: true,
    },
    ProjectData {
        name: "",
        description: "A test project description",
        template: TEMPLATE_WEB_APP,
        expected_success: false,
    },
    ProjectData {
        name: "Test Project",
        description: "",
        template: TEMPLATE_WEB_APP,
        expected_success: true,
    },
    ProjectData {
        name: "Test Project",
        description: "A test project description",
        template: TEMPLATE_API,
        expected_success: true,
    },
    ProjectData {
        name: "Test Project",
        description: "A test project description",
        template: TEMPLATE_DATABASE,
        expected_success: true,
    },
    ProjectData {
        name: "Duplicate Project",
        description: "This project name already exists",
        template: TEMPLATE_WEB_APP,
        expected_success: false,
    },
];

pub const PROJECT_TEMPLATES: &[&str] = &[
    TEMPLATE_WEB_APP,
    TEMPLATE_MOBILE_APP,
    TEMPLATE_API,
    TEMPLATE_DATABASE,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptData {
    pub prompt: &'static str,
    /// Word expected somewhere in the AI response
    pub expected_response: &'static str,
}

pub const PROMPT_DATA: &[PromptData] = &[
    PromptData {
        prompt: PROMPT_SIMPLE_WEB_APP,
        expected_response: "HTML",
    },
    PromptData {
        prompt: PROMPT_REACT_APP,
        expected_response: "React",
    },
    PromptData {
        prompt: PROMPT_BACKEND_API,
        expected_response: "Express",
    },
    PromptData {
        prompt: PROMPT_DATABASE_SCHEMA,
        expected_response: "schema",
    },
];

pub const PROMPT_TEMPLATES: &[&str] = &[
    PROMPT_SIMPLE_WEB_APP,
    PROMPT_REACT_APP,
    PROMPT_BACKEND_API,
    PROMPT_DATABASE_SCHEMA,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeTechnology {
    pub technology: &'static str,
    pub prompt: &'static str,
    /// At least one must appear in the code preview (case-insensitive)
    pub expected_keywords: &'static [&'static str],
}

pub const CODE_GENERATION_TECHNOLOGIES: &[CodeTechnology] = &[
    CodeTechnology {
        technology: "HTML",
        prompt: "Create a landing page using plain HTML and CSS",
        expected_keywords: &["<html", "<body", "<div"],
    },
    CodeTechnology {
        technology: "React",
        prompt: "Create a React component that shows a todo list",
        expected_keywords: &["react", "usestate", "component"],
    },
    CodeTechnology {
        technology: "Express",
        prompt: "Create an Express server with a health check endpoint",
        expected_keywords: &["express", "app.get", "listen"],
    },
    CodeTechnology {
        technology: "SQL",
        prompt: "Create a SQL table for storing customer orders",
        expected_keywords: &["create table", "primary key"],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeploymentEnvironment {
    pub environment: &'static str,
    /// Fragment expected in the deployment URL
    pub expected_url_pattern: &'static str,
}

pub const DEPLOYMENT_ENVIRONMENTS: &[DeploymentEnvironment] = &[
    DeploymentEnvironment {
        environment: ENV_DEVELOPMENT,
        expected_url_pattern: "dev",
    },
    DeploymentEnvironment {
        environment: ENV_STAGING,
        expected_url_pattern: "staging",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectUpdate {
    pub original_name: &'static str,
    pub new_name: &'static str,
    pub original_description: &'static str,
    pub new_description: &'static str,
    pub expected_success: bool,
}

pub const PROJECT_UPDATE_DATA: &[ProjectUpdate] = &[
    ProjectUpdate {
        original_name: "Test Project",
        new_name: "Updated Project",
        original_description: "Original description",
        new_description: "Updated description",
        expected_success: true,
    },
    ProjectUpdate {
        original_name: "Test Project",
        new_name: "",
        original_description: "Original description",
        new_description: "Updated description",
        expected_success: false,
    },
    ProjectUpdate {
        original_name: "Test Project",
        new_name: "Updated Project",
        original_description: "Original description",
        new_description: "",
        expected_success: true,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub new_name: &'static str,
    pub new_description: &'static str,
}

pub const PROJECT_SETTINGS_UPDATES: &[SettingsUpdate] = &[
    SettingsUpdate {
        new_name: "Renamed Project",
        new_description: "A refreshed description",
    },
    SettingsUpdate {
        new_name: "Customer Portal",
        new_description: "Portal for customers to track orders",
    },
    SettingsUpdate {
        new_name: "Inventory Service",
        new_description: "",
    },
];

pub const TEST_CASE_TEMPLATES: &[&str] = &[
    "Create a test case for the login functionality",
    "Create a test case for the sign up form validation",
    "Create a test case for the dashboard search",
];

/// Browsers the suite is expected to run on; Safari needs extra setup
pub const BROWSERS: &[BrowserKind] = &[
    BrowserKind::Chrome,
    BrowserKind::Firefox,
    BrowserKind::Edge,
];
