//! Product constants shared by page objects, data providers and scenarios.

// =============================================================================
// TIMEOUTS (seconds)
// =============================================================================

/// Default element wait
pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;

/// Short element wait
pub const SHORT_TIMEOUT_SECS: f64 = 5.0;

/// Long element wait (AI responses, deployments)
pub const LONG_TIMEOUT_SECS: f64 = 60.0;

// =============================================================================
// URLS AND PATHS
// =============================================================================

/// Product root
pub const BASE_URL: &str = "https://emergent.sh";

/// Login route
pub const LOGIN_PATH: &str = "/login";

/// Sign-up route
pub const SIGNUP_PATH: &str = "/signup";

/// Dashboard route
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Forgot-password route
pub const FORGOT_PASSWORD_PATH: &str = "/forgot-password";

/// Screenshot output directory
pub const SCREENSHOT_PATH: &str = "target/screenshots";

/// HTML report output directory
pub const REPORT_PATH: &str = "target/e2e-reports";

// =============================================================================
// ACCOUNTS
// =============================================================================

/// Seeded account email
pub const TEST_USERNAME: &str = "test@example.com";

/// Seeded account password
pub const TEST_PASSWORD: &str = "Password123!";

/// Seeded account display name
pub const TEST_NAME: &str = "Test User";

// =============================================================================
// PROJECT TEMPLATES
// =============================================================================

pub const TEMPLATE_WEB_APP: &str = "Web Application";
pub const TEMPLATE_MOBILE_APP: &str = "Mobile Application";
pub const TEMPLATE_API: &str = "API";
pub const TEMPLATE_DATABASE: &str = "Database";

/// Every template offered on the creation screen
pub const TEMPLATES: [&str; 4] = [
    TEMPLATE_WEB_APP,
    TEMPLATE_MOBILE_APP,
    TEMPLATE_API,
    TEMPLATE_DATABASE,
];

// =============================================================================
// MESSAGES
// =============================================================================

pub const ERROR_INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const ERROR_EMPTY_EMAIL: &str = "Email is required";
pub const ERROR_EMPTY_PASSWORD: &str = "Password is required";
pub const ERROR_INVALID_EMAIL: &str = "Please enter a valid email address";
pub const ERROR_PASSWORD_MISMATCH: &str = "Passwords do not match";
pub const ERROR_EMPTY_PROJECT_NAME: &str = "Project name is required";
pub const ERROR_DUPLICATE_PROJECT: &str = "A project with this name already exists";
pub const ERROR_EMPTY_PROMPT: &str = "Prompt cannot be empty";

pub const SUCCESS_PASSWORD_RESET: &str = "Password reset email sent";
pub const SUCCESS_PROJECT_CREATED: &str = "Project created successfully";
pub const SUCCESS_PROJECT_UPDATED: &str = "Project updated successfully";
pub const SUCCESS_PROJECT_DELETED: &str = "Project deleted successfully";
pub const SUCCESS_DEPLOYMENT: &str = "Deployment completed successfully";

// =============================================================================
// PROMPTS
// =============================================================================

pub const PROMPT_SIMPLE_WEB_APP: &str =
    "Create a simple web application with HTML, CSS, and JavaScript";
pub const PROMPT_REACT_APP: &str = "Create a React application with a login form and dashboard";
pub const PROMPT_BACKEND_API: &str = "Create a RESTful API with Node.js and Express";
pub const PROMPT_DATABASE_SCHEMA: &str = "Create a database schema for an e-commerce application";

/// Every canned prompt
pub const PROMPTS: [&str; 4] = [
    PROMPT_SIMPLE_WEB_APP,
    PROMPT_REACT_APP,
    PROMPT_BACKEND_API,
    PROMPT_DATABASE_SCHEMA,
];

pub const TEST_CASE_TEMPLATE: &str = "Create a test case for the login functionality";

// =============================================================================
// DEPLOYMENT ENVIRONMENTS
// =============================================================================

pub const ENV_DEVELOPMENT: &str = "Development";
pub const ENV_STAGING: &str = "Staging";
pub const ENV_PRODUCTION: &str = "Production";

/// Every deployment target, in dropdown order
pub const ENVIRONMENTS: [&str; 3] = [ENV_DEVELOPMENT, ENV_STAGING, ENV_PRODUCTION];
