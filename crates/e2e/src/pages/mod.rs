//! Page objects, one per product screen.
//!
//! ```text
//! Home ──► Login ──► Dashboard ──► ProjectCreation ──► ProjectDetails
//!   │        │  ▲        ▲  ▲                           │   │   │
//!   │        ▼  │        │  └───────────────────────────┘   │   │
//!   └──► SignUp ┘        │              Deployment ◄────────┘   │
//!   └──► ForgotPassword  └──── ProjectSettings ◄── Testing ◄────┘
//! ```
//!
//! Navigation targets are fixed by each action's return type. When a submit
//! can either navigate or stay put with a validation error, the page offers
//! an `*_expecting_error` variant that returns `&Self`.

mod dashboard;
mod deployment;
mod forgot_password;
mod home;
mod login;
mod project_creation;
mod project_details;
mod project_settings;
mod signup;
mod testing;

pub use dashboard::DashboardPage;
pub use deployment::DeploymentPage;
pub use forgot_password::ForgotPasswordPage;
pub use home::HomePage;
pub use login::LoginPage;
pub use project_creation::ProjectCreationPage;
pub use project_details::ProjectDetailsPage;
pub use project_settings::ProjectSettingsPage;
pub use signup::SignUpPage;
pub use testing::TestingPage;
