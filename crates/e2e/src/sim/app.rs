//! Product model behind the simulator
//!
//! [`Product`] is the server side (accounts and projects) shared by every
//! browser a factory launches. [`Browser`] is one tab: the route it shows,
//! the login cookie, form inputs and transient UI state. Screens are
//! re-rendered from both on every driver call, so time-based progress
//! (AI responses, deployments, test runs) shows up without any background
//! task.

use super::dom::{Document, El};
use crate::constants::{
    self, ENVIRONMENTS, ENV_DEVELOPMENT, ERROR_DUPLICATE_PROJECT, ERROR_EMPTY_EMAIL,
    ERROR_EMPTY_PASSWORD, ERROR_EMPTY_PROJECT_NAME, ERROR_EMPTY_PROMPT, ERROR_INVALID_CREDENTIALS,
    ERROR_INVALID_EMAIL, ERROR_PASSWORD_MISMATCH, SUCCESS_DEPLOYMENT, SUCCESS_PASSWORD_RESET,
    SUCCESS_PROJECT_CREATED, SUCCESS_PROJECT_DELETED, SUCCESS_PROJECT_UPDATED, TEMPLATES,
    TEMPLATE_WEB_APP,
};
use crate::page_object::url_path;
use crate::result::{E2eError, E2eResult};
use std::collections::HashMap;
use std::time::{Duration, Instant};

const MIN_PASSWORD_LEN: usize = 8;

/// How long the simulated backend takes for its slow operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimTiming {
    /// Prompt sent until the AI response renders
    pub ai_response: Duration,
    /// Deploy clicked until the deployment completes
    pub deployment: Duration,
    /// Run clicked until every test has a result
    pub test_run: Duration,
}

impl Default for SimTiming {
    fn default() -> Self {
        Self {
            ai_response: Duration::from_millis(150),
            deployment: Duration::from_millis(200),
            test_run: Duration::from_millis(150),
        }
    }
}

impl SimTiming {
    /// Every slow operation completes immediately
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            ai_response: Duration::ZERO,
            deployment: Duration::ZERO,
            test_run: Duration::ZERO,
        }
    }
}

// =============================================================================
// SERVER STATE
// =============================================================================

#[derive(Debug, Clone)]
struct User {
    name: String,
    email: String,
    password: String,
}

#[derive(Debug, Clone)]
struct Exchange {
    prompt: String,
    sent_at: Instant,
}

#[derive(Debug, Clone)]
struct Deployment {
    environment: &'static str,
    started: Instant,
}

#[derive(Debug, Clone)]
struct TestCase {
    description: String,
    created: Instant,
}

#[derive(Debug, Clone)]
struct Project {
    id: u64,
    owner: String,
    name: String,
    description: String,
    template: &'static str,
    exchange: Option<Exchange>,
    deployment: Option<Deployment>,
    tests: Vec<TestCase>,
    test_run: Option<Instant>,
}

/// Accounts and projects shared by every simulated browser
#[derive(Debug, Clone)]
pub(crate) struct Product {
    users: Vec<User>,
    projects: Vec<Project>,
    next_id: u64,
    pub(crate) timing: SimTiming,
}

impl Product {
    /// Seeded with the default test account
    pub(crate) fn new(timing: SimTiming) -> Self {
        Self {
            users: vec![User {
                name: constants::TEST_NAME.to_string(),
                email: constants::TEST_USERNAME.to_string(),
                password: constants::TEST_PASSWORD.to_string(),
            }],
            projects: Vec::new(),
            next_id: 1,
            timing,
        }
    }

    fn user(&self, email: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
    }

    fn project(&self, owner: &str, id: u64) -> Option<&Project> {
        self.projects
            .iter()
            .find(|p| p.id == id && p.owner == owner)
    }

    fn project_mut(&mut self, owner: &str, id: u64) -> Option<&mut Project> {
        self.projects
            .iter_mut()
            .find(|p| p.id == id && p.owner == owner)
    }

    fn name_taken(&self, owner: &str, name: &str, except: Option<u64>) -> bool {
        self.projects
            .iter()
            .any(|p| p.owner == owner && p.name == name && Some(p.id) != except)
    }

    /// Number of projects across all accounts
    pub(crate) fn project_count(&self) -> usize {
        self.projects.len()
    }
}

// =============================================================================
// BROWSER STATE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Blank,
    Home,
    Login,
    SignUp,
    ForgotPassword,
    Dashboard,
    NewProject,
    Project(u64),
    Deployment(u64),
    Testing(u64),
    Settings(u64),
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Flash {
    Error(String),
    Success(String),
}

#[derive(Debug, Clone, Default)]
struct Ui {
    terms_accepted: bool,
    profile_menu_open: bool,
    template: Option<&'static str>,
    environment: Option<&'static str>,
    delete_dialog_open: bool,
    test_dialog_open: bool,
}

/// What a click on an element does
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Action {
    Navigate(String),
    Login,
    SignUp,
    ToggleTerms,
    ResetPassword,
    ToggleProfileMenu,
    Logout,
    SelectTemplate(&'static str),
    CreateProject,
    SendPrompt,
    SelectEnvironment(&'static str),
    Deploy,
    RunAllTests,
    OpenTestDialog,
    CreateTest,
    CloseTestDialog,
    SaveSettings,
    OpenDeleteDialog,
    ConfirmDelete,
    CloseDeleteDialog,
}

/// One simulated browser tab
#[derive(Debug, Clone)]
pub(crate) struct Browser {
    origin: String,
    path: String,
    screen: Screen,
    /// Bumped on every page load; element ids from older loads are stale
    pub(crate) epoch: u64,
    user: Option<String>,
    inputs: HashMap<String, String>,
    ui: Ui,
    flash: Option<Flash>,
}

impl Browser {
    pub(crate) fn new() -> Self {
        Self {
            origin: String::new(),
            path: String::new(),
            screen: Screen::Blank,
            epoch: 0,
            user: None,
            inputs: HashMap::new(),
            ui: Ui::default(),
            flash: None,
        }
    }

    /// Load `url`; only `http(s)` URLs are served
    pub(crate) fn open(&mut self, product: &Product, url: &str) -> E2eResult<()> {
        let Some((scheme, rest)) = url.split_once("://") else {
            return Err(E2eError::Navigation {
                url: url.to_string(),
                message: "not an absolute URL".to_string(),
            });
        };
        if scheme != "http" && scheme != "https" {
            return Err(E2eError::Navigation {
                url: url.to_string(),
                message: format!("unsupported scheme '{scheme}'"),
            });
        }
        let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
        self.origin = format!("{scheme}://{host}");
        self.route(product, url_path(url));
        Ok(())
    }

    /// Reload the current route
    pub(crate) fn reload(&mut self, product: &Product) {
        if self.screen == Screen::Blank {
            self.epoch += 1;
        } else {
            let path = self.path.clone();
            self.route(product, &path);
        }
    }

    fn route(&mut self, product: &Product, path: &str) {
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let project_id = segments.get(1).and_then(|s| s.parse::<u64>().ok());

        let screen = match (segments.as_slice(), project_id) {
            ([], _) => Screen::Home,
            (["login"], _) => Screen::Login,
            (["signup"], _) => Screen::SignUp,
            (["forgot-password"], _) => Screen::ForgotPassword,
            (["dashboard"], _) => Screen::Dashboard,
            (["projects", "new"], _) => Screen::NewProject,
            (["projects", _], Some(id)) => Screen::Project(id),
            (["projects", _, "deploy"], Some(id)) => Screen::Deployment(id),
            (["projects", _, "tests"], Some(id)) => Screen::Testing(id),
            (["projects", _, "settings"], Some(id)) => Screen::Settings(id),
            _ => Screen::NotFound,
        };

        let needs_login = !matches!(
            screen,
            Screen::Home
                | Screen::Login
                | Screen::SignUp
                | Screen::ForgotPassword
                | Screen::NotFound
        );
        let (screen, path) = match (&self.user, needs_login) {
            (None, true) => (Screen::Login, constants::LOGIN_PATH.to_string()),
            (Some(owner), _) => match screen.project_id() {
                Some(id) if product.project(owner, id).is_none() => {
                    (Screen::NotFound, path.to_string())
                }
                _ => (screen, path.to_string()),
            },
            (None, false) => (screen, path.to_string()),
        };

        self.screen = screen;
        self.path = path;
        self.epoch += 1;
        self.inputs.clear();
        self.ui = Ui::default();
        self.flash = None;
    }

    pub(crate) fn current_url(&self) -> String {
        match self.screen {
            Screen::Blank => "about:blank".to_string(),
            _ => format!("{}{}", self.origin, self.path),
        }
    }

    pub(crate) fn title(&self, product: &Product) -> String {
        let project_name = |id| {
            self.user
                .as_deref()
                .and_then(|owner| product.project(owner, id))
                .map(|p| p.name.clone())
                .unwrap_or_default()
        };
        match self.screen {
            Screen::Blank => String::new(),
            Screen::Home => "Emergent".to_string(),
            Screen::Login => "Log in | Emergent".to_string(),
            Screen::SignUp => "Sign up | Emergent".to_string(),
            Screen::ForgotPassword => "Forgot Password | Emergent".to_string(),
            Screen::Dashboard => "Dashboard | Emergent".to_string(),
            Screen::NewProject => "Create Project | Emergent".to_string(),
            Screen::Project(id) => format!("{} | Emergent", project_name(id)),
            Screen::Deployment(id) => format!("Deploy {} | Emergent", project_name(id)),
            Screen::Testing(id) => format!("Test {} | Emergent", project_name(id)),
            Screen::Settings(id) => format!("Settings {} | Emergent", project_name(id)),
            Screen::NotFound => "Not Found | Emergent".to_string(),
        }
    }

    /// Drop the login cookie
    pub(crate) fn clear_cookies(&mut self) {
        self.user = None;
    }

    fn input(&self, field: &str) -> &str {
        self.inputs.get(field).map_or("", String::as_str)
    }

    pub(crate) fn set_input(&mut self, field: &str, value: String) {
        self.inputs.insert(field.to_string(), value);
    }

    // =========================================================================
    // ACTIONS
    // =========================================================================

    /// Apply a click
    pub(crate) fn dispatch(&mut self, product: &mut Product, action: Action, now: Instant) {
        match action {
            Action::Navigate(path) => self.route(product, &path),
            Action::Login => self.login(product),
            Action::SignUp => self.sign_up(product),
            Action::ToggleTerms => self.ui.terms_accepted = !self.ui.terms_accepted,
            Action::ResetPassword => {
                let email = self.input("email").trim().to_string();
                self.flash = Some(match validate_email(&email) {
                    Err(message) => Flash::Error(message.to_string()),
                    Ok(()) => Flash::Success(SUCCESS_PASSWORD_RESET.to_string()),
                });
            }
            Action::ToggleProfileMenu => self.ui.profile_menu_open = !self.ui.profile_menu_open,
            Action::Logout => {
                self.user = None;
                self.route(product, "/");
            }
            Action::SelectTemplate(template) => self.ui.template = Some(template),
            Action::CreateProject => self.create_project(product),
            Action::SendPrompt => self.send_prompt(product, now),
            Action::SelectEnvironment(env) => self.ui.environment = Some(env),
            Action::Deploy => {
                let environment = self.ui.environment.unwrap_or(ENV_DEVELOPMENT);
                if let Some(project) = self.current_project_mut(product) {
                    project.deployment = Some(Deployment {
                        environment,
                        started: now,
                    });
                }
            }
            Action::RunAllTests => {
                if let Some(project) = self.current_project_mut(product) {
                    project.test_run = Some(now);
                }
            }
            Action::OpenTestDialog => self.ui.test_dialog_open = true,
            Action::CreateTest => self.create_test(product, now),
            Action::CloseTestDialog => {
                self.ui.test_dialog_open = false;
                self.flash = None;
            }
            Action::SaveSettings => self.save_settings(product),
            Action::OpenDeleteDialog => self.ui.delete_dialog_open = true,
            Action::ConfirmDelete => {
                if let (Some(owner), Some(id)) = (self.user.clone(), self.screen.project_id()) {
                    product.projects.retain(|p| !(p.id == id && p.owner == owner));
                    self.route(product, constants::DASHBOARD_PATH);
                    self.flash = Some(Flash::Success(SUCCESS_PROJECT_DELETED.to_string()));
                }
            }
            Action::CloseDeleteDialog => self.ui.delete_dialog_open = false,
        }
    }

    fn current_project_mut<'p>(&self, product: &'p mut Product) -> Option<&'p mut Project> {
        let owner = self.user.as_deref()?;
        product.project_mut(owner, self.screen.project_id()?)
    }

    fn login(&mut self, product: &Product) {
        let email = self.input("email").trim().to_string();
        let password = self.input("password").to_string();
        let outcome = if email.is_empty() {
            Err(ERROR_EMPTY_EMAIL)
        } else if password.is_empty() {
            Err(ERROR_EMPTY_PASSWORD)
        } else {
            validate_email(&email).and_then(|()| match product.user(&email) {
                Some(user) if user.password == password => Ok(user.email.clone()),
                _ => Err(ERROR_INVALID_CREDENTIALS),
            })
        };
        match outcome {
            Ok(email) => {
                self.user = Some(email);
                self.route(product, constants::DASHBOARD_PATH);
            }
            Err(message) => self.flash = Some(Flash::Error(message.to_string())),
        }
    }

    fn sign_up(&mut self, product: &mut Product) {
        let name = self.input("name").trim().to_string();
        let email = self.input("email").trim().to_string();
        let password = self.input("password").to_string();
        let confirm = self.input("confirmPassword").to_string();

        let error = if name.is_empty() {
            Some("Name is required")
        } else if let Err(message) = validate_email(&email) {
            Some(message)
        } else if password.is_empty() {
            Some(ERROR_EMPTY_PASSWORD)
        } else if password.chars().count() < MIN_PASSWORD_LEN {
            Some("Password must be at least 8 characters")
        } else if password != confirm {
            Some(ERROR_PASSWORD_MISMATCH)
        } else if !self.ui.terms_accepted {
            Some("You must accept the terms and conditions")
        } else if product.user(&email).is_some() {
            Some("An account with this email already exists")
        } else {
            None
        };

        if let Some(message) = error {
            self.flash = Some(Flash::Error(message.to_string()));
            return;
        }
        product.users.push(User {
            name,
            email: email.clone(),
            password,
        });
        self.user = Some(email);
        self.route(product, constants::DASHBOARD_PATH);
    }

    fn create_project(&mut self, product: &mut Product) {
        let Some(owner) = self.user.clone() else {
            return;
        };
        let name = self.input("projectName").trim().to_string();
        if name.is_empty() {
            self.flash = Some(Flash::Error(ERROR_EMPTY_PROJECT_NAME.to_string()));
            return;
        }
        if product.name_taken(&owner, &name, None) {
            self.flash = Some(Flash::Error(ERROR_DUPLICATE_PROJECT.to_string()));
            return;
        }
        let id = product.next_id;
        product.next_id += 1;
        product.projects.push(Project {
            id,
            owner,
            name,
            description: self.input("projectDescription").trim().to_string(),
            template: self.ui.template.unwrap_or(TEMPLATE_WEB_APP),
            exchange: None,
            deployment: None,
            tests: Vec::new(),
            test_run: None,
        });
        self.route(product, &format!("/projects/{id}"));
        self.flash = Some(Flash::Success(SUCCESS_PROJECT_CREATED.to_string()));
    }

    fn send_prompt(&mut self, product: &mut Product, now: Instant) {
        let prompt = self.input("prompt").trim().to_string();
        if prompt.is_empty() {
            self.flash = Some(Flash::Error(ERROR_EMPTY_PROMPT.to_string()));
            return;
        }
        if let Some(project) = self.current_project_mut(product) {
            project.exchange = Some(Exchange {
                prompt,
                sent_at: now,
            });
        }
        self.inputs.remove("prompt");
        self.flash = None;
    }

    fn create_test(&mut self, product: &mut Product, now: Instant) {
        let description = self.input("testDescription").trim().to_string();
        if description.is_empty() {
            self.flash = Some(Flash::Error("Test description cannot be empty".to_string()));
            return;
        }
        if let Some(project) = self.current_project_mut(product) {
            project.tests.push(TestCase {
                description,
                created: now,
            });
        }
        self.inputs.remove("testDescription");
        self.ui.test_dialog_open = false;
        self.flash = None;
    }

    fn save_settings(&mut self, product: &mut Product) {
        let (Some(owner), Some(id)) = (self.user.clone(), self.screen.project_id()) else {
            return;
        };
        let Some(current) = product.project(&owner, id) else {
            return;
        };
        let name = self
            .inputs
            .get("projectName")
            .map_or_else(|| current.name.clone(), |v| v.trim().to_string());
        let description = self
            .inputs
            .get("projectDescription")
            .map_or_else(|| current.description.clone(), |v| v.trim().to_string());

        let error = if name.is_empty() {
            Some(ERROR_EMPTY_PROJECT_NAME)
        } else if product.name_taken(&owner, &name, Some(id)) {
            Some(ERROR_DUPLICATE_PROJECT)
        } else {
            None
        };
        // the form always shows the stored values after a save attempt
        self.inputs.remove("projectName");
        self.inputs.remove("projectDescription");
        if let Some(message) = error {
            self.flash = Some(Flash::Error(message.to_string()));
            return;
        }
        if let Some(project) = product.project_mut(&owner, id) {
            project.name = name;
            project.description = description;
        }
        self.flash = Some(Flash::Success(SUCCESS_PROJECT_UPDATED.to_string()));
    }

    // =========================================================================
    // RENDERING
    // =========================================================================

    /// Render the current screen
    pub(crate) fn render(&self, product: &Product, now: Instant) -> Document {
        let project = |id| {
            self.user
                .as_deref()
                .and_then(|owner| product.project(owner, id))
        };
        let main = match self.screen {
            Screen::Blank => El::new("main"),
            Screen::Home => self.home(),
            Screen::Login => self.login_form(),
            Screen::SignUp => self.sign_up_form(),
            Screen::ForgotPassword => self.forgot_password_form(),
            Screen::Dashboard => self.dashboard(product),
            Screen::NewProject => self.new_project_form(),
            Screen::Project(id) => project(id).map_or_else(not_found, |p| {
                self.project_details(p, product.timing, now)
            }),
            Screen::Deployment(id) => project(id)
                .map_or_else(not_found, |p| self.deployment(p, product.timing, now)),
            Screen::Testing(id) => {
                project(id).map_or_else(not_found, |p| self.testing(p, product.timing, now))
            }
            Screen::Settings(id) => project(id).map_or_else(not_found, |p| self.settings(p)),
            Screen::NotFound => not_found(),
        };
        Document::build(
            El::new("html").child(El::new("body").child(self.header(product)).child(main)),
        )
    }

    fn header(&self, product: &Product) -> El {
        let nav = El::new("header").child(
            El::new("a")
                .class("logo")
                .attr("href", "/")
                .text("Emergent")
                .on_click(Action::Navigate("/".to_string())),
        );
        let Some(user) = self.user.as_deref().and_then(|email| product.user(email)) else {
            return nav;
        };
        if self.screen == Screen::Blank {
            return nav;
        }
        nav.child(
            El::new("div")
                .class("user-profile")
                .text(&user.name)
                .on_click(Action::ToggleProfileMenu),
        )
        .child(
            El::new("div")
                .class("profile-menu")
                .hidden(!self.ui.profile_menu_open)
                .child(button("Logout", Action::Logout)),
        )
    }

    fn flash(&self) -> Option<El> {
        self.flash.as_ref().map(|flash| match flash {
            Flash::Error(message) => El::new("div").class("error-message").text(message),
            Flash::Success(message) => El::new("div").class("success-message").text(message),
        })
    }

    fn field(&self, tag: &'static str, name: &str, kind: &str) -> El {
        El::new(tag)
            .id(name)
            .attr("name", name)
            .attr("type", kind)
            .attr("value", self.input(name))
    }

    fn home(&self) -> El {
        El::new("main")
            .child(El::new("h1").text("Build apps by describing them"))
            .child(link("Log in with email", constants::LOGIN_PATH))
            .child(link("Don't have an account? Sign up", constants::SIGNUP_PATH))
            .child(link("Forgot Password?", constants::FORGOT_PASSWORD_PATH))
    }

    fn login_form(&self) -> El {
        El::new("main")
            .child(El::new("h1").text("Welcome back"))
            .child(self.field("input", "email", "email"))
            .child(self.field("input", "password", "password"))
            .child(button("Log in", Action::Login))
            .children(self.flash())
            .child(link("Sign up", constants::SIGNUP_PATH))
            .child(link("Forgot Password?", constants::FORGOT_PASSWORD_PATH))
    }

    fn sign_up_form(&self) -> El {
        let mut terms = El::new("input")
            .attr("type", "checkbox")
            .attr("name", "terms")
            .on_click(Action::ToggleTerms);
        if self.ui.terms_accepted {
            terms = terms.attr("checked", "true");
        }
        El::new("main")
            .child(El::new("h1").text("Create your account"))
            .child(self.field("input", "name", "text"))
            .child(self.field("input", "email", "email"))
            .child(self.field("input", "password", "password"))
            .child(self.field("input", "confirmPassword", "password"))
            .child(
                El::new("label")
                    .child(terms)
                    .child(El::new("span").text("I agree to the Terms of Service")),
            )
            .child(button("Sign up", Action::SignUp))
            .children(self.flash())
            .child(link("Already have an account? Log in", constants::LOGIN_PATH))
    }

    fn forgot_password_form(&self) -> El {
        El::new("main")
            .child(El::new("h1").text("Forgot Password"))
            .child(self.field("input", "email", "email"))
            .child(button("Reset Password", Action::ResetPassword))
            .children(self.flash())
            .child(link("Back to Login", constants::LOGIN_PATH))
    }

    fn dashboard(&self, product: &Product) -> El {
        let owner = self.user.as_deref().unwrap_or_default();
        let search = self.input("search").trim().to_lowercase();
        let cards: Vec<El> = product
            .projects
            .iter()
            .filter(|p| p.owner == owner)
            .filter(|p| search.is_empty() || p.name.to_lowercase().contains(&search))
            .map(|p| {
                El::new("div")
                    .class("project-card")
                    .key(format!("p{}", p.id))
                    .child(El::new("h3").text(&p.name))
                    .child(El::new("p").text(&p.description))
                    .child(button("Open", Action::Navigate(format!("/projects/{}", p.id))))
            })
            .collect();
        let list = if cards.is_empty() {
            El::new("div")
                .class("projects")
                .child(El::new("p").class("empty-state").text("No projects yet"))
        } else {
            El::new("div").class("projects").children(cards)
        };
        El::new("main")
            .child(El::new("h1").text("Dashboard"))
            .child(button(
                "Create Project",
                Action::Navigate("/projects/new".to_string()),
            ))
            .child(
                El::new("input")
                    .attr("name", "search")
                    .attr("type", "search")
                    .attr("placeholder", "Search projects")
                    .attr("value", self.input("search")),
            )
            .children(self.flash())
            .child(list)
    }

    fn new_project_form(&self) -> El {
        let selected = self.ui.template.unwrap_or(TEMPLATE_WEB_APP);
        let tiles = TEMPLATES.iter().map(|&template| {
            let class = if template == selected {
                "template-option selected"
            } else {
                "template-option"
            };
            El::new("div")
                .class(class)
                .key(template)
                .text(template)
                .on_click(Action::SelectTemplate(template))
        });
        El::new("main")
            .child(El::new("h1").text("Create Project"))
            .child(self.field("input", "projectName", "text"))
            .child(self.field("textarea", "projectDescription", "text"))
            .child(El::new("div").class("templates").children(tiles))
            .children(self.flash())
            .child(button("Create", Action::CreateProject))
            .child(button(
                "Cancel",
                Action::Navigate(constants::DASHBOARD_PATH.to_string()),
            ))
    }

    fn project_details(&self, project: &Project, timing: SimTiming, now: Instant) -> El {
        let base = format!("/projects/{}", project.id);
        let mut chat = El::new("div")
            .class("chat")
            .child(
                El::new("textarea")
                    .attr("name", "prompt")
                    .attr("placeholder", "Enter your prompt here")
                    .attr("value", self.input("prompt")),
            )
            .child(button("Send", Action::SendPrompt))
            .children(self.flash().filter(|_| matches!(self.flash, Some(Flash::Error(_)))));
        if let Some(exchange) = &project.exchange {
            if now < exchange.sent_at + timing.ai_response {
                chat = chat.child(
                    El::new("div")
                        .class("progress-indicator")
                        .text("Generating..."),
                );
            } else {
                let tech = Tech::detect(&exchange.prompt);
                chat = chat
                    .child(
                        El::new("div")
                            .class("ai-response")
                            .text(tech.response(&exchange.prompt, project.template)),
                    )
                    .child(El::new("div").class("code-preview").text(tech.code()));
            }
        }
        El::new("main")
            .child(El::new("h1").class("project-title").text(&project.name))
            .child(
                El::new("div")
                    .class("project-description")
                    .text(&project.description),
            )
            .children(self.flash().filter(|_| matches!(self.flash, Some(Flash::Success(_)))))
            .child(
                El::new("div")
                    .class("project-actions")
                    .child(button("Deploy", Action::Navigate(format!("{base}/deploy"))))
                    .child(button("Test", Action::Navigate(format!("{base}/tests"))))
                    .child(button("Settings", Action::Navigate(format!("{base}/settings")))),
            )
            .child(chat)
            .child(button(
                "Back to Dashboard",
                Action::Navigate(constants::DASHBOARD_PATH.to_string()),
            ))
    }

    fn deployment(&self, project: &Project, timing: SimTiming, now: Instant) -> El {
        let selected = self.ui.environment.unwrap_or(ENV_DEVELOPMENT);
        let options = ENVIRONMENTS.iter().map(|&env| {
            let mut option = El::new("option")
                .key(env)
                .attr("value", env)
                .text(env)
                .on_click(Action::SelectEnvironment(env));
            if env == selected {
                option = option.attr("selected", "true");
            }
            option
        });
        let deploying = project
            .deployment
            .as_ref()
            .is_some_and(|d| now < d.started + timing.deployment);
        let status = match &project.deployment {
            None => "Not deployed".to_string(),
            Some(d) if deploying => format!("Deploying to {}...", d.environment),
            Some(_) => SUCCESS_DEPLOYMENT.to_string(),
        };

        let mut main = El::new("main")
            .child(El::new("h1").text(format!("Deployment - {}", project.name)))
            .child(
                El::new("select")
                    .id("environment")
                    .attr("name", "environment")
                    .attr("value", selected)
                    .children(options),
            )
            .child(button("Deploy", Action::Deploy).disabled(deploying))
            .child(El::new("div").class("deployment-status").text(status));
        if deploying {
            main = main.child(
                El::new("div")
                    .class("progress-indicator")
                    .text("Deploying..."),
            );
        }
        if let Some(d) = &project.deployment {
            let url = deployment_url(&project.name, d.environment);
            let mut logs = vec![
                format!("Building {}", project.name),
                format!("Deploying to {}", d.environment),
            ];
            if !deploying {
                logs.push(format!("Deployed to {url}"));
            }
            main = main.child(El::new("div").class("deployment-logs").text(logs.join("\n")));
            if !deploying {
                main = main.child(
                    El::new("a")
                        .class("deployment-url")
                        .attr("href", url.as_str())
                        .text(url.as_str()),
                );
            }
        }
        main.child(button(
            "Back to Project",
            Action::Navigate(format!("/projects/{}", project.id)),
        ))
    }

    fn testing(&self, project: &Project, timing: SimTiming, now: Instant) -> El {
        let run_done = |started: Instant| now >= started + timing.test_run;
        let running = project.test_run.is_some_and(|r| !run_done(r));
        let status = match project.test_run {
            None => "Not run".to_string(),
            Some(_) if running => "Running tests...".to_string(),
            Some(started) => {
                let n = project.tests.iter().filter(|t| t.created <= started).count();
                format!("All tests passed ({n}/{n})")
            }
        };
        let results = project.tests.iter().enumerate().map(|(i, test)| {
            let state = match project.test_run {
                Some(started) if test.created <= started && run_done(started) => "Passed",
                Some(started) if test.created <= started => "Running",
                _ => "Not run",
            };
            El::new("div")
                .class("test-result")
                .key(format!("t{i}"))
                .text(format!("{} - {state}", test.description))
        });

        let mut main = El::new("main")
            .child(El::new("h1").text(format!("Testing - {}", project.name)))
            .child(button("Run All Tests", Action::RunAllTests).disabled(running))
            .child(button("Create Test", Action::OpenTestDialog))
            .child(El::new("div").class("test-status").text(status));
        if running {
            main = main.child(
                El::new("div")
                    .class("progress-indicator")
                    .text("Running tests..."),
            );
        }
        main = main.child(El::new("div").class("tests").children(results));
        if self.ui.test_dialog_open {
            main = main.child(
                El::new("div")
                    .class("dialog")
                    .child(
                        El::new("textarea")
                            .attr("name", "testDescription")
                            .attr("placeholder", "Enter test description")
                            .attr("value", self.input("testDescription")),
                    )
                    .children(self.flash())
                    .child(button("Create", Action::CreateTest))
                    .child(button("Cancel", Action::CloseTestDialog)),
            );
        }
        main.child(button(
            "Back to Project",
            Action::Navigate(format!("/projects/{}", project.id)),
        ))
    }

    fn settings(&self, project: &Project) -> El {
        let value = |field: &str, stored: &str| {
            self.inputs
                .get(field)
                .map_or_else(|| stored.to_string(), Clone::clone)
        };
        let mut main = El::new("main")
            .child(El::new("h1").text("Project Settings"))
            .child(
                El::new("input")
                    .id("projectName")
                    .attr("name", "projectName")
                    .attr("type", "text")
                    .attr("value", value("projectName", &project.name)),
            )
            .child(
                El::new("textarea")
                    .id("projectDescription")
                    .attr("name", "projectDescription")
                    .attr("value", value("projectDescription", &project.description)),
            )
            .child(button("Save Changes", Action::SaveSettings))
            .child(button("Delete Project", Action::OpenDeleteDialog))
            .children(self.flash());
        if self.ui.delete_dialog_open {
            main = main.child(
                El::new("div")
                    .class("confirm-dialog")
                    .child(El::new("p").text(format!(
                        "Delete {}? This cannot be undone.",
                        project.name
                    )))
                    .child(button("Confirm Delete", Action::ConfirmDelete))
                    .child(button("Cancel", Action::CloseDeleteDialog)),
            );
        }
        main.child(button(
            "Back to Project",
            Action::Navigate(format!("/projects/{}", project.id)),
        ))
    }
}

impl Screen {
    const fn project_id(self) -> Option<u64> {
        match self {
            Self::Project(id) | Self::Deployment(id) | Self::Testing(id) | Self::Settings(id) => {
                Some(id)
            }
            _ => None,
        }
    }
}

fn button(label: &str, action: Action) -> El {
    El::new("button").text(label).on_click(action)
}

fn link(label: &str, path: &str) -> El {
    El::new("a")
        .attr("href", path)
        .text(label)
        .on_click(Action::Navigate(path.to_string()))
}

fn not_found() -> El {
    El::new("main").child(El::new("h1").text("Page not found"))
}

fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.is_empty() {
        return Err(ERROR_EMPTY_EMAIL);
    }
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.') =>
        {
            Ok(())
        }
        _ => Err(ERROR_INVALID_EMAIL),
    }
}

/// `https://<name-slug>-<environment>.emergent.app`
fn deployment_url(project_name: &str, environment: &str) -> String {
    let slug = project_name
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    format!("https://{slug}-{}.emergent.app", environment.to_lowercase())
}

// =============================================================================
// CODE GENERATION
// =============================================================================

/// Technology the simulated agent answers with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tech {
    Html,
    React,
    Express,
    Sql,
}

impl Tech {
    fn detect(prompt: &str) -> Self {
        let lower = prompt.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let any = |keys: &[&str]| words.iter().any(|w| keys.contains(w));
        if any(&["react", "jsx"]) {
            Self::React
        } else if any(&["express", "node", "api", "rest", "restful", "endpoint", "server"]) {
            Self::Express
        } else if any(&["sql", "database", "schema", "table", "tables"]) {
            Self::Sql
        } else {
            Self::Html
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Html => "HTML",
            Self::React => "React",
            Self::Express => "Express",
            Self::Sql => "SQL schema",
        }
    }

    fn response(self, prompt: &str, template: &str) -> String {
        let detail = match self {
            Self::Html => {
                "The page uses semantic HTML with a header, navigation and a contact form, \
                 styled with plain CSS."
            }
            Self::React => {
                "The app is split into React function components that keep their state with hooks."
            }
            Self::Express => {
                "The Express server exposes REST API endpoints with JSON request handling and \
                 a health check."
            }
            Self::Sql => {
                "The schema defines tables for users, products, orders and reviews with primary \
                 and foreign keys."
            }
        };
        format!(
            "Here is a {} implementation for your request: \"{prompt}\". {detail} \
             Project template: {template}.",
            self.label()
        )
    }

    const fn code(self) -> &'static str {
        match self {
            Self::Html => HTML_CODE,
            Self::React => REACT_CODE,
            Self::Express => EXPRESS_CODE,
            Self::Sql => SQL_CODE,
        }
    }
}

const HTML_CODE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>My App</title>
  <link rel="stylesheet" href="styles.css">
</head>
<body>
  <header>
    <nav><a href="/">Home</a> <a href="#contact">Contact</a></nav>
  </header>
  <div class="hero">
    <h1>Welcome</h1>
  </div>
  <form id="contact">
    <input type="email" name="email">
    <button type="submit">Send</button>
  </form>
  <script src="app.js"></script>
</body>
</html>"##;

const REACT_CODE: &str = r"import React, { useState } from 'react';

function TodoList() {
  const [items, setItems] = useState([]);
  const [text, setText] = useState('');

  const add = () => {
    setItems([...items, text]);
    setText('');
  };

  return (
    <div className='todo-component'>
      <input value={text} onChange={(e) => setText(e.target.value)} />
      <button onClick={add}>Add</button>
      <ul>{items.map((item, i) => <li key={i}>{item}</li>)}</ul>
    </div>
  );
}

export default TodoList;";

const EXPRESS_CODE: &str = r"const express = require('express');
const app = express();
app.use(express.json());

const items = [];

app.get('/health', (req, res) => res.json({ status: 'ok' }));
app.get('/api/items', (req, res) => res.json(items));
app.post('/api/items', (req, res) => {
  items.push(req.body);
  res.status(201).json(req.body);
});

app.listen(3000, () => console.log('Server listening on port 3000'));";

const SQL_CODE: &str = r"CREATE TABLE users (
  id SERIAL PRIMARY KEY,
  email VARCHAR(255) UNIQUE NOT NULL
);

CREATE TABLE products (
  id SERIAL PRIMARY KEY,
  name VARCHAR(255) NOT NULL,
  price NUMERIC(10, 2) NOT NULL
);

CREATE TABLE orders (
  id SERIAL PRIMARY KEY,
  user_id INTEGER REFERENCES users(id),
  created_at TIMESTAMP DEFAULT now()
);

CREATE TABLE reviews (
  id SERIAL PRIMARY KEY,
  product_id INTEGER REFERENCES products(id),
  rating INTEGER CHECK (rating BETWEEN 1 AND 5)
);";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::Locator;

    fn logged_in() -> (Browser, Product) {
        let mut product = Product::new(SimTiming::instant());
        let mut browser = Browser::new();
        browser.open(&product, "https://emergent.sh/login").unwrap();
        browser.set_input("email", constants::TEST_USERNAME.to_string());
        browser.set_input("password", constants::TEST_PASSWORD.to_string());
        browser.dispatch(&mut product, Action::Login, Instant::now());
        (browser, product)
    }

    fn texts(browser: &Browser, product: &Product, selector: &'static str) -> Vec<String> {
        let doc = browser.render(product, Instant::now());
        doc.find(&Locator::xpath(selector))
            .unwrap()
            .into_iter()
            .map(|i| doc.visible_text(i))
            .collect()
    }

    mod routing_tests {
        use super::*;

        #[test]
        fn test_dashboard_requires_login() {
            let product = Product::new(SimTiming::default());
            let mut browser = Browser::new();
            browser.open(&product, "https://emergent.sh/dashboard").unwrap();
            assert_eq!(browser.current_url(), "https://emergent.sh/login");
        }

        #[test]
        fn test_login_lands_on_dashboard() {
            let (browser, _) = logged_in();
            assert_eq!(browser.current_url(), "https://emergent.sh/dashboard");
        }

        #[test]
        fn test_unknown_project_is_not_found() {
            let (mut browser, product) = logged_in();
            browser.open(&product, "https://emergent.sh/projects/99").unwrap();
            assert_eq!(browser.title(&product), "Not Found | Emergent");
        }

        #[test]
        fn test_relative_url_is_rejected() {
            let product = Product::new(SimTiming::default());
            let err = Browser::new().open(&product, "/login").unwrap_err();
            assert!(matches!(err, E2eError::Navigation { .. }));
        }
    }

    mod validation_tests {
        use super::*;

        #[test]
        fn test_login_error_order() {
            let product = Product::new(SimTiming::default());
            let mut browser = Browser::new();
            browser.open(&product, "https://emergent.sh/login").unwrap();
            let mut product = product;
            browser.set_input("password", "x".to_string());
            browser.dispatch(&mut product, Action::Login, Instant::now());
            assert_eq!(
                texts(&browser, &product, "//div[contains(@class, 'error-message')]"),
                vec![ERROR_EMPTY_EMAIL.to_string()]
            );
            browser.set_input("email", "notanemail".to_string());
            browser.dispatch(&mut product, Action::Login, Instant::now());
            assert_eq!(
                texts(&browser, &product, "//div[contains(@class, 'error-message')]"),
                vec![ERROR_INVALID_EMAIL.to_string()]
            );
        }

        #[test]
        fn test_duplicate_project_name() {
            let (mut browser, mut product) = logged_in();
            for _ in 0..2 {
                browser.open(&product, "https://emergent.sh/projects/new").unwrap();
                browser.set_input("projectName", "Same".to_string());
                browser.dispatch(&mut product, Action::CreateProject, Instant::now());
            }
            assert_eq!(product.project_count(), 1);
            assert_eq!(
                texts(&browser, &product, "//div[contains(@class, 'error-message')]"),
                vec![ERROR_DUPLICATE_PROJECT.to_string()]
            );
        }

        #[test]
        fn test_email_validation() {
            assert_eq!(validate_email(""), Err(ERROR_EMPTY_EMAIL));
            assert_eq!(validate_email("a@b"), Err(ERROR_INVALID_EMAIL));
            assert!(validate_email("a@b.co").is_ok());
        }
    }

    mod generation_tests {
        use super::*;

        #[test]
        fn test_tech_detection() {
            assert_eq!(Tech::detect(constants::PROMPT_SIMPLE_WEB_APP), Tech::Html);
            assert_eq!(Tech::detect(constants::PROMPT_REACT_APP), Tech::React);
            assert_eq!(Tech::detect(constants::PROMPT_BACKEND_API), Tech::Express);
            assert_eq!(Tech::detect(constants::PROMPT_DATABASE_SCHEMA), Tech::Sql);
        }

        #[test]
        fn test_html_sample_is_complete() {
            let code = Tech::Html.code();
            assert!(code.starts_with("<!DOCTYPE html>"));
            assert!(code.contains(r##"<a href="#contact">Contact</a>"##));
            assert!(code.contains(r#"<form id="contact">"#));
            assert!(code.ends_with("</html>"));
        }

        #[test]
        fn test_deployment_url() {
            assert_eq!(
                deployment_url("Project Aurora 0042", "Staging"),
                "https://project-aurora-0042-staging.emergent.app"
            );
        }

        #[test]
        fn test_response_waits_for_timing() {
            let mut product = Product::new(SimTiming {
                ai_response: Duration::from_secs(60),
                ..SimTiming::instant()
            });
            let mut browser = Browser::new();
            browser.open(&product, "https://emergent.sh/login").unwrap();
            browser.set_input("email", constants::TEST_USERNAME.to_string());
            browser.set_input("password", constants::TEST_PASSWORD.to_string());
            browser.dispatch(&mut product, Action::Login, Instant::now());
            browser.open(&product, "https://emergent.sh/projects/new").unwrap();
            browser.set_input("projectName", "Slow".to_string());
            browser.dispatch(&mut product, Action::CreateProject, Instant::now());
            browser.set_input("prompt", "hello".to_string());
            browser.dispatch(&mut product, Action::SendPrompt, Instant::now());
            assert!(texts(&browser, &product, "//div[contains(@class, 'ai-response')]").is_empty());
            assert_eq!(
                texts(&browser, &product, "//div[contains(@class, 'progress-indicator')]").len(),
                1
            );
        }
    }
}
