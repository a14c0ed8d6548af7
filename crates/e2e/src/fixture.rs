//! Session Fixture
//!
//! Owns the browser session of one scenario group. The lifecycle is a
//! three-state machine:
//!
//! ```text
//! Uninitialized ──start()──► Active ──close()──► Closed
//!       │                                           ▲
//!       └──────────────────close()──────────────────┘
//! ```
//!
//! `before_scenario` and `after_scenario` run around every scenario of the
//! group and are only valid while `Active`. Page objects receive clones of
//! the [`Session`] handle; quitting the browser stays here.
//!
//! ## Toyota Way Application
//!
//! - **Jidoka**: Teardown is unconditional, a failed group still quits its browser
//! - **Poka-Yoke**: Invalid lifecycle calls are errors, not silent no-ops

use crate::config::{SuiteConfig, Timeouts};
use crate::driver::DriverFactory;
use crate::pages::{DashboardPage, HomePage, LoginPage};
use crate::result::{E2eError, E2eResult};
use crate::session::Session;
use std::fmt;
use std::sync::Arc;

/// Lifecycle state of a [`SuiteFixture`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureState {
    /// No browser yet
    Uninitialized,
    /// Browser running
    Active,
    /// Browser quit; terminal
    Closed,
}

impl fmt::Display for FixtureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Uninitialized => "uninitialized",
            Self::Active => "active",
            Self::Closed => "closed",
        };
        f.write_str(s)
    }
}

#[derive(Debug)]
struct ActiveSession {
    session: Session,
    home_page: HomePage,
    login_page: LoginPage,
    dashboard_page: DashboardPage,
}

/// One browser session per scenario group
pub struct SuiteFixture {
    config: SuiteConfig,
    timeouts: Timeouts,
    factory: Arc<dyn DriverFactory>,
    state: FixtureState,
    active: Option<ActiveSession>,
}

impl fmt::Debug for SuiteFixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiteFixture")
            .field("state", &self.state)
            .field("base_url", &self.config.base_url())
            .field("browser", &self.config.browser)
            .finish_non_exhaustive()
    }
}

impl SuiteFixture {
    /// Create an uninitialized fixture
    #[must_use]
    pub fn new(config: SuiteConfig, factory: Arc<dyn DriverFactory>) -> Self {
        let timeouts = config.timeouts();
        Self {
            config,
            timeouts,
            factory,
            state: FixtureState::Uninitialized,
            active: None,
        }
    }

    /// Replace the timeouts derived from the config
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> FixtureState {
        self.state
    }

    /// Suite configuration the fixture was built with
    #[must_use]
    pub const fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Launch the browser, apply timeouts and window size, and build the
    /// shared page objects
    pub async fn start(&mut self) -> E2eResult<()> {
        if self.state != FixtureState::Uninitialized {
            return Err(E2eError::invalid_state(format!(
                "cannot start a fixture that is {}",
                self.state
            )));
        }

        tracing::info!(browser = %self.config.browser, "Setting up browser session");
        let driver = self.factory.create(&self.config.driver_config()).await?;

        let prepared = async {
            driver.set_timeouts(&self.timeouts.driver()).await?;
            driver
                .set_window_size(self.config.window_width, self.config.window_height)
                .await
        }
        .await;
        if let Err(e) = prepared {
            if let Err(quit_err) = driver.quit().await {
                tracing::warn!(error = %quit_err, "quit after failed setup");
            }
            return Err(e);
        }

        let session = Session::new(driver, self.timeouts, self.config.base_url());
        tracing::info!(session = %session.id(), "Browser session started");
        self.active = Some(ActiveSession {
            home_page: HomePage::new(session.clone()),
            login_page: LoginPage::new(session.clone()),
            dashboard_page: DashboardPage::new(session.clone()),
            session,
        });
        self.state = FixtureState::Active;
        Ok(())
    }

    fn active(&self) -> E2eResult<&ActiveSession> {
        self.active.as_ref().ok_or_else(|| {
            E2eError::invalid_state(format!("fixture is {}, not active", self.state))
        })
    }

    /// Session of the running browser
    pub fn session(&self) -> E2eResult<&Session> {
        self.active().map(|a| &a.session)
    }

    /// Shared home page; fails unless active
    pub fn home_page(&self) -> E2eResult<&HomePage> {
        self.active().map(|a| &a.home_page)
    }

    /// Shared login page; fails unless active
    pub fn login_page(&self) -> E2eResult<&LoginPage> {
        self.active().map(|a| &a.login_page)
    }

    /// Shared dashboard page; fails unless active
    pub fn dashboard_page(&self) -> E2eResult<&DashboardPage> {
        self.active().map(|a| &a.dashboard_page)
    }

    /// Open the product root before a scenario
    pub async fn before_scenario(&self) -> E2eResult<()> {
        let active = self.active()?;
        tracing::debug!(url = self.config.base_url(), "Navigating to base URL");
        active.session.navigate_to_base_url().await
    }

    /// Clear cookies after a scenario when `reset.cookies` is set
    pub async fn after_scenario(&self) -> E2eResult<()> {
        let active = self.active()?;
        if self.config.reset_cookies {
            tracing::debug!("Deleting all cookies");
            active.session.driver().delete_all_cookies().await?;
        }
        Ok(())
    }

    /// Quit the browser; calling again does nothing
    pub async fn close(&mut self) -> E2eResult<()> {
        let previous = std::mem::replace(&mut self.state, FixtureState::Closed);
        match self.active.take() {
            Some(active) => {
                tracing::info!(session = %active.session.id(), "Tearing down browser session");
                active.session.quit().await
            }
            None => {
                tracing::trace!(state = %previous, "close on inactive fixture");
                Ok(())
            }
        }
    }

    /// Log in with `test.username` / `test.password`
    pub async fn login_with_default_credentials(&self) -> E2eResult<DashboardPage> {
        let email = self.config.test_username.clone();
        let password = self.config.test_password.clone();
        self.login_with_credentials(&email, &password).await
    }

    /// Open the login screen and log in
    pub async fn login_with_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> E2eResult<DashboardPage> {
        log_in(self.login_page()?, email, password).await
    }
}

/// Open the login screen through `login` and submit `email` / `password`
pub(crate) async fn log_in(
    login: &LoginPage,
    email: &str,
    password: &str,
) -> E2eResult<DashboardPage> {
    tracing::info!(email, "Logging in");
    login.navigate_to().await?;
    login.login(email, password).await
}

impl Drop for SuiteFixture {
    fn drop(&mut self) {
        if self.state == FixtureState::Active {
            tracing::warn!("SuiteFixture dropped while active; call close() to quit the browser");
        }
    }
}
