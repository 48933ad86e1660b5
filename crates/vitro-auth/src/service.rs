//! Access gate — bootstrap, login, and logout orchestration.
//!
//! The gate is re-evaluated at the start of every interaction cycle. It
//! owns no session state: callers pass their [`Session`] value in and
//! keep whatever comes back.

use tokio::sync::Mutex;
use tracing::{debug, info};
use vitro_core::error::{VitroError, VitroResult};
use vitro_core::models::session::Session;
use vitro_core::models::user::{CreateUser, User};
use vitro_core::repository::{CreateUserOutcome, UserRepository};

use crate::password;

/// What the surrounding application should render next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// No accounts exist — collect a first administrator.
    Setup,
    /// Accounts exist but this context is unauthenticated.
    Login,
    /// Yield to the authenticated application.
    Authenticated,
}

/// Result of a login attempt.
#[derive(Debug)]
pub enum LoginOutcome {
    Authenticated(Session),
    /// Unknown username and wrong password collapse into this one
    /// variant; callers must surface [`GENERIC_LOGIN_ERROR`] for both.
    InvalidCredentials,
}

/// Result of a first-run administrator bootstrap attempt.
#[derive(Debug)]
pub enum BootstrapOutcome {
    AdminCreated(User),
    /// Another submission provisioned an account first; re-evaluate the
    /// gate and proceed to login.
    AlreadyInitialized,
    /// The requested username is already taken.
    Conflict,
    /// Rejected before any store write.
    InvalidInput(String),
}

/// The single user-facing message for every failed login. Never
/// distinguish "user not found" from "wrong password".
pub const GENERIC_LOGIN_ERROR: &str = "invalid username or password";

/// Access gate over a credential store.
///
/// Generic over the repository implementation so that this crate has no
/// dependency on the database crate.
pub struct AccessGate<U: UserRepository> {
    users: U,
    /// Must match the pepper the store hashes with, if any.
    pepper: Option<String>,
    /// Serializes first-run bootstrap submissions within this process.
    bootstrap: Mutex<()>,
}

impl<U: UserRepository> AccessGate<U> {
    pub fn new(users: U) -> Self {
        Self {
            users,
            pepper: None,
            bootstrap: Mutex::new(()),
        }
    }

    pub fn with_pepper(users: U, pepper: String) -> Self {
        Self {
            users,
            pepper: Some(pepper),
            bootstrap: Mutex::new(()),
        }
    }

    /// Decide what the current cycle should show.
    ///
    /// A store failure propagates as an error — it is never interpreted
    /// as "no accounts exist".
    pub async fn evaluate(&self, session: &Session) -> VitroResult<GateState> {
        if session.authenticated {
            return Ok(GateState::Authenticated);
        }
        Ok(if self.users.any_exists().await? {
            GateState::Login
        } else {
            GateState::Setup
        })
    }

    /// Handle a first-run setup submission: create the initial
    /// administrator account.
    ///
    /// Submissions are serialized behind an in-process lock and the
    /// existence check is repeated under it, so two concurrent
    /// submissions cannot both provision an administrator — the loser
    /// observes [`BootstrapOutcome::AlreadyInitialized`].
    pub async fn bootstrap_admin(
        &self,
        username: &str,
        password: &str,
    ) -> VitroResult<BootstrapOutcome> {
        if username.is_empty() || password.is_empty() {
            return Ok(BootstrapOutcome::InvalidInput(
                "username and password must not be empty".into(),
            ));
        }

        let _guard = self.bootstrap.lock().await;

        if self.users.any_exists().await? {
            return Ok(BootstrapOutcome::AlreadyInitialized);
        }

        match self
            .users
            .create(CreateUser {
                username: username.to_string(),
                password: password.to_string(),
                is_admin: true,
            })
            .await?
        {
            CreateUserOutcome::Created(user) => {
                info!(username = %user.username, "administrator account provisioned");
                Ok(BootstrapOutcome::AdminCreated(user))
            }
            CreateUserOutcome::DuplicateUsername => Ok(BootstrapOutcome::Conflict),
            CreateUserOutcome::InvalidInput(reason) => Ok(BootstrapOutcome::InvalidInput(reason)),
        }
    }

    /// Handle a login submission.
    ///
    /// The order is fixed: lookup first, verify second. On success the
    /// returned session carries the identity and the role mapped from
    /// the account's admin flag.
    pub async fn login(&self, username: &str, password: &str) -> VitroResult<LoginOutcome> {
        if username.is_empty() || password.is_empty() {
            return Ok(LoginOutcome::InvalidCredentials);
        }

        let Some(user) = self.users.find_by_username(username).await? else {
            debug!("login attempt for unknown username");
            return Ok(LoginOutcome::InvalidCredentials);
        };

        let valid = password::verify_password(password, &user.password_hash, self.pepper.as_deref())
            .map_err(VitroError::from)?;

        if !valid {
            debug!(username = %user.username, "password mismatch");
            return Ok(LoginOutcome::InvalidCredentials);
        }

        Ok(LoginOutcome::Authenticated(Session::for_user(&user)))
    }

    /// Clear a session back to its initial unauthenticated value.
    pub fn logout(&self, session: Session) -> Session {
        if session.authenticated {
            debug!(identity = %session.identity, "session cleared");
        }
        Session::unauthenticated()
    }

    /// Create an additional account, available only to authenticated
    /// administrators.
    pub async fn create_user(
        &self,
        session: &Session,
        username: &str,
        password: &str,
        is_admin: bool,
    ) -> VitroResult<CreateUserOutcome> {
        if !session.is_admin() {
            return Err(VitroError::AuthorizationDenied {
                reason: "user management requires an administrator session".into(),
            });
        }

        self.users
            .create(CreateUser {
                username: username.to_string(),
                password: password.to_string(),
                is_admin,
            })
            .await
    }
}
