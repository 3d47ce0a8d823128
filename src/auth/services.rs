use std::sync::Arc;

use axum::extract::FromRef;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    error::AppError,
    oauth::{GoogleProfile, OAuthExchange},
    sessions::{Session, SessionManager},
    state::AppState,
    users::{CredentialStore, NewUser, User},
};

/// Authorization parameters handed to the login view.
#[derive(Debug, Clone)]
pub struct LoginPage {
    pub client_id: String,
    pub authorization_url: String,
}

#[derive(Debug)]
pub enum LoginStart {
    /// Session already carries a user; skip the provider round trip.
    AlreadyAuthenticated,
    Render(LoginPage),
}

#[derive(Debug)]
pub struct CallbackOutcome {
    pub code: String,
    pub access_token: String,
    pub user: User,
    pub session: Session,
}

/// Drives the per-browser `Anonymous -> Authenticated -> Anonymous` flow.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn CredentialStore>,
    sessions: SessionManager,
    oauth: Arc<dyn OAuthExchange>,
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.users.clone(), state.sessions.clone(), state.oauth.clone())
    }
}

impl AuthService {
    pub fn new(
        users: Arc<dyn CredentialStore>,
        sessions: SessionManager,
        oauth: Arc<dyn OAuthExchange>,
    ) -> Self {
        Self {
            users,
            sessions,
            oauth,
        }
    }

    async fn load_session(&self, cookie: Option<&str>) -> Result<Session, AppError> {
        self.sessions.get(cookie).await.map_err(AppError::SessionLoad)
    }

    pub async fn start_login(&self, cookie: Option<&str>) -> Result<LoginStart, AppError> {
        let session = self.load_session(cookie).await?;
        if session.user_id().is_some() {
            return Ok(LoginStart::AlreadyAuthenticated);
        }
        Ok(LoginStart::Render(LoginPage {
            client_id: self.oauth.client_id().to_string(),
            authorization_url: self.oauth.authorization_url().to_string(),
        }))
    }

    /// Completes the provider flow and marks the session authenticated.
    /// The session is only written once every earlier step has succeeded.
    pub async fn handle_callback(
        &self,
        code: &str,
        cookie: Option<&str>,
    ) -> Result<CallbackOutcome, AppError> {
        if code.is_empty() {
            return Err(AppError::MissingCode);
        }

        let token = self
            .oauth
            .exchange_code(code)
            .await
            .map_err(AppError::TokenExchange)?;

        let profile = self
            .oauth
            .fetch_profile(&token.access_token)
            .await
            .map_err(AppError::ProfileFetch)?;

        let user = self.upsert_user(&profile).await?;

        let mut session = self.load_session(cookie).await?;
        session.set_user_id(user.id);
        self.sessions
            .save(&session)
            .await
            .map_err(AppError::SessionPersist)?;

        info!(user_id = %user.id, email = %user.email, "user logged in");
        Ok(CallbackOutcome {
            code: code.to_string(),
            access_token: token.access_token,
            user,
            session,
        })
    }

    /// Existing users are returned as stored; a lookup failure is an error,
    /// not a reason to create a second account.
    async fn upsert_user(&self, profile: &GoogleProfile) -> Result<User, AppError> {
        let email = profile.email.trim().to_lowercase();
        let existing = self
            .users
            .find_by_email(&email)
            .await
            .map_err(|e| AppError::store("Failed to fetch user", e))?;

        if let Some(user) = existing {
            debug!(user_id = %user.id, "existing user");
            return Ok(user);
        }

        let user = self
            .users
            .create(NewUser::from_oauth(&profile.name, &email))
            .await
            .map_err(|e| AppError::store("Failed to create user", e))?;
        info!(user_id = %user.id, email = %user.email, "user created");
        Ok(user)
    }

    pub async fn check_protected(&self, cookie: Option<&str>) -> Result<Uuid, AppError> {
        let session = self.load_session(cookie).await?;
        session.user_id().ok_or(AppError::Unauthorized)
    }

    pub async fn logout(&self, cookie: Option<&str>) -> Result<Session, AppError> {
        let mut session = self.load_session(cookie).await?;
        let Some(user_id) = session.user_id() else {
            warn!("logout without an authenticated session");
            return Err(AppError::Unauthorized);
        };

        session.clear_user_id();
        self.sessions
            .save(&session)
            .await
            .map_err(AppError::SessionPersist)?;

        info!(%user_id, "user logged out");
        Ok(session)
    }
}
