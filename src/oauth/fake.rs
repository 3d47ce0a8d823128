use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{GoogleProfile, OAuthError, OAuthExchange, TokenResponse};

/// Provider double that answers from a fixed script and counts calls.
pub struct ScriptedOAuth {
    token: Option<String>,
    profile: Option<GoogleProfile>,
    exchanges: AtomicUsize,
    fetches: AtomicUsize,
}

impl ScriptedOAuth {
    pub fn new(access_token: &str, name: &str, email: &str) -> Self {
        Self {
            token: Some(access_token.to_string()),
            profile: Some(GoogleProfile {
                id: "1077".into(),
                name: name.to_string(),
                email: email.to_string(),
            }),
            exchanges: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Token endpoint answers 400.
    pub fn rejecting_code() -> Self {
        Self {
            token: None,
            ..Self::new("", "", "")
        }
    }

    /// Token succeeds, profile endpoint answers 401.
    pub fn rejecting_token(access_token: &str) -> Self {
        Self {
            profile: None,
            ..Self::new(access_token, "", "")
        }
    }

    pub fn exchanges(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OAuthExchange for ScriptedOAuth {
    fn client_id(&self) -> &str {
        "test-client-id"
    }

    fn authorization_url(&self) -> &str {
        "https://accounts.example.test/auth?client_id=test-client-id&response_type=code"
    }

    async fn exchange_code(&self, _code: &str) -> Result<TokenResponse, OAuthError> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        match &self.token {
            Some(t) => Ok(TokenResponse {
                access_token: t.clone(),
                token_type: "Bearer".into(),
                expires_in: Some(3599),
                scope: Some("openid email profile".into()),
            }),
            None => Err(OAuthError::Status {
                status: reqwest::StatusCode::BAD_REQUEST,
                body: r#"{"error":"invalid_grant"}"#.into(),
            }),
        }
    }

    async fn fetch_profile(&self, _access_token: &str) -> Result<GoogleProfile, OAuthError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.profile.clone().ok_or(OAuthError::Status {
            status: reqwest::StatusCode::UNAUTHORIZED,
            body: r#"{"error":"invalid_token"}"#.into(),
        })
    }
}
