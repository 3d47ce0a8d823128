use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::{header, Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};

use super::{
    dto::{GoogleProfile, TokenResponse},
    error::{truncate_body, OAuthError},
    OAuthExchange,
};
use crate::config::GoogleConfig;

const REQUEST_TIMEOUT_SECS: u64 = 30;

const SCOPES: &str = "openid email profile";

/// Provider URLs; overridable so the client can be pointed at a local server.
#[derive(Debug, Clone)]
pub struct GoogleEndpoints {
    pub authorize: String,
    pub token: String,
    pub userinfo: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            authorize: "https://accounts.google.com/o/oauth2/v2/auth".into(),
            token: "https://oauth2.googleapis.com/token".into(),
            userinfo: "https://www.googleapis.com/oauth2/v1/userinfo".into(),
        }
    }
}

pub struct GoogleOAuthClient {
    client: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    endpoints: GoogleEndpoints,
    authorization_url: String,
}

impl GoogleOAuthClient {
    pub fn new(config: &GoogleConfig) -> anyhow::Result<Self> {
        Self::with_endpoints(config, GoogleEndpoints::default())
    }

    pub fn with_endpoints(config: &GoogleConfig, endpoints: GoogleEndpoints) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("build http client")?;

        let authorization_url = Url::parse_with_params(
            &endpoints.authorize,
            &[
                ("client_id", config.client_id.as_str()),
                ("redirect_uri", config.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", SCOPES),
            ],
        )
        .context("authorization endpoint")?
        .to_string();

        Ok(Self {
            client,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            endpoints,
            authorization_url,
        })
    }

    /// Fails on any non-200 status, logging the (truncated) body.
    async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, OAuthError> {
        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::OK {
            let body = truncate_body(&body);
            error!(%status, body = %body, "{} failed", what);
            return Err(OAuthError::Status { status, body });
        }
        serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, body = %truncate_body(&body), "{} returned malformed json", what);
            OAuthError::InvalidResponse(e.to_string())
        })
    }
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[async_trait]
impl OAuthExchange for GoogleOAuthClient {
    fn client_id(&self) -> &str {
        &self.client_id
    }

    fn authorization_url(&self) -> &str {
        &self.authorization_url
    }

    #[instrument(skip_all)]
    async fn exchange_code(&self, code: &str) -> Result<TokenResponse, OAuthError> {
        let response = self
            .client
            .post(&self.endpoints.token)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await?;

        let token: TokenResponse = Self::read_json(response, "token exchange").await?;
        if token.access_token.is_empty() {
            return Err(OAuthError::InvalidResponse("empty access_token".into()));
        }
        debug!(
            token_type = %token.token_type,
            expires_in = token.expires_in,
            scope = token.scope.as_deref(),
            "access token obtained"
        );
        Ok(token)
    }

    #[instrument(skip_all)]
    async fn fetch_profile(&self, access_token: &str) -> Result<GoogleProfile, OAuthError> {
        let response = self
            .client
            .get(&self.endpoints.userinfo)
            .query(&[("access_token", access_token)])
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let profile: GoogleProfile = Self::read_json(response, "user info").await?;
        if !is_valid_email(&profile.email) {
            return Err(OAuthError::InvalidResponse(format!(
                "profile email {:?} is not valid",
                profile.email
            )));
        }
        debug!(provider_id = %profile.id, "profile fetched");
        Ok(profile)
    }
}
