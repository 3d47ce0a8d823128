use async_trait::async_trait;

pub mod client;
pub mod dto;
pub mod error;
#[cfg(test)]
pub mod fake;

pub use client::GoogleOAuthClient;
pub use dto::{GoogleProfile, TokenResponse};
pub use error::OAuthError;

/// The two provider round trips of the authorization-code flow.
#[async_trait]
pub trait OAuthExchange: Send + Sync {
    fn client_id(&self) -> &str;

    /// Consent page the login view links to.
    fn authorization_url(&self) -> &str;

    async fn exchange_code(&self, code: &str) -> Result<TokenResponse, OAuthError>;

    async fn fetch_profile(&self, access_token: &str) -> Result<GoogleProfile, OAuthError>;
}
