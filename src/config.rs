use std::str::FromStr;

use anyhow::Context;
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

/// Where Google sends the browser back after consent.
pub const REDIRECT_URI: &str = "http://localhost:8080/auth/google/callback";

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub ttl_minutes: i64,
    pub gc_interval_secs: u64,
}

/// Either a full `DATABASE_URL` or the discrete `DB_*` settings.
#[derive(Debug, Clone, Deserialize)]
pub enum DatabaseConfig {
    Url(String),
    Parts {
        host: String,
        port: u16,
        user: String,
        password: String,
        name: String,
    },
}

impl DatabaseConfig {
    /// Discrete settings are passed through as-is, so passwords need no escaping.
    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        match self {
            DatabaseConfig::Url(url) => PgConnectOptions::from_str(url).context("parse DATABASE_URL"),
            DatabaseConfig::Parts {
                host,
                port,
                user,
                password,
                name,
            } => {
                let mut opts = PgConnectOptions::new()
                    .host(host)
                    .port(*port)
                    .username(user)
                    .database(name)
                    .ssl_mode(PgSslMode::Disable);
                if !password.is_empty() {
                    opts = opts.password(password);
                }
                Ok(opts)
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_env: String,
    pub database: DatabaseConfig,
    pub google: GoogleConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database = match std::env::var("DATABASE_URL") {
            Ok(url) => DatabaseConfig::Url(url),
            Err(_) => database_from_parts()?,
        };
        let google = GoogleConfig {
            client_id: std::env::var("GOOGLE_CLIENT_ID").context("GOOGLE_CLIENT_ID")?,
            client_secret: std::env::var("GOOGLE_CLIENT_SECRET").context("GOOGLE_CLIENT_SECRET")?,
            redirect_uri: REDIRECT_URI.into(),
        };
        let session = SessionConfig {
            cookie_name: "session_id".into(),
            ttl_minutes: std::env::var("SESSION_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24),
            gc_interval_secs: std::env::var("SESSION_GC_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(10),
        };
        Ok(Self {
            app_env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            database,
            google,
            session,
        })
    }

    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}

fn database_from_parts() -> anyhow::Result<DatabaseConfig> {
    Ok(DatabaseConfig::Parts {
        host: std::env::var("DB_HOST").context("DB_HOST or DATABASE_URL")?,
        port: std::env::var("DB_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(5432),
        user: std::env::var("DB_USER").context("DB_USER")?,
        password: std::env::var("DB_PASSWORD").unwrap_or_default(),
        name: std::env::var("DB_NAME").context("DB_NAME")?,
    })
}
