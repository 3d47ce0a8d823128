use std::time::Duration;

mod app;
mod auth;
mod config;
mod error;
mod oauth;
mod sessions;
mod state;
mod users;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "signin=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let backends = state::AppState::init().await?;
    let config = backends.state.config.clone();
    if config.is_development() {
        tracing::info!("the app is running in development env");
    }

    // Run migrations if present
    if let Err(e) = sqlx::migrate!("./migrations").run(&backends.db).await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }

    sessions::spawn_gc(
        backends.session_store.clone(),
        Duration::from_secs(config.session.gc_interval_secs.max(1)),
    );

    app::serve(app::build_app(backends.state)).await
}
