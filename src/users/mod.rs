use crate::state::AppState;
use axum::Router;

pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod repo;
pub mod repo_types;

pub use repo::{CredentialStore, PgCredentialStore};
pub use repo_types::{NewUser, User};

pub fn router() -> Router<AppState> {
    handlers::users_routes()
}
