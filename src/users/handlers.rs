use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::{error::AppError, state::AppState, users::repo_types::User};

pub fn users_routes() -> Router<AppState> {
    Router::new().route("/", get(list_users))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let users = state
        .users
        .list()
        .await
        .map_err(|e| AppError::store("Failed to fetch user", e))?;
    Ok(Json(users))
}
