use axum::{
    extract::{rejection::QueryRejection, FromRef, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use axum_extra::extract::CookieJar;
use tracing::instrument;

use crate::{
    auth::{
        dto::{CallbackQuery, CallbackResponse, MessageResponse, ProtectedResponse},
        services::{AuthService, LoginStart},
        views,
    },
    error::AppError,
    sessions::cookie::{session_id, with_session_cookie},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login))
        .route("/auth/google/callback", get(google_callback))
        .route("/protected", get(protected))
        .route("/logout", get(logout))
}

#[instrument(skip(state, jar))]
pub async fn login(State(state): State<AppState>, jar: CookieJar) -> Result<Response, AppError> {
    let auth = AuthService::from_ref(&state);
    let cookie = session_id(&jar, &state.config.session.cookie_name);
    match auth.start_login(cookie).await? {
        LoginStart::AlreadyAuthenticated => Ok(Redirect::to("/protected").into_response()),
        LoginStart::Render(page) => Ok(views::login(&page).into_response()),
    }
}

#[instrument(skip(state, jar, query))]
pub async fn google_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    query: Result<Query<CallbackQuery>, QueryRejection>,
) -> Result<(CookieJar, Json<CallbackResponse>), AppError> {
    // An unreadable query string carries no usable code.
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let auth = AuthService::from_ref(&state);
    let cfg = &state.config.session;
    let out = auth
        .handle_callback(query.code(), session_id(&jar, &cfg.cookie_name))
        .await?;

    let jar = with_session_cookie(jar, &cfg.cookie_name, out.session.id(), state.sessions.ttl());
    Ok((
        jar,
        Json(CallbackResponse {
            code: out.code,
            access_token: out.access_token,
            data: out.user,
        }),
    ))
}

#[instrument(skip(state, jar))]
pub async fn protected(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<ProtectedResponse>, AppError> {
    let auth = AuthService::from_ref(&state);
    let user_id = auth
        .check_protected(session_id(&jar, &state.config.session.cookie_name))
        .await?;
    Ok(Json(ProtectedResponse {
        message: "Welcome to the protected route!".into(),
        user_id,
    }))
}

#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<MessageResponse>), AppError> {
    let auth = AuthService::from_ref(&state);
    let cfg = &state.config.session;
    let session = auth.logout(session_id(&jar, &cfg.cookie_name)).await?;

    let jar = with_session_cookie(jar, &cfg.cookie_name, session.id(), state.sessions.ttl());
    Ok((
        jar,
        Json(MessageResponse {
            message: "Logged out successfully".into(),
        }),
    ))
}
