use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, MeResponse, TokenResponse},
        extractors::AuthUser,
        services,
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Json(req) = payload.map_err(|e| {
        warn!(error = %e, "unreadable login body");
        AppError::BadRequest(e.body_text())
    })?;

    let token = services::login(&state, req).await?;
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
) -> Result<Json<MeResponse>, AppError> {
    let account = state
        .accounts
        .find_by_id(account_id)
        .await
        .map_err(|e| {
            error!(error = %e, account_id, "find_by_id failed");
            AppError::from(e)
        })?
        .ok_or_else(|| {
            warn!(account_id, "token for missing account");
            AppError::Unauthorized("account no longer exists")
        })?;

    let profile = services::load_profile(&state, &account).await?;
    Ok(Json(MeResponse { account, profile }))
}
