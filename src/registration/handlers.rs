use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{instrument, warn};

use super::dto::{RegisterRequest, RegisteredResponse};
use super::services::register_account;
use crate::{error::AppError, state::AppState};

pub fn register_routes() -> Router<AppState> {
    Router::new().route("/register", post(register))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisteredResponse>), AppError> {
    let Json(req) = payload.map_err(|e| {
        warn!(error = %e, "unreadable register body");
        AppError::BadRequest(e.body_text())
    })?;

    register_account(&state, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisteredResponse {
            success: true,
            message: "account registered".into(),
        }),
    ))
}
