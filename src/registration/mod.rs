use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
pub mod services;
pub mod validation;

pub fn router() -> Router<AppState> {
    handlers::register_routes()
}
