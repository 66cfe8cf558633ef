//! HTTP-facing error type and the JSON envelope it renders to.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    accounts::RepoError,
    auth::services::LoginError,
    registration::{services::RegistrationError, validation::Violation},
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid request body: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Login(#[from] LoginError),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Registration(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            AppError::Login(LoginError::InvalidCredentials) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Registration(RegistrationError::DuplicateEmail(_)) => "DUPLICATE_EMAIL",
            AppError::Registration(RegistrationError::ValidationFailed(_)) => "VALIDATION_FAILED",
            AppError::Login(LoginError::InvalidCredentials) => "INVALID_CREDENTIALS",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            _ => "INTERNAL_ERROR",
        }
    }

    /// Server-side details never reach the client.
    pub fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            "internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let violations = match &self {
            AppError::Registration(RegistrationError::ValidationFailed(v)) => v.clone(),
            _ => Vec::new(),
        };
        let body = ErrorEnvelope {
            success: false,
            error: ErrorBody {
                code: self.error_code(),
                message: self.public_message(),
                violations,
            },
        };
        (status, Json(body)).into_response()
    }
}
