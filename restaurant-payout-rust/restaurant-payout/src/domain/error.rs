use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use restaurant_wallet_core::LedgerError;
use serde::{Deserialize, Serialize};
use std::fmt;

fn error_body(error_type: &str, message: &str) -> serde_json::Value {
    serde_json::json!({
        "error": error_type,
        "message": message,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })
}

/// Main error type for the payout service
#[derive(Debug, Clone)]
pub enum ApiError {
    Auth(AuthError),

    // Withdrawal rules and lookups
    Ledger(LedgerError),

    // Malformed query or body
    BadRequest(String),

    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Auth(e) => write!(f, "Authentication error: {e}"),
            ApiError::Ledger(e) => write!(f, "{e}"),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {msg}"),
            ApiError::Internal(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    fn to_http_response(&self) -> (StatusCode, serde_json::Value) {
        match self {
            ApiError::Auth(e) => e.to_http_response(),
            ApiError::Ledger(e) => ledger_response(e),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, error_body("BAD_REQUEST", msg)),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Unhandled server error");
                internal_response()
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Auth(AuthError::Forbidden(_)) => StatusCode::FORBIDDEN,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Ledger(LedgerError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Ledger(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (status_code, body) = self.to_http_response();
        HttpResponse::build(status_code).json(body)
    }
}

fn internal_response() -> (StatusCode, serde_json::Value) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        error_body("INTERNAL_ERROR", "Internal server error"),
    )
}

fn ledger_response(err: &LedgerError) -> (StatusCode, serde_json::Value) {
    let (status_code, error_type) = match err {
        LedgerError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        LedgerError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        LedgerError::PendingRequestExists(_) => (StatusCode::BAD_REQUEST, "PENDING_REQUEST_EXISTS"),
        LedgerError::InsufficientBalance { .. } => (StatusCode::BAD_REQUEST, "INSUFFICIENT_BALANCE"),
        LedgerError::InvalidState(_) => (StatusCode::BAD_REQUEST, "INVALID_STATE"),
        LedgerError::Storage(detail) => {
            // Details stay in the log, never in the response.
            tracing::error!(error = %detail, "Storage failure");
            return internal_response();
        }
    };

    (status_code, error_body(error_type, &err.to_string()))
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError::Ledger(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Ledger(LedgerError::from(err))
    }
}

// Authentication Errors
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum AuthError {
    MissingToken,
    InvalidToken(String),
    Forbidden(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Missing bearer token"),
            AuthError::InvalidToken(msg) => write!(f, "Invalid token: {msg}"),
            AuthError::Forbidden(msg) => write!(f, "Forbidden: {msg}"),
        }
    }
}

impl AuthError {
    pub fn to_http_response(&self) -> (StatusCode, serde_json::Value) {
        let (status_code, error_type) = match self {
            AuthError::MissingToken | AuthError::InvalidToken(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AuthError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
        };

        (status_code, error_body(error_type, &self.to_string()))
    }
}
