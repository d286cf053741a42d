use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{debug, error};

use crate::domain::Principal;
use crate::error::OrderError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

#[derive(Debug)]
pub enum ApiError {
    /// No principal on the request; the auth layer should have stopped it.
    Unauthenticated,
    Order(OrderError),
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        ApiError::Order(err)
    }
}

/// Malformed or mistyped bodies are bad input, not a separate 422 class.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Order(OrderError::InvalidInput(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match &self {
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "Unauthenticated",
                "Not authorized, no user".to_string(),
            ),
            ApiError::Order(err) => {
                let status = match err {
                    OrderError::InvalidInput(_) | OrderError::EmptyCart | OrderError::InsufficientStock(_) => {
                        StatusCode::BAD_REQUEST
                    }
                    OrderError::Forbidden(_) => StatusCode::FORBIDDEN,
                    OrderError::NotFound(_) => StatusCode::NOT_FOUND,
                    OrderError::InvalidTransition { .. } => StatusCode::CONFLICT,
                    OrderError::StorageFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.kind(), err.to_string())
            }
        };

        if status.is_server_error() {
            error!(status = status.as_u16(), kind, message = %message, "Request failed");
        } else {
            debug!(status = status.as_u16(), kind, message = %message, "Request rejected");
        }

        (status, Json(json!({ "success": false, "kind": kind, "message": message }))).into_response()
    }
}

/// Reads the principal the auth layer attached to the request.
pub fn principal_from_headers(headers: &HeaderMap) -> Result<Principal, ApiError> {
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::Unauthenticated)?;

    let is_admin = headers
        .get(USER_ROLE_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|role| role.eq_ignore_ascii_case("admin"));

    Ok(Principal {
        user_id: user_id.to_string(),
        is_admin,
    })
}
