use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use flashstock_core::DomainError;

/// Map a domain error to its HTTP shape.
///
/// `InsufficientStock` and `Gone` are ordinary flow outcomes for shoppers
/// racing over limited stock; clients render them as messages, so the
/// body carries enough to decide on a retry.
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Forbidden => json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "reservation belongs to another requester",
        ),
        DomainError::InsufficientStock {
            requested,
            available,
        } => (
            StatusCode::CONFLICT,
            axum::Json(json!({
                "error": "insufficient_stock",
                "message": "insufficient stock available",
                "requested_quantity": requested,
                "available_quantity": available,
            })),
        )
            .into_response(),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::Gone => json_error(StatusCode::GONE, "gone", "reservation has expired"),
        DomainError::Storage(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", msg)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
