use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use flashstock_core::{RequesterId, ReservationId};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/confirm", post(confirm))
        .route("/cancel", post(cancel))
        .route("/status/:reservation_id", get(status))
        .route("/cleanup", post(cleanup))
}

fn parse_ids(
    reservation_id: &str,
    requester_id: String,
) -> Result<(ReservationId, RequesterId), axum::response::Response> {
    let reservation_id: ReservationId = reservation_id
        .parse()
        .map_err(errors::domain_error_to_response)?;
    let requester_id = RequesterId::new(requester_id).map_err(errors::domain_error_to_response)?;
    Ok((reservation_id, requester_id))
}

pub async fn confirm(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ConfirmRequest>,
) -> axum::response::Response {
    let (reservation_id, requester_id) = match parse_ids(&body.reservation_id, body.requester_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.coordinator.confirm(&reservation_id, &requester_id) {
        Ok(outcome) => {
            (StatusCode::OK, Json(dto::confirm_outcome_to_json(&outcome))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn cancel(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CancelRequest>,
) -> axum::response::Response {
    let (reservation_id, requester_id) = match parse_ids(&body.reservation_id, body.requester_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.coordinator.cancel(&reservation_id, &requester_id) {
        Ok(outcome) => {
            (StatusCode::OK, Json(dto::cancel_outcome_to_json(&outcome))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(raw_id): Path<String>,
) -> axum::response::Response {
    let reservation_id: ReservationId = match raw_id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.coordinator.status(&reservation_id) {
        Ok(reservation) => (
            StatusCode::OK,
            Json(dto::reservation_status_to_json(&reservation)),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Administrative trigger for one sweep cycle, alongside the timer.
pub async fn cleanup(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.coordinator.sweep_once() {
        Ok(report) => (StatusCode::OK, Json(serde_json::json!(report))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
