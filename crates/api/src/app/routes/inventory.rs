use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use flashstock_core::{RequesterId, Sku};
use flashstock_inventory::NewStockItem;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/reserve", post(reserve))
        .route("/:sku", get(get_item))
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.coordinator.list_items() {
        Ok(items) => {
            let body: Vec<_> = items.iter().map(dto::stock_item_to_json).collect();
            (StatusCode::OK, Json(serde_json::json!(body))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(raw_sku): Path<String>,
) -> axum::response::Response {
    let sku = match Sku::parse(&raw_sku) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.coordinator.get_item(&sku) {
        Ok(item) => (StatusCode::OK, Json(dto::stock_item_to_json(&item))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateItemRequest>,
) -> axum::response::Response {
    let sku = match Sku::parse(&body.sku) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let input = NewStockItem {
        sku,
        name: body.name,
        description: body.description,
        price_cents: body.price_cents,
        image_url: body.image_url,
        total_quantity: body.total_quantity,
    };

    match services.coordinator.create_item(input) {
        Ok(item) => (StatusCode::CREATED, Json(dto::stock_item_to_json(&item))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn reserve(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ReserveRequest>,
) -> axum::response::Response {
    let sku = match Sku::parse(&body.sku) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let requester_id = match RequesterId::new(body.requester_id) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.coordinator.reserve(&sku, &requester_id, body.quantity) {
        Ok(outcome) => {
            // 200 for an idempotent replay, 201 for a fresh hold.
            let status = if outcome.already_existed {
                StatusCode::OK
            } else {
                StatusCode::CREATED
            };
            (status, Json(dto::reserve_outcome_to_json(&outcome))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}
