use serde::Deserialize;
use serde_json::json;

use flashstock_inventory::{
    CancelOutcome, ConfirmOutcome, Reservation, ReserveOutcome, StockItem,
};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: u64,
    pub total_quantity: u32,
    #[serde(default)]
    pub image_url: String,
}

#[derive(Debug, Deserialize)]
pub struct ReserveRequest {
    pub sku: String,
    pub requester_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub reservation_id: String,
    pub requester_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    pub reservation_id: String,
    pub requester_id: String,
}

// -------------------------
// Response mapping
// -------------------------

pub fn stock_item_to_json(item: &StockItem) -> serde_json::Value {
    json!({
        "sku": item.sku,
        "name": item.name,
        "description": item.description,
        "price_cents": item.price_cents,
        "image_url": item.image_url,
        "total_quantity": item.total_quantity,
        "available_quantity": item.available_quantity,
        "reserved_quantity": item.reserved_quantity,
        "in_stock": item.in_stock(),
    })
}

pub fn reserve_outcome_to_json(outcome: &ReserveOutcome) -> serde_json::Value {
    json!({
        "reservation_id": outcome.reservation.id,
        "sku": outcome.reservation.sku,
        "quantity": outcome.reservation.quantity,
        "expires_at": outcome.reservation.expires_at,
        "already_existed": outcome.already_existed,
    })
}

pub fn confirm_outcome_to_json(outcome: &ConfirmOutcome) -> serde_json::Value {
    json!({
        "reservation_id": outcome.reservation.id,
        "status": outcome.reservation.status,
        "sku": outcome.reservation.sku,
        "quantity": outcome.reservation.quantity,
        "already_confirmed": outcome.already_confirmed,
    })
}

pub fn cancel_outcome_to_json(outcome: &CancelOutcome) -> serde_json::Value {
    json!({
        "reservation_id": outcome.reservation.id,
        "status": outcome.reservation.status,
        "sku": outcome.reservation.sku,
        "quantity": outcome.reservation.quantity,
        "already_cancelled": outcome.already_cancelled,
    })
}

pub fn reservation_status_to_json(reservation: &Reservation) -> serde_json::Value {
    json!({
        "reservation_id": reservation.id,
        "sku": reservation.sku,
        "quantity": reservation.quantity,
        "status": reservation.status,
        "expires_at": reservation.expires_at,
        "created_at": reservation.created_at,
    })
}
