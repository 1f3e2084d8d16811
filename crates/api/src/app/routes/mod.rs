use axum::Router;

pub mod checkout;
pub mod inventory;
pub mod system;

pub fn router() -> Router {
    Router::new()
        .nest("/inventory", inventory::router())
        .nest("/checkout", checkout::router())
}
