//! Demo catalog for local development.

use flashstock_core::Sku;
use flashstock_inventory::NewStockItem;
use tracing::{info, warn};

use crate::app::AppCoordinator;

/// Load a small demo catalog. Safe to call repeatedly: rows that already
/// exist are left alone.
pub fn seed_demo_catalog(coordinator: &AppCoordinator) {
    let items = [
        ("IPHONE15-PRO", "iPhone 15 Pro", 99_999_u64, 10_u32),
        ("MACBOOK-M3", "MacBook Pro M3", 159_999, 5),
        ("AIRPODS-PRO2", "AirPods Pro 2", 24_999, 25),
        ("PS5-CONSOLE", "PlayStation 5", 49_999, 3),
        ("NIKE-AIRMAX", "Nike Air Max 90", 12_999, 50),
        ("SWITCH-OLED", "Nintendo Switch OLED", 34_999, 2),
    ];

    let mut created = 0;
    for (sku, name, price_cents, total) in items {
        let input = NewStockItem {
            sku: Sku::parse(sku).expect("demo SKUs are valid"),
            name: name.to_string(),
            description: String::new(),
            price_cents,
            image_url: String::new(),
            total_quantity: total,
        };
        match coordinator.create_item(input) {
            Ok(_) => created += 1,
            Err(flashstock_core::DomainError::Conflict(_)) => {}
            Err(e) => warn!(sku, error = %e, "failed to seed demo item"),
        }
    }

    info!(created, "demo catalog seeded");
}
