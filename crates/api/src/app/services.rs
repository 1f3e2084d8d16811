//! Infrastructure wiring for the HTTP surface.

use std::sync::Arc;

use flashstock_infra::{
    CoordinatorConfig, InMemoryReservationStore, InMemoryStockLedger, ReservationCoordinator,
};

use crate::config::Config;

/// The concrete coordinator this binary runs: in-memory adapters behind
/// the storage ports.
pub type AppCoordinator =
    ReservationCoordinator<Arc<InMemoryStockLedger>, Arc<InMemoryReservationStore>>;

/// Shared application services, one instance per process (or per test
/// server).
pub struct AppServices {
    pub coordinator: Arc<AppCoordinator>,
}

/// Construct the stores and coordinator from configuration.
pub fn build_services(config: &Config) -> AppServices {
    let ledger = Arc::new(InMemoryStockLedger::new());
    let store = Arc::new(InMemoryReservationStore::new());
    let coordinator = Arc::new(ReservationCoordinator::new(
        ledger,
        store,
        CoordinatorConfig {
            reservation_ttl: config.reservation_ttl,
        },
    ));
    AppServices { coordinator }
}
