//! `flashstock-infra` — storage ports, adapters, and the reservation
//! coordinator.
//!
//! Layout:
//! - `stock_ledger/`: per-SKU counter storage with conditional atomic deltas
//! - `reservation_store/`: reservation records with compare-and-swap
//!   status transitions
//! - `coordinator`: the reserve/confirm/cancel/expire state machine,
//!   generic over both ports
//! - `sweeper`: background worker reclaiming expired holds

pub mod coordinator;
pub mod reservation_store;
pub mod stock_ledger;
pub mod sweeper;

mod error;

pub use coordinator::{CoordinatorConfig, ReservationCoordinator};
pub use error::StorageError;
pub use reservation_store::{InMemoryReservationStore, ReservationStore};
pub use stock_ledger::{InMemoryStockLedger, StockLedger};
pub use sweeper::{ExpirySweeper, SweeperConfig, SweeperHandle, SweeperStats};
