//! Inventory domain module.
//!
//! This crate contains the records of the reservation flow — stock items
//! with their counter invariant, reservation lifecycle, operation outcome
//! types — implemented purely as deterministic domain logic (no IO, no
//! HTTP, no storage).

pub mod outcome;
pub mod reservation;
pub mod stock;

pub use outcome::{
    CancelOutcome, ConfirmOutcome, ReserveOutcome, SweepEntry, SweepOutcome, SweepReport,
};
pub use reservation::{Reservation, ReservationStatus};
pub use stock::{NewStockItem, StockItem};
