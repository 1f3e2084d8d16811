//! Reservation store port: lifecycle records with CAS status transitions.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use flashstock_core::{RequesterId, ReservationId, Sku};
use flashstock_inventory::{Reservation, ReservationStatus};

use crate::error::StorageError;

mod in_memory;

pub use in_memory::InMemoryReservationStore;

/// Durable record of reservation lifecycle.
///
/// `transition` is the compare-and-swap that makes every terminal
/// transition happen at most once: it succeeds only if the record's
/// current status equals `from`, applied atomically with respect to all
/// concurrent callers. Deadline guards ride along with the target status:
/// a record can only become `Confirmed` while `expires_at` is still in
/// the future, and only become `Expired` once it is not. `Ok(None)` means
/// the precondition did not hold (the caller lost a race or the deadline
/// guard failed) — never an error.
pub trait ReservationStore: Send + Sync {
    /// Persist a fresh record. Fails with `Conflict` if the id exists.
    fn create(&self, reservation: Reservation) -> Result<Reservation, StorageError>;

    fn find_by_id(&self, id: &ReservationId) -> Result<Option<Reservation>, StorageError>;

    /// The single active, unexpired reservation for this (requester, sku)
    /// pair, if any. Backs the idempotent reserve path.
    fn find_active_for(
        &self,
        requester_id: &RequesterId,
        sku: &Sku,
        now: DateTime<Utc>,
    ) -> Result<Option<Reservation>, StorageError>;

    /// CAS the record `from` → `to`, bumping `updated_at` to `now`.
    fn transition(
        &self,
        id: &ReservationId,
        from: ReservationStatus,
        to: ReservationStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Reservation>, StorageError>;

    /// All `Active` records whose deadline has passed, for the sweeper.
    fn list_expirable(&self, now: DateTime<Utc>) -> Result<Vec<Reservation>, StorageError>;
}

impl<S> ReservationStore for Arc<S>
where
    S: ReservationStore + ?Sized,
{
    fn create(&self, reservation: Reservation) -> Result<Reservation, StorageError> {
        (**self).create(reservation)
    }

    fn find_by_id(&self, id: &ReservationId) -> Result<Option<Reservation>, StorageError> {
        (**self).find_by_id(id)
    }

    fn find_active_for(
        &self,
        requester_id: &RequesterId,
        sku: &Sku,
        now: DateTime<Utc>,
    ) -> Result<Option<Reservation>, StorageError> {
        (**self).find_active_for(requester_id, sku, now)
    }

    fn transition(
        &self,
        id: &ReservationId,
        from: ReservationStatus,
        to: ReservationStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Reservation>, StorageError> {
        (**self).transition(id, from, to, now)
    }

    fn list_expirable(&self, now: DateTime<Utc>) -> Result<Vec<Reservation>, StorageError> {
        (**self).list_expirable(now)
    }
}
