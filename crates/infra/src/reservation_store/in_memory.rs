use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use flashstock_core::{RequesterId, ReservationId, Sku};
use flashstock_inventory::{Reservation, ReservationStatus};

use super::ReservationStore;
use crate::error::StorageError;

/// In-memory reservation store.
///
/// Intended for tests/dev. A single map lock is enough here: transitions
/// are per-record CAS updates applied under the write guard, and the
/// query paths are small scans.
#[derive(Debug, Default)]
pub struct InMemoryReservationStore {
    records: RwLock<HashMap<ReservationId, Reservation>>,
}

impl InMemoryReservationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StorageError {
    StorageError::Backend("reservation store lock poisoned".to_string())
}

/// Deadline guard tied to the target status: confirmation requires a
/// still-live hold, expiry requires the deadline to have passed.
fn deadline_allows(to: ReservationStatus, record: &Reservation, now: DateTime<Utc>) -> bool {
    match to {
        ReservationStatus::Confirmed => record.expires_at > now,
        ReservationStatus::Expired => record.expires_at <= now,
        _ => true,
    }
}

impl ReservationStore for InMemoryReservationStore {
    fn create(&self, reservation: Reservation) -> Result<Reservation, StorageError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        if records.contains_key(&reservation.id) {
            return Err(StorageError::Conflict(format!(
                "reservation {} already exists",
                reservation.id
            )));
        }
        records.insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    fn find_by_id(&self, id: &ReservationId) -> Result<Option<Reservation>, StorageError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.get(id).cloned())
    }

    fn find_active_for(
        &self,
        requester_id: &RequesterId,
        sku: &Sku,
        now: DateTime<Utc>,
    ) -> Result<Option<Reservation>, StorageError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records
            .values()
            .find(|r| r.requester_id == *requester_id && r.sku == *sku && r.is_live(now))
            .cloned())
    }

    fn transition(
        &self,
        id: &ReservationId,
        from: ReservationStatus,
        to: ReservationStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Reservation>, StorageError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        let Some(record) = records.get_mut(id) else {
            return Ok(None);
        };
        if record.status != from || !deadline_allows(to, record, now) {
            return Ok(None);
        }
        record.status = to;
        record.updated_at = now;
        Ok(Some(record.clone()))
    }

    fn list_expirable(&self, now: DateTime<Utc>) -> Result<Vec<Reservation>, StorageError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records
            .values()
            .filter(|r| r.status == ReservationStatus::Active && r.is_expired(now))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(ttl_secs: i64) -> Reservation {
        Reservation::new(
            Sku::parse("WIDGET").unwrap(),
            RequesterId::new("user-a").unwrap(),
            1,
            Duration::seconds(ttl_secs),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn create_rejects_duplicate_id() {
        let store = InMemoryReservationStore::new();
        let r = sample(300);
        store.create(r.clone()).unwrap();
        assert!(matches!(store.create(r), Err(StorageError::Conflict(_))));
    }

    #[test]
    fn find_active_for_matches_live_holds_only() {
        let store = InMemoryReservationStore::new();
        let live = sample(300);
        let stale = sample(0);
        store.create(live.clone()).unwrap();
        store.create(stale).unwrap();

        let found = store
            .find_active_for(&live.requester_id, &live.sku, Utc::now())
            .unwrap()
            .unwrap();
        assert_eq!(found.id, live.id);

        let other = RequesterId::new("user-b").unwrap();
        assert!(store
            .find_active_for(&other, &live.sku, Utc::now())
            .unwrap()
            .is_none());
    }

    #[test]
    fn transition_requires_matching_from_status() {
        let store = InMemoryReservationStore::new();
        let r = sample(300);
        store.create(r.clone()).unwrap();

        let confirmed = store
            .transition(
                &r.id,
                ReservationStatus::Active,
                ReservationStatus::Confirmed,
                Utc::now(),
            )
            .unwrap()
            .unwrap();
        assert_eq!(confirmed.status, ReservationStatus::Confirmed);

        // Second CAS from Active loses: the record has moved on.
        assert!(store
            .transition(
                &r.id,
                ReservationStatus::Active,
                ReservationStatus::Cancelled,
                Utc::now(),
            )
            .unwrap()
            .is_none());
    }

    #[test]
    fn confirm_transition_is_guarded_by_deadline() {
        let store = InMemoryReservationStore::new();
        let stale = sample(0);
        store.create(stale.clone()).unwrap();

        assert!(store
            .transition(
                &stale.id,
                ReservationStatus::Active,
                ReservationStatus::Confirmed,
                Utc::now(),
            )
            .unwrap()
            .is_none());

        // The expiry CAS is the one that applies to a stale hold.
        let expired = store
            .transition(
                &stale.id,
                ReservationStatus::Active,
                ReservationStatus::Expired,
                Utc::now(),
            )
            .unwrap()
            .unwrap();
        assert_eq!(expired.status, ReservationStatus::Expired);
    }

    #[test]
    fn expire_transition_rejects_live_holds() {
        let store = InMemoryReservationStore::new();
        let live = sample(300);
        store.create(live.clone()).unwrap();

        assert!(store
            .transition(
                &live.id,
                ReservationStatus::Active,
                ReservationStatus::Expired,
                Utc::now(),
            )
            .unwrap()
            .is_none());
    }

    #[test]
    fn list_expirable_returns_stale_active_records() {
        let store = InMemoryReservationStore::new();
        let live = sample(300);
        let stale = sample(0);
        store.create(live).unwrap();
        store.create(stale.clone()).unwrap();

        let expirable = store.list_expirable(Utc::now()).unwrap();
        assert_eq!(expirable.len(), 1);
        assert_eq!(expirable[0].id, stale.id);
    }

    #[test]
    fn transition_on_missing_record_is_no_match() {
        let store = InMemoryReservationStore::new();
        assert!(store
            .transition(
                &ReservationId::new(),
                ReservationStatus::Active,
                ReservationStatus::Expired,
                Utc::now(),
            )
            .unwrap()
            .is_none());
    }
}
