//! Reservation: a time-boxed hold on stock pending purchase confirmation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use flashstock_core::{DomainError, DomainResult, RequesterId, ReservationId, Sku};

/// Lifecycle status of a reservation.
///
/// `Active` is the only state a transition can leave; the other three are
/// absorbing. Records are never deleted by the core — a terminal record
/// stays around for audit and idempotent replays.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Active,
    Confirmed,
    Cancelled,
    Expired,
}

impl ReservationStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReservationStatus::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Active => "active",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Expired => "expired",
        }
    }
}

impl core::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A hold on `quantity` units of one SKU for one requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub sku: Sku,
    pub requester_id: RequesterId,
    pub quantity: u32,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    /// Fixed at creation (`created_at + TTL`); never extended.
    pub expires_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Create a fresh `Active` hold with a newly generated identifier.
    pub fn new(
        sku: Sku,
        requester_id: RequesterId,
        quantity: u32,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if quantity < 1 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        Ok(Self {
            id: ReservationId::new(),
            sku,
            requester_id,
            quantity,
            status: ReservationStatus::Active,
            created_at: now,
            expires_at: now + ttl,
            updated_at: now,
        })
    }

    /// Whether the hold's deadline has passed, regardless of status.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// An active, unexpired hold — the only kind that blocks a second
    /// reserve for the same (requester, sku) pair.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.status == ReservationStatus::Active && !self.is_expired(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample(ttl_secs: i64) -> Reservation {
        Reservation::new(
            Sku::parse("WIDGET").unwrap(),
            RequesterId::new("user-a").unwrap(),
            2,
            Duration::seconds(ttl_secs),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn new_reservation_is_live() {
        let r = sample(300);
        assert_eq!(r.status, ReservationStatus::Active);
        assert!(r.is_live(Utc::now()));
        assert_eq!(r.expires_at, r.created_at + Duration::seconds(300));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let err = Reservation::new(
            Sku::parse("WIDGET").unwrap(),
            RequesterId::new("user-a").unwrap(),
            0,
            Duration::minutes(5),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn past_deadline_means_expired_even_while_active() {
        let r = sample(0);
        assert!(r.is_expired(Utc::now()));
        assert!(!r.is_live(Utc::now()));
        // Still active: marking it expired is the coordinator's job.
        assert_eq!(r.status, ReservationStatus::Active);
    }

    #[test]
    fn only_active_is_non_terminal() {
        assert!(!ReservationStatus::Active.is_terminal());
        for s in [
            ReservationStatus::Confirmed,
            ReservationStatus::Cancelled,
            ReservationStatus::Expired,
        ] {
            assert!(s.is_terminal());
        }
    }

    proptest! {
        #[test]
        fn expiry_deadline_is_created_at_plus_ttl(ttl_secs in 1i64..86_400) {
            let r = sample(ttl_secs);
            prop_assert_eq!(r.expires_at - r.created_at, Duration::seconds(ttl_secs));
            prop_assert!(!r.is_expired(r.created_at));
            prop_assert!(r.is_expired(r.expires_at));
        }
    }
}
