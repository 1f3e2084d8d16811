//! Tagged outcomes of coordinator operations.
//!
//! Idempotent replays return the prior result with a flag rather than an
//! error: retrying a reserve/confirm/cancel is ordinary behavior under
//! at-least-once request delivery, not an exceptional condition.

use serde::{Deserialize, Serialize};

use flashstock_core::{ReservationId, Sku};

use crate::reservation::Reservation;

/// Result of a reserve call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveOutcome {
    pub reservation: Reservation,
    /// True when an active hold already covered this (requester, sku) pair
    /// and was returned verbatim instead of creating a second one.
    pub already_existed: bool,
}

/// Result of a confirm call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmOutcome {
    pub reservation: Reservation,
    /// True when the hold was already confirmed (retried call); stock was
    /// deducted by the first confirmation only.
    pub already_confirmed: bool,
}

/// Result of a cancel call.
///
/// An already-expired hold also reports `already_cancelled`: from the
/// requester's point of view both terminal states mean "this hold no
/// longer claims stock". The record's real status is preserved in
/// `reservation.status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOutcome {
    pub reservation: Reservation,
    pub already_cancelled: bool,
}

/// What happened to one reservation during a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "detail")]
pub enum SweepOutcome {
    /// Marked expired and stock released.
    Cleaned,
    /// The expiry attempt failed; the sweep carried on.
    Error(String),
}

/// Per-reservation entry in a sweep report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepEntry {
    pub reservation_id: ReservationId,
    pub sku: Sku,
    #[serde(flatten)]
    pub outcome: SweepOutcome,
}

/// Result of one sweep cycle.
///
/// Reservations that raced with another actor (already transitioned by a
/// concurrent confirm/cancel/expire) are silently skipped: there is
/// nothing left to clean.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    pub cleaned_count: usize,
    pub results: Vec<SweepEntry>,
}
