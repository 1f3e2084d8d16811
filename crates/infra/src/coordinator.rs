//! Reservation coordinator: the reserve/confirm/cancel/expire state
//! machine.
//!
//! The coordinator holds no locks of its own. Correctness rests entirely
//! on the ledger's conditional counter deltas and the store's CAS status
//! transitions; this module sequences them and turns their "no match"
//! answers into the caller-facing taxonomy.

use chrono::{Duration, Utc};
use tracing::{debug, error, info, warn};

use flashstock_core::{DomainError, DomainResult, RequesterId, ReservationId, Sku};
use flashstock_inventory::{
    CancelOutcome, ConfirmOutcome, NewStockItem, Reservation, ReservationStatus, ReserveOutcome,
    StockItem, SweepEntry, SweepOutcome, SweepReport,
};

use crate::reservation_store::ReservationStore;
use crate::stock_ledger::StockLedger;

/// Coordinator configuration, read once at construction.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// How long a fresh hold lives before becoming expirable.
    pub reservation_ttl: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            reservation_ttl: Duration::minutes(5),
        }
    }
}

/// Coordinates stock counters and reservation records so they move
/// together. Generic over the storage ports; safe to share across
/// request handlers and the sweeper.
pub struct ReservationCoordinator<L, S> {
    ledger: L,
    store: S,
    config: CoordinatorConfig,
}

impl<L, S> ReservationCoordinator<L, S>
where
    L: StockLedger,
    S: ReservationStore,
{
    pub fn new(ledger: L, store: S, config: CoordinatorConfig) -> Self {
        Self {
            ledger,
            store,
            config,
        }
    }

    // ---- catalog -------------------------------------------------------

    /// Create a catalog row. All units start available.
    pub fn create_item(&self, input: NewStockItem) -> DomainResult<StockItem> {
        let item = input.into_item(Utc::now())?;
        let item = self.ledger.insert(item)?;
        info!(sku = %item.sku, total = item.total_quantity, "stock item created");
        Ok(item)
    }

    pub fn get_item(&self, sku: &Sku) -> DomainResult<StockItem> {
        self.ledger.find(sku)?.ok_or(DomainError::NotFound)
    }

    pub fn list_items(&self) -> DomainResult<Vec<StockItem>> {
        Ok(self.ledger.list()?)
    }

    // ---- reservation lifecycle ----------------------------------------

    /// Place a hold on `quantity` units of `sku`.
    ///
    /// Idempotent per (requester, sku): while an active unexpired hold
    /// exists for the pair, repeated calls return it verbatim and deduct
    /// nothing.
    pub fn reserve(
        &self,
        sku: &Sku,
        requester_id: &RequesterId,
        quantity: u32,
    ) -> DomainResult<ReserveOutcome> {
        if quantity < 1 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }

        let now = Utc::now();

        if let Some(existing) = self.store.find_active_for(requester_id, sku, now)? {
            debug!(
                reservation_id = %existing.id,
                sku = %sku,
                requester = %requester_id,
                "returning existing active reservation"
            );
            return Ok(ReserveOutcome {
                reservation: existing,
                already_existed: true,
            });
        }

        let item = self.ledger.find(sku)?.ok_or(DomainError::NotFound)?;

        // Optimistic pre-check: a fast, friendly error path. The atomic
        // apply below is the actual oversell guarantee.
        if item.available_quantity < quantity {
            return Err(DomainError::InsufficientStock {
                requested: quantity,
                available: item.available_quantity,
            });
        }

        if self.ledger.reserve(sku, quantity, now)?.is_none() {
            // Lost the race between pre-check and apply. Report with the
            // latest observed availability.
            let available = self
                .ledger
                .find(sku)?
                .map(|i| i.available_quantity)
                .unwrap_or(0);
            return Err(DomainError::InsufficientStock {
                requested: quantity,
                available,
            });
        }

        let reservation = Reservation::new(
            sku.clone(),
            requester_id.clone(),
            quantity,
            self.config.reservation_ttl,
            now,
        )?;

        if let Err(e) = self.store.create(reservation.clone()) {
            // The counters moved but the record could not be written: give
            // the stock back so the failed call grants no durable hold.
            warn!(
                sku = %sku,
                requester = %requester_id,
                error = %e,
                "reservation record write failed; releasing reserved stock"
            );
            self.ledger.release(sku, quantity, Utc::now())?;
            return Err(e.into());
        }

        info!(
            reservation_id = %reservation.id,
            sku = %sku,
            requester = %requester_id,
            quantity,
            expires_at = %reservation.expires_at,
            "reservation created"
        );

        Ok(ReserveOutcome {
            reservation,
            already_existed: false,
        })
    }

    /// Finalize a purchase: the held units permanently leave the catalog.
    pub fn confirm(
        &self,
        id: &ReservationId,
        requester_id: &RequesterId,
    ) -> DomainResult<ConfirmOutcome> {
        let reservation = self.store.find_by_id(id)?.ok_or(DomainError::NotFound)?;

        if reservation.requester_id != *requester_id {
            return Err(DomainError::Forbidden);
        }

        let now = Utc::now();

        match reservation.status {
            ReservationStatus::Confirmed => {
                return Ok(ConfirmOutcome {
                    reservation,
                    already_confirmed: true,
                });
            }
            ReservationStatus::Cancelled => {
                return Err(DomainError::conflict("reservation has been cancelled"));
            }
            ReservationStatus::Expired => return Err(DomainError::Gone),
            ReservationStatus::Active if reservation.is_expired(now) => {
                // A stale hold discovered reactively: reclaim the stock
                // before telling the caller it is gone.
                self.expire(&reservation)?;
                return Err(DomainError::Gone);
            }
            ReservationStatus::Active => {}
        }

        let confirmed = self
            .store
            .transition(
                id,
                ReservationStatus::Active,
                ReservationStatus::Confirmed,
                now,
            )?
            .ok_or_else(|| {
                DomainError::conflict("failed to confirm reservation - may have expired")
            })?;

        if self
            .ledger
            .confirm_deduct(&confirmed.sku, confirmed.quantity, now)?
            .is_none()
        {
            // The reserved counter always covers a hold we just confirmed;
            // a miss here means the stores disagree.
            error!(
                reservation_id = %id,
                sku = %confirmed.sku,
                quantity = confirmed.quantity,
                "confirm deduct found no matching stock row"
            );
            return Err(DomainError::storage(
                "stock counters out of sync with confirmed reservation",
            ));
        }

        info!(
            reservation_id = %id,
            sku = %confirmed.sku,
            quantity = confirmed.quantity,
            "reservation confirmed"
        );

        Ok(ConfirmOutcome {
            reservation: confirmed,
            already_confirmed: false,
        })
    }

    /// Give up a hold and return its units to the available pool.
    pub fn cancel(
        &self,
        id: &ReservationId,
        requester_id: &RequesterId,
    ) -> DomainResult<CancelOutcome> {
        let reservation = self.store.find_by_id(id)?.ok_or(DomainError::NotFound)?;

        if reservation.requester_id != *requester_id {
            return Err(DomainError::Forbidden);
        }

        match reservation.status {
            ReservationStatus::Cancelled | ReservationStatus::Expired => {
                // Both read as "this hold no longer claims stock" from the
                // requester's side; the record keeps its real status.
                return Ok(CancelOutcome {
                    reservation,
                    already_cancelled: true,
                });
            }
            ReservationStatus::Confirmed => {
                return Err(DomainError::conflict(
                    "cannot cancel - checkout already confirmed",
                ));
            }
            ReservationStatus::Active => {}
        }

        let now = Utc::now();
        let cancelled = self
            .store
            .transition(
                id,
                ReservationStatus::Active,
                ReservationStatus::Cancelled,
                now,
            )?
            .ok_or_else(|| DomainError::conflict("failed to cancel reservation"))?;

        self.ledger
            .release(&cancelled.sku, cancelled.quantity, now)?;

        info!(
            reservation_id = %id,
            sku = %cancelled.sku,
            quantity = cancelled.quantity,
            "reservation cancelled"
        );

        Ok(CancelOutcome {
            reservation: cancelled,
            already_cancelled: false,
        })
    }

    /// Drive one stale hold through expiry, releasing its stock.
    ///
    /// Called reactively (a confirm or status call discovers the hold is
    /// past its deadline) and proactively (the sweeper). The CAS in the
    /// store makes the release happen exactly once no matter which path
    /// gets there first; losing the race is a no-op, not an error.
    pub fn expire(&self, reservation: &Reservation) -> DomainResult<Option<Reservation>> {
        let now = Utc::now();
        let expired = self.store.transition(
            &reservation.id,
            ReservationStatus::Active,
            ReservationStatus::Expired,
            now,
        )?;

        let Some(expired) = expired else {
            return Ok(None);
        };

        self.ledger.release(&expired.sku, expired.quantity, now)?;

        info!(
            reservation_id = %expired.id,
            sku = %expired.sku,
            quantity = expired.quantity,
            "reservation expired, stock released"
        );

        Ok(Some(expired))
    }

    /// Current state of a reservation. An active record past its deadline
    /// is expired on the spot so the caller never sees a live-looking
    /// stale hold.
    pub fn status(&self, id: &ReservationId) -> DomainResult<Reservation> {
        let reservation = self.store.find_by_id(id)?.ok_or(DomainError::NotFound)?;

        if reservation.status == ReservationStatus::Active && reservation.is_expired(Utc::now()) {
            if let Some(expired) = self.expire(&reservation)? {
                return Ok(expired);
            }
            // Raced with another actor; re-read for the settled state.
            return self.store.find_by_id(id)?.ok_or(DomainError::NotFound);
        }

        Ok(reservation)
    }

    /// One scan-and-expire cycle over every reservation past its deadline.
    ///
    /// Per-record failures are logged and recorded but never abort the
    /// batch. Records that another actor settled first are skipped.
    pub fn sweep_once(&self) -> DomainResult<SweepReport> {
        let expirable = self.store.list_expirable(Utc::now())?;
        let mut report = SweepReport::default();

        for reservation in expirable {
            match self.expire(&reservation) {
                Ok(Some(expired)) => {
                    report.cleaned_count += 1;
                    report.results.push(SweepEntry {
                        reservation_id: expired.id,
                        sku: expired.sku,
                        outcome: SweepOutcome::Cleaned,
                    });
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        reservation_id = %reservation.id,
                        sku = %reservation.sku,
                        error = %e,
                        "failed to expire reservation during sweep"
                    );
                    report.results.push(SweepEntry {
                        reservation_id: reservation.id,
                        sku: reservation.sku,
                        outcome: SweepOutcome::Error(e.to_string()),
                    });
                }
            }
        }

        if report.cleaned_count > 0 {
            info!(cleaned = report.cleaned_count, "sweep reclaimed expired holds");
        }

        Ok(report)
    }
}
