//! Stock ledger port: per-SKU counters with conditional atomic deltas.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use flashstock_core::Sku;
use flashstock_inventory::StockItem;

use crate::error::StorageError;

mod in_memory;

pub use in_memory::InMemoryStockLedger;

/// Storage of per-SKU stock counters.
///
/// The three counter operations are the safety mechanism of the whole
/// system: each one must check its precondition and apply its delta as a
/// **single indivisible step** with respect to every concurrent caller.
/// An implementation that reads a counter, computes, and writes back in
/// separate steps reintroduces the oversell race this design exists to
/// prevent.
///
/// `Ok(None)` from a counter operation means "no row matched the
/// precondition" — the caller re-checks current state to distinguish a
/// missing SKU from insufficient quantity.
///
/// Implementations must not serialize operations on unrelated SKUs;
/// different catalog rows never contend.
pub trait StockLedger: Send + Sync {
    /// Insert a new catalog row. Fails with `Conflict` if the SKU exists.
    fn insert(&self, item: StockItem) -> Result<StockItem, StorageError>;

    /// Look up one row.
    fn find(&self, sku: &Sku) -> Result<Option<StockItem>, StorageError>;

    /// All rows, sorted by name.
    fn list(&self) -> Result<Vec<StockItem>, StorageError>;

    /// Move `qty` units available → reserved, only if
    /// `available_quantity >= qty` at the moment of application.
    fn reserve(
        &self,
        sku: &Sku,
        qty: u32,
        now: DateTime<Utc>,
    ) -> Result<Option<StockItem>, StorageError>;

    /// Move `qty` units reserved → available, only if
    /// `reserved_quantity >= qty`. Cancel and expire paths.
    fn release(
        &self,
        sku: &Sku,
        qty: u32,
        now: DateTime<Utc>,
    ) -> Result<Option<StockItem>, StorageError>;

    /// Decrement reserved **and** total by `qty` together, only if
    /// `reserved_quantity >= qty`. The unit is permanently sold and
    /// leaves the catalog count.
    fn confirm_deduct(
        &self,
        sku: &Sku,
        qty: u32,
        now: DateTime<Utc>,
    ) -> Result<Option<StockItem>, StorageError>;
}

impl<L> StockLedger for Arc<L>
where
    L: StockLedger + ?Sized,
{
    fn insert(&self, item: StockItem) -> Result<StockItem, StorageError> {
        (**self).insert(item)
    }

    fn find(&self, sku: &Sku) -> Result<Option<StockItem>, StorageError> {
        (**self).find(sku)
    }

    fn list(&self) -> Result<Vec<StockItem>, StorageError> {
        (**self).list()
    }

    fn reserve(
        &self,
        sku: &Sku,
        qty: u32,
        now: DateTime<Utc>,
    ) -> Result<Option<StockItem>, StorageError> {
        (**self).reserve(sku, qty, now)
    }

    fn release(
        &self,
        sku: &Sku,
        qty: u32,
        now: DateTime<Utc>,
    ) -> Result<Option<StockItem>, StorageError> {
        (**self).release(sku, qty, now)
    }

    fn confirm_deduct(
        &self,
        sku: &Sku,
        qty: u32,
        now: DateTime<Utc>,
    ) -> Result<Option<StockItem>, StorageError> {
        (**self).confirm_deduct(sku, qty, now)
    }
}
