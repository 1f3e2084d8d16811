use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};

use flashstock_core::Sku;
use flashstock_inventory::StockItem;

use super::StockLedger;
use crate::error::StorageError;

/// In-memory stock ledger.
///
/// Intended for tests/dev. Each row lives behind its own mutex, so a
/// conditional delta is one indivisible check-and-apply step for that SKU
/// while operations on unrelated SKUs proceed in parallel. The outer map
/// lock is held only to locate the row.
#[derive(Debug, Default)]
pub struct InMemoryStockLedger {
    rows: RwLock<HashMap<Sku, Arc<Mutex<StockItem>>>>,
}

impl InMemoryStockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn row(&self, sku: &Sku) -> Result<Option<Arc<Mutex<StockItem>>>, StorageError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StorageError::Backend("ledger lock poisoned".to_string()))?;
        Ok(rows.get(sku).cloned())
    }

    /// Apply `delta` under the row's lock if `precondition` holds; `None`
    /// when the SKU is missing or the precondition fails.
    fn conditional_update(
        &self,
        sku: &Sku,
        now: DateTime<Utc>,
        precondition: impl Fn(&StockItem) -> bool,
        delta: impl Fn(&mut StockItem),
    ) -> Result<Option<StockItem>, StorageError> {
        let Some(row) = self.row(sku)? else {
            return Ok(None);
        };

        let mut item = row
            .lock()
            .map_err(|_| StorageError::Backend("stock row lock poisoned".to_string()))?;

        if !precondition(&item) {
            return Ok(None);
        }

        delta(&mut item);
        item.updated_at = now;
        Ok(Some(item.clone()))
    }
}

impl StockLedger for InMemoryStockLedger {
    fn insert(&self, item: StockItem) -> Result<StockItem, StorageError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StorageError::Backend("ledger lock poisoned".to_string()))?;

        if rows.contains_key(&item.sku) {
            return Err(StorageError::Conflict(format!(
                "stock item with SKU {} already exists",
                item.sku
            )));
        }

        rows.insert(item.sku.clone(), Arc::new(Mutex::new(item.clone())));
        Ok(item)
    }

    fn find(&self, sku: &Sku) -> Result<Option<StockItem>, StorageError> {
        match self.row(sku)? {
            Some(row) => {
                let item = row
                    .lock()
                    .map_err(|_| StorageError::Backend("stock row lock poisoned".to_string()))?;
                Ok(Some(item.clone()))
            }
            None => Ok(None),
        }
    }

    fn list(&self) -> Result<Vec<StockItem>, StorageError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StorageError::Backend("ledger lock poisoned".to_string()))?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows.values() {
            let item = row
                .lock()
                .map_err(|_| StorageError::Backend("stock row lock poisoned".to_string()))?;
            items.push(item.clone());
        }
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    fn reserve(
        &self,
        sku: &Sku,
        qty: u32,
        now: DateTime<Utc>,
    ) -> Result<Option<StockItem>, StorageError> {
        self.conditional_update(
            sku,
            now,
            |item| item.available_quantity >= qty,
            |item| {
                item.available_quantity -= qty;
                item.reserved_quantity += qty;
            },
        )
    }

    fn release(
        &self,
        sku: &Sku,
        qty: u32,
        now: DateTime<Utc>,
    ) -> Result<Option<StockItem>, StorageError> {
        self.conditional_update(
            sku,
            now,
            |item| item.reserved_quantity >= qty,
            |item| {
                item.reserved_quantity -= qty;
                item.available_quantity += qty;
            },
        )
    }

    fn confirm_deduct(
        &self,
        sku: &Sku,
        qty: u32,
        now: DateTime<Utc>,
    ) -> Result<Option<StockItem>, StorageError> {
        self.conditional_update(
            sku,
            now,
            |item| item.reserved_quantity >= qty,
            |item| {
                item.reserved_quantity -= qty;
                item.total_quantity -= qty;
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashstock_inventory::NewStockItem;
    use proptest::prelude::*;

    fn seed(ledger: &InMemoryStockLedger, sku: &str, total: u32) -> StockItem {
        let item = NewStockItem {
            sku: Sku::parse(sku).unwrap(),
            name: format!("Item {sku}"),
            description: String::new(),
            price_cents: 1000,
            image_url: String::new(),
            total_quantity: total,
        }
        .into_item(Utc::now())
        .unwrap();
        ledger.insert(item).unwrap()
    }

    #[test]
    fn insert_rejects_duplicate_sku() {
        let ledger = InMemoryStockLedger::new();
        seed(&ledger, "WIDGET", 5);
        let dup = NewStockItem {
            sku: Sku::parse("widget").unwrap(),
            name: "Widget again".to_string(),
            description: String::new(),
            price_cents: 1,
            image_url: String::new(),
            total_quantity: 1,
        }
        .into_item(Utc::now())
        .unwrap();
        assert!(matches!(
            ledger.insert(dup),
            Err(StorageError::Conflict(_))
        ));
    }

    #[test]
    fn reserve_moves_available_to_reserved() {
        let ledger = InMemoryStockLedger::new();
        seed(&ledger, "WIDGET", 10);
        let sku = Sku::parse("WIDGET").unwrap();

        let item = ledger.reserve(&sku, 3, Utc::now()).unwrap().unwrap();
        assert_eq!(item.available_quantity, 7);
        assert_eq!(item.reserved_quantity, 3);
        assert_eq!(item.total_quantity, 10);
    }

    #[test]
    fn reserve_fails_when_insufficient() {
        let ledger = InMemoryStockLedger::new();
        seed(&ledger, "WIDGET", 1);
        let sku = Sku::parse("WIDGET").unwrap();

        assert!(ledger.reserve(&sku, 2, Utc::now()).unwrap().is_none());
        // Counters untouched by the failed attempt.
        let item = ledger.find(&sku).unwrap().unwrap();
        assert_eq!(item.available_quantity, 1);
        assert_eq!(item.reserved_quantity, 0);
    }

    #[test]
    fn reserve_on_unknown_sku_is_no_match() {
        let ledger = InMemoryStockLedger::new();
        let sku = Sku::parse("GHOST").unwrap();
        assert!(ledger.reserve(&sku, 1, Utc::now()).unwrap().is_none());
    }

    #[test]
    fn release_returns_stock() {
        let ledger = InMemoryStockLedger::new();
        seed(&ledger, "WIDGET", 10);
        let sku = Sku::parse("WIDGET").unwrap();

        ledger.reserve(&sku, 4, Utc::now()).unwrap().unwrap();
        let item = ledger.release(&sku, 4, Utc::now()).unwrap().unwrap();
        assert_eq!(item.available_quantity, 10);
        assert_eq!(item.reserved_quantity, 0);
    }

    #[test]
    fn release_more_than_reserved_is_no_match() {
        let ledger = InMemoryStockLedger::new();
        seed(&ledger, "WIDGET", 10);
        let sku = Sku::parse("WIDGET").unwrap();

        ledger.reserve(&sku, 2, Utc::now()).unwrap().unwrap();
        assert!(ledger.release(&sku, 3, Utc::now()).unwrap().is_none());
    }

    #[test]
    fn confirm_deduct_shrinks_total_and_reserved_together() {
        let ledger = InMemoryStockLedger::new();
        seed(&ledger, "WIDGET", 10);
        let sku = Sku::parse("WIDGET").unwrap();

        ledger.reserve(&sku, 3, Utc::now()).unwrap().unwrap();
        let item = ledger.confirm_deduct(&sku, 3, Utc::now()).unwrap().unwrap();
        assert_eq!(item.total_quantity, 7);
        assert_eq!(item.available_quantity, 7);
        assert_eq!(item.reserved_quantity, 0);
        assert!(item.counters_consistent());
    }

    #[test]
    fn list_is_sorted_by_name() {
        let ledger = InMemoryStockLedger::new();
        seed(&ledger, "ZZZ", 1);
        seed(&ledger, "AAA", 1);
        let names: Vec<String> = ledger.list().unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["Item AAA".to_string(), "Item ZZZ".to_string()]);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Reserve(u32),
        Release(u32),
        Confirm(u32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1u32..6).prop_map(Op::Reserve),
            (1u32..6).prop_map(Op::Release),
            (1u32..6).prop_map(Op::Confirm),
        ]
    }

    proptest! {
        /// Any sequence of conditional deltas keeps
        /// available + reserved == total.
        #[test]
        fn counters_stay_consistent(ops in prop::collection::vec(op_strategy(), 0..64)) {
            let ledger = InMemoryStockLedger::new();
            seed(&ledger, "WIDGET", 20);
            let sku = Sku::parse("WIDGET").unwrap();

            for op in ops {
                match op {
                    Op::Reserve(q) => { let _ = ledger.reserve(&sku, q, Utc::now()).unwrap(); }
                    Op::Release(q) => { let _ = ledger.release(&sku, q, Utc::now()).unwrap(); }
                    Op::Confirm(q) => { let _ = ledger.confirm_deduct(&sku, q, Utc::now()).unwrap(); }
                }
                let item = ledger.find(&sku).unwrap().unwrap();
                prop_assert!(item.counters_consistent());
            }
        }
    }
}
