//! Stock item: per-SKU counters plus catalog metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use flashstock_core::{DomainError, DomainResult, Sku};

/// One catalog row.
///
/// Counter invariant: `available_quantity + reserved_quantity ==
/// total_quantity`, except during the confirm transition where `total` and
/// `reserved` drop together. The stock ledger owns all writes to the three
/// counters; nothing else mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    pub sku: Sku,
    pub name: String,
    pub description: String,
    pub price_cents: u64,
    pub image_url: String,
    pub total_quantity: u32,
    pub available_quantity: u32,
    pub reserved_quantity: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StockItem {
    /// Whether any units can currently be reserved.
    pub fn in_stock(&self) -> bool {
        self.available_quantity > 0
    }

    /// Check the counter invariant. The ledger's conditional deltas
    /// preserve it by construction; this exists for assertions and tests.
    pub fn counters_consistent(&self) -> bool {
        self.available_quantity + self.reserved_quantity == self.total_quantity
    }
}

/// Input for creating a catalog row. All units start available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStockItem {
    pub sku: Sku,
    pub name: String,
    pub description: String,
    pub price_cents: u64,
    pub image_url: String,
    pub total_quantity: u32,
}

impl NewStockItem {
    pub fn into_item(self, now: DateTime<Utc>) -> DomainResult<StockItem> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        Ok(StockItem {
            sku: self.sku,
            name: self.name.trim().to_string(),
            description: self.description,
            price_cents: self.price_cents,
            image_url: self.image_url,
            total_quantity: self.total_quantity,
            available_quantity: self.total_quantity,
            reserved_quantity: 0,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_item(total: u32) -> NewStockItem {
        NewStockItem {
            sku: Sku::parse("WIDGET").unwrap(),
            name: "Widget".to_string(),
            description: String::new(),
            price_cents: 1999,
            image_url: String::new(),
            total_quantity: total,
        }
    }

    #[test]
    fn new_item_starts_fully_available() {
        let item = new_item(10).into_item(Utc::now()).unwrap();
        assert_eq!(item.available_quantity, 10);
        assert_eq!(item.reserved_quantity, 0);
        assert!(item.counters_consistent());
        assert!(item.in_stock());
    }

    #[test]
    fn zero_total_is_allowed_but_out_of_stock() {
        let item = new_item(0).into_item(Utc::now()).unwrap();
        assert!(item.counters_consistent());
        assert!(!item.in_stock());
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut input = new_item(1);
        input.name = "   ".to_string();
        let err = input.into_item(Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
