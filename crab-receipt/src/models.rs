//! Receipt input models
//!
//! Built by the checkout flow at payment completion and handed over by value.
//! Nothing in this crate mutates them.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ReceiptError, ReceiptResult};
use crate::money::{self, MAX_QUANTITY, MAX_TRANSACTION_AMOUNT, MAX_UNIT_PRICE};

/// One sold line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    /// Display name, any length (the receipt truncates it)
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl LineItem {
    pub fn line_total(&self) -> Decimal {
        money::line_total(self.quantity, self.unit_price)
    }
}

/// A completed sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Opaque id, unique per sale
    pub transaction_id: String,
    /// Sale order; never reordered
    pub items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    /// Free-text label (e.g. "Cash", "Visa ****1234")
    pub payment_method: String,
    /// Moment of payment, in the register's local offset
    pub date: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_ref: Option<String>,
}

impl Transaction {
    /// Σ quantity × unit price
    pub fn items_subtotal(&self) -> Decimal {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Check the invariants checkout promises
    ///
    /// - `subtotal == Σ(quantity × unit_price)` and `total == subtotal + tax`
    ///   (both within 0.01)
    /// - quantities in `1..=9999`, unit prices in `0..=1_000_000`
    /// - amounts non-negative and no wider than the totals column
    pub fn validate(&self) -> ReceiptResult<()> {
        if self.transaction_id.trim().is_empty() {
            return Err(invalid("transaction_id must not be empty"));
        }

        for item in &self.items {
            if item.quantity == 0 || item.quantity > MAX_QUANTITY {
                return Err(invalid(format!(
                    "item {}: quantity must be within 1..={}, got {}",
                    item.id, MAX_QUANTITY, item.quantity
                )));
            }
            if item.unit_price.is_sign_negative() || item.unit_price > MAX_UNIT_PRICE {
                return Err(invalid(format!(
                    "item {}: unit_price must be within 0..={}, got {}",
                    item.id, MAX_UNIT_PRICE, item.unit_price
                )));
            }
        }

        for (field, value) in [
            ("subtotal", self.subtotal),
            ("tax", self.tax),
            ("total", self.total),
        ] {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(invalid(format!("{} must be non-negative, got {}", field, value)));
            }
            if value > MAX_TRANSACTION_AMOUNT {
                return Err(invalid(format!(
                    "{} exceeds maximum allowed ({}), got {}",
                    field, MAX_TRANSACTION_AMOUNT, value
                )));
            }
        }

        let items_subtotal = self.items_subtotal();
        if !money::money_eq(self.subtotal, items_subtotal) {
            return Err(invalid(format!(
                "subtotal {} does not match item sum {}",
                self.subtotal, items_subtotal
            )));
        }

        if !money::money_eq(self.total, self.subtotal + self.tax) {
            return Err(invalid(format!(
                "total {} does not equal subtotal {} + tax {}",
                self.total, self.subtotal, self.tax
            )));
        }

        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> ReceiptError {
    ReceiptError::InvalidTransaction(msg.into())
}

/// Store header data, supplied by the host and fixed for the print
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreProfile {
    pub name: String,
    pub address: String,
    pub phone: String,
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_valid_sale() {
        assert!(apple_sale().validate().is_ok());
        assert!(empty_sale().validate().is_ok());
    }

    #[test]
    fn test_total_mismatch_rejected() {
        let mut tx = apple_sale();
        tx.total = Decimal::new(340, 2);
        let err = tx.validate().unwrap_err();
        assert!(matches!(err, ReceiptError::InvalidTransaction(_)));
        assert!(err.to_string().contains("total"));
    }

    #[test]
    fn test_subtotal_mismatch_rejected() {
        let mut tx = apple_sale();
        tx.subtotal = Decimal::new(310, 2);
        tx.total = Decimal::new(340, 2);
        assert!(tx.validate().is_err());
    }

    #[test]
    fn test_rounding_within_tolerance_accepted() {
        let mut tx = apple_sale();
        tx.items[0].unit_price = Decimal::new(1499, 3); // 2 × 1.499 = 2.998
        assert!(tx.validate().is_ok());
    }

    #[test]
    fn test_total_off_by_one_cent_accepted() {
        for cents in [331, 329] {
            let mut tx = apple_sale();
            tx.total = Decimal::new(cents, 2);
            assert!(tx.validate().is_ok(), "total {}", tx.total);
        }
    }

    #[test]
    fn test_total_off_by_two_cents_rejected() {
        for cents in [332, 328] {
            let mut tx = apple_sale();
            tx.total = Decimal::new(cents, 2);
            assert!(
                matches!(tx.validate(), Err(ReceiptError::InvalidTransaction(_))),
                "total {}",
                tx.total
            );
        }
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut tx = apple_sale();
        tx.items[0].quantity = 0;
        assert!(tx.validate().is_err());
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut tx = empty_sale();
        tx.items.push(item("x", "Refund", 1, -100));
        tx.subtotal = Decimal::new(-100, 2);
        tx.total = Decimal::new(-100, 2);
        assert!(tx.validate().is_err());
    }

    #[test]
    fn test_empty_id_rejected() {
        let mut tx = apple_sale();
        tx.transaction_id = "  ".to_string();
        assert!(tx.validate().is_err());
    }

    #[test]
    fn test_deserialize_from_checkout_json() {
        let json = r#"{
            "transaction_id": "TX-9",
            "items": [{"id": "1", "name": "Milk", "quantity": 1, "unit_price": "0.99"}],
            "subtotal": "0.99",
            "tax": "0.08",
            "total": "1.07",
            "payment_method": "Card",
            "date": "2024-03-09T14:05:07+01:00"
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.items.len(), 1);
        assert!(tx.customer_ref.is_none());
        assert!(tx.validate().is_ok());
    }
}
