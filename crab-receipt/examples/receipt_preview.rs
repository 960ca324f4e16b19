//! Print the receipt preview and ESC/POS stream size for a sample sale
//!
//! Run: cargo run -p crab-receipt --example receipt_preview

use crab_receipt::{StoreProfile, Transaction, compose, encode, logger};

const SAMPLE_SALE: &str = r#"{
    "transaction_id": "TX-2024-0042",
    "items": [
        {"id": "sku-1", "name": "Sourdough Loaf", "quantity": 1, "unit_price": "4.25"},
        {"id": "sku-2", "name": "Free Range Eggs (Dozen, Large)", "quantity": 2, "unit_price": "3.10"},
        {"id": "sku-3", "name": "Oat Milk 1L", "quantity": 3, "unit_price": "1.95"}
    ],
    "subtotal": "16.30",
    "tax": "1.30",
    "total": "17.60",
    "payment_method": "Visa ****1234",
    "date": "2024-03-09T14:05:07+01:00",
    "customer_ref": "LOYAL-0077"
}"#;

fn main() -> anyhow::Result<()> {
    logger::init_logger("info", false)?;

    let transaction: Transaction = serde_json::from_str(SAMPLE_SALE)?;
    transaction.validate()?;
    let store = StoreProfile {
        name: "Corner Market".to_string(),
        address: "12 High Street, Springfield".to_string(),
        phone: "555-0142".to_string(),
    };

    println!("{}", compose(&transaction, &store, "Dana"));

    let stream = encode(&transaction, &store, "Dana");
    tracing::info!(
        commands = stream.len(),
        bytes = stream.to_bytes().len(),
        "ESC/POS stream ready"
    );
    Ok(())
}
