mod common;

use common::*;
use crab_printer::Command;
use crab_receipt::{LINE_WIDTH, compose, encode};

#[test]
fn test_apple_receipt_columns() {
    let text = compose(&apple_sale(), &store(), "Dana");
    let lines: Vec<&str> = text.lines().collect();

    let at = lines.iter().position(|l| l.starts_with("Apple")).unwrap();
    assert_eq!(lines[at].len(), LINE_WIDTH);
    assert!(lines[at].ends_with("$3.00"));
    assert_eq!(lines[at + 1], "  2x @ $1.50");

    let total = lines.iter().find(|l| l.starts_with("TOTAL:")).unwrap();
    assert_eq!(total.len(), LINE_WIDTH);
    assert!(total.ends_with("$3.30"));
}

#[test]
fn test_thirty_char_name_truncated() {
    let mut tx = apple_sale();
    tx.items[0].name = "Organic Free Range Eggs Dozen!".to_string();
    assert_eq!(tx.items[0].name.chars().count(), 30);

    let text = compose(&tx, &store(), "Dana");
    let row = text.lines().find(|l| l.starts_with("Organic")).unwrap();
    let field: String = row.chars().take(20).collect();
    assert_eq!(field, "Organic Free Rang...");
}

#[test]
fn test_empty_sale_prints_full_receipt() {
    let tx = empty_sale();
    let text = compose(&tx, &store(), "Dana");
    for label in ["Subtotal:", "Tax:", "TOTAL:"] {
        let row = text.lines().find(|l| l.starts_with(label)).unwrap();
        assert!(row.ends_with("$0.00"));
    }
    assert!(text.contains("Thank you for shopping with us!"));

    let stream = encode(&tx, &store(), "Dana");
    assert_eq!(stream.first(), Some(&Command::Init));
    assert_eq!(stream.last(), Some(&Command::Cut));
}

#[test]
fn test_customer_line_follows_cashier() {
    let mut tx = apple_sale();
    tx.customer_ref = Some("LOYAL-77".to_string());
    let text = compose(&tx, &store(), "Dana");
    let lines: Vec<&str> = text.lines().collect();
    let cashier = lines.iter().position(|l| *l == "Cashier: Dana").unwrap();
    assert_eq!(lines[cashier + 1], "Customer: LOYAL-77");
}

#[test]
fn test_free_text_cannot_inject_printer_commands() {
    let mut tx = apple_sale();
    tx.items[0].name = "Pear\x1b@\x1dV".to_string();
    tx.payment_method = "Card\x1b\x64\x05".to_string();

    let bytes = encode(&tx, &store(), "Dana").to_bytes();
    // exactly one ESC @ (init) and one GS V (cut)
    let init = bytes.windows(2).filter(|w| *w == [0x1B, 0x40]).count();
    let cut = bytes.windows(2).filter(|w| *w == [0x1D, 0x56]).count();
    assert_eq!(init, 1);
    assert_eq!(cut, 1);
    assert!(bytes.windows(2).all(|w| w != [0x1B, 0x64]));
}

#[test]
fn test_text_and_stream_stay_in_step() {
    for tx in [apple_sale(), empty_sale()] {
        let text = compose(&tx, &store(), "Dana");
        let stream = encode(&tx, &store(), "Dana");
        assert_eq!(text.lines().count(), stream.count(&Command::LineFeed));
        assert!(text.lines().all(|l| l.chars().count() <= LINE_WIDTH));
    }
}
