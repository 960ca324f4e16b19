//! Plain-text receipt renderer
//!
//! Used for the on-screen preview and the host-print fallback. Pure and
//! deterministic: the same sale always yields byte-identical text.

use crate::document::{
    ITEM_NAME_WIDTH, LINE_WIDTH, ReceiptDocument, ReceiptLine, TOTAL_AMOUNT_WIDTH,
    TOTAL_LABEL_WIDTH,
};
use crate::format::{center, columns};
use crate::models::{StoreProfile, Transaction};

/// Compose the fixed-width text receipt for a sale
pub fn compose(transaction: &Transaction, store: &StoreProfile, cashier_name: &str) -> String {
    render_text(&ReceiptDocument::build(transaction, store, cashier_name))
}

/// Render a document as fixed-width text, one `\n` after every physical line
pub fn render_text(document: &ReceiptDocument) -> String {
    let mut out = String::with_capacity(2048);
    for line in document.lines() {
        for physical in physical_lines(line) {
            out.push_str(&physical);
            out.push('\n');
        }
    }
    out
}

/// Physical text lines for one logical line
pub(crate) fn physical_lines(line: &ReceiptLine) -> Vec<String> {
    match line {
        ReceiptLine::Blank => vec![String::new()],
        ReceiptLine::Divider(d) => vec![d.render()],
        ReceiptLine::Title(text) | ReceiptLine::Centered(text) => {
            vec![center(text, LINE_WIDTH)]
        }
        ReceiptLine::Text(text) => vec![text.clone()],
        ReceiptLine::Item {
            name,
            amount,
            detail,
        } => vec![item_row(name, amount), detail.clone()],
        ReceiptLine::Amount { label, amount, .. } => vec![total_row(label, amount)],
    }
}

/// Name in the 20-column field, line total right-aligned in the rest
pub(crate) fn item_row(name: &str, amount: &str) -> String {
    columns(name, ITEM_NAME_WIDTH, amount, LINE_WIDTH - ITEM_NAME_WIDTH)
}

/// Label in the 30-column field, amount right-aligned in 12
pub(crate) fn total_row(label: &str, amount: &str) -> String {
    columns(label, TOTAL_LABEL_WIDTH, amount, TOTAL_AMOUNT_WIDTH)
}
