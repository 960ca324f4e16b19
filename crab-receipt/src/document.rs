//! Receipt document: the single description of receipt structure
//!
//! Every layout decision (what goes on which line, truncation, money
//! formatting, column split) is made here once. The text renderer and the
//! ESC/POS renderer only decide how a line kind looks on their medium.

use serde::Serialize;

use crate::format::{dollars, truncate};
use crate::models::{StoreProfile, Transaction};

/// Paper width in columns (80 mm paper, font A)
pub const LINE_WIDTH: usize = 42;
/// Item name field on the first item line
pub const ITEM_NAME_WIDTH: usize = 20;
/// Label field of a totals row
pub const TOTAL_LABEL_WIDTH: usize = 30;
/// Amount field of a totals row
pub const TOTAL_AMOUNT_WIDTH: usize = LINE_WIDTH - TOTAL_LABEL_WIDTH;
/// Trailing blank lines so the cutter clears the footer
pub const CUTTER_FEED_LINES: usize = 3;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const FOOTER_LINES: [&str; 3] = [
    "Thank you for shopping with us!",
    "Please keep your receipt.",
    "Returns accepted within 30 days.",
];
const FOOTER_STARS: usize = 24;

/// Divider weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Divider {
    /// `=` × width
    Heavy,
    /// `-` × width
    Light,
}

impl Divider {
    pub fn render(self) -> String {
        match self {
            Divider::Heavy => "=".repeat(LINE_WIDTH),
            Divider::Light => "-".repeat(LINE_WIDTH),
        }
    }
}

/// One logical receipt line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ReceiptLine {
    Blank,
    Divider(Divider),
    /// Store name: centered, emphasised on printers
    Title(String),
    Centered(String),
    /// Left-aligned free text
    Text(String),
    /// Two physical lines: name + line total, then quantity detail
    Item {
        name: String,
        amount: String,
        detail: String,
    },
    /// Totals row: label field + right-aligned amount field
    Amount {
        label: String,
        amount: String,
        emphasis: bool,
    },
}

/// Section of the receipt; renderers reset alignment at each section start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Header,
    Metadata,
    Items,
    Totals,
    Payment,
    Footer,
}

impl SectionKind {
    /// Whether the section's text is centered (otherwise left/tabular)
    pub fn is_centered(self) -> bool {
        matches!(self, SectionKind::Header | SectionKind::Footer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    pub lines: Vec<ReceiptLine>,
}

/// Complete receipt structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptDocument {
    pub transaction_id: String,
    pub sections: Vec<Section>,
}

impl ReceiptDocument {
    /// Lay out a completed sale
    pub fn build(transaction: &Transaction, store: &StoreProfile, cashier_name: &str) -> Self {
        let sections = vec![
            header(store),
            metadata(transaction, cashier_name),
            items(transaction),
            totals(transaction),
            payment(transaction),
            footer(),
        ];

        Self {
            transaction_id: transaction.transaction_id.clone(),
            sections,
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &ReceiptLine> {
        self.sections.iter().flat_map(|s| s.lines.iter())
    }

    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }
}

/// Flatten control characters so free text stays on one physical line
fn one_line(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn fit(text: &str) -> String {
    truncate(&one_line(text), LINE_WIDTH)
}

fn header(store: &StoreProfile) -> Section {
    Section {
        kind: SectionKind::Header,
        lines: vec![
            ReceiptLine::Title(fit(&store.name.to_uppercase())),
            ReceiptLine::Centered(fit(&store.address)),
            ReceiptLine::Centered(fit(&format!("Tel: {}", store.phone))),
            ReceiptLine::Blank,
            ReceiptLine::Divider(Divider::Heavy),
        ],
    }
}

fn metadata(transaction: &Transaction, cashier_name: &str) -> Section {
    let mut lines = vec![
        ReceiptLine::Text(fit(&format!(
            "Date: {}",
            transaction.date.format(DATE_FORMAT)
        ))),
        ReceiptLine::Text(fit(&format!("Receipt #: {}", transaction.transaction_id))),
        ReceiptLine::Text(fit(&format!("Cashier: {}", cashier_name))),
    ];
    if let Some(customer) = transaction
        .customer_ref
        .as_deref()
        .filter(|c| !c.trim().is_empty())
    {
        lines.push(ReceiptLine::Text(fit(&format!("Customer: {}", customer))));
    }
    lines.push(ReceiptLine::Divider(Divider::Heavy));
    lines.push(ReceiptLine::Blank);

    Section {
        kind: SectionKind::Metadata,
        lines,
    }
}

fn items(transaction: &Transaction) -> Section {
    let mut lines = vec![
        ReceiptLine::Text("ITEMS:".to_string()),
        ReceiptLine::Divider(Divider::Light),
    ];

    for item in &transaction.items {
        lines.push(ReceiptLine::Item {
            name: truncate(&one_line(&item.name), ITEM_NAME_WIDTH),
            amount: dollars(item.line_total()),
            detail: format!("  {}x @ {}", item.quantity, dollars(item.unit_price)),
        });
    }

    lines.push(ReceiptLine::Divider(Divider::Light));
    lines.push(ReceiptLine::Blank);

    Section {
        kind: SectionKind::Items,
        lines,
    }
}

fn amount(label: &str, value: rust_decimal::Decimal, emphasis: bool) -> ReceiptLine {
    ReceiptLine::Amount {
        label: label.to_string(),
        amount: dollars(value),
        emphasis,
    }
}

fn totals(transaction: &Transaction) -> Section {
    Section {
        kind: SectionKind::Totals,
        lines: vec![
            amount("Subtotal:", transaction.subtotal, false),
            amount("Tax:", transaction.tax, false),
            ReceiptLine::Divider(Divider::Heavy),
            amount("TOTAL:", transaction.total, true),
            ReceiptLine::Divider(Divider::Heavy),
            ReceiptLine::Blank,
        ],
    }
}

fn payment(transaction: &Transaction) -> Section {
    Section {
        kind: SectionKind::Payment,
        lines: vec![
            ReceiptLine::Text(fit(&format!(
                "Payment Method: {}",
                transaction.payment_method
            ))),
            ReceiptLine::Blank,
            ReceiptLine::Divider(Divider::Heavy),
            ReceiptLine::Blank,
        ],
    }
}

fn footer() -> Section {
    let mut lines: Vec<ReceiptLine> = FOOTER_LINES
        .iter()
        .map(|l| ReceiptLine::Centered(l.to_string()))
        .collect();
    lines.push(ReceiptLine::Blank);
    lines.push(ReceiptLine::Centered("*".repeat(FOOTER_STARS)));
    lines.extend(std::iter::repeat_n(ReceiptLine::Blank, CUTTER_FEED_LINES));

    Section {
        kind: SectionKind::Footer,
        lines,
    }
}
