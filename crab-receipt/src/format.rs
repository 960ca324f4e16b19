//! Fixed-width text primitives
//!
//! Lengths are counted in `char`s; the receipt assumes one column per char.

use rust_decimal::Decimal;

use crate::money::round_money;

const ELLIPSIS: &str = "...";

/// Shorten `text` to at most `max_len` chars, marking the cut with `...`
///
/// Text that already fits is returned unchanged.
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let keep = max_len.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Left-pad by `floor((width - len) / 2)`; no right padding
///
/// Odd leftovers put the text one column left of true center.
pub fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let pad = width.saturating_sub(len) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

/// Left-pad to `width`; longer text is returned as is
pub fn right_align(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", " ".repeat(width.saturating_sub(len)), text)
}

/// Right-pad to `width`; longer text is returned as is
pub fn left_align(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

/// Two decimals, no symbol
pub fn currency(amount: Decimal) -> String {
    format!("{:.2}", round_money(amount))
}

/// Two decimals with a `$` prefix
pub fn dollars(amount: Decimal) -> String {
    format!("${}", currency(amount))
}

/// Label in a `label_width` field followed by `value` right-aligned in `value_width`
pub fn columns(label: &str, label_width: usize, value: &str, value_width: usize) -> String {
    format!(
        "{}{}",
        left_align(label, label_width),
        right_align(value, value_width)
    )
}
