//! Wire-safe text for ESC/POS printers
//!
//! Printer text travels in the same byte stream as the control codes, so
//! free text (store names, item names, payment labels) must never carry
//! bytes the printer would interpret as a command:
//! - ASCII control characters (ESC, GS, FS, ...) are dropped
//! - Tabs become a single space
//! - Anything outside printable ASCII becomes `?` (the printer stays on its
//!   default code page)

/// Replacement for characters the default code page cannot show
const REPLACEMENT: u8 = b'?';

/// Append the wire form of `s` to `buf`
pub fn write_text(buf: &mut Vec<u8>, s: &str) {
    buf.reserve(s.len());
    for c in s.chars() {
        match c {
            '\t' => buf.push(b' '),
            ' '..='~' => buf.push(c as u8),
            c if c.is_control() => {}
            _ => buf.push(REPLACEMENT),
        }
    }
}

/// Wire form of `s` as an owned byte vector
pub fn sanitize_text(s: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(s.len());
    write_text(&mut buf, s);
    buf
}
