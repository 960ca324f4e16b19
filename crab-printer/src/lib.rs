//! # crab-printer
//!
//! ESC/POS thermal printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS command vocabulary and byte encoding
//! - Wire-safe text (no control-code injection from free text)
//! - Serial printing (USB/RS-232 at 9600 baud by default)
//!
//! Business logic (WHAT to print) stays in application code:
//! - Receipt layout and dispatch → crab-receipt
//!
//! ## Example
//!
//! ```ignore
//! use crab_printer::{EscPosBuilder, Printer, SerialPrinter};
//!
//! let mut builder = EscPosBuilder::new();
//! builder.center().bold().line("CORNER STORE").bold_off();
//! builder.left().line("Receipt #: 1042");
//! builder.feed(3).cut();
//!
//! let printer = SerialPrinter::detect(None)?;
//! printer.print(&builder.build().to_bytes()).await?;
//! ```

mod encoding;
mod error;
mod escpos;
mod printer;

// Re-exports
pub use encoding::{sanitize_text, write_text};
pub use error::{PrintError, PrintResult};
pub use escpos::{Command, CommandStream, EscPosBuilder};
pub use printer::{DEFAULT_BAUD_RATE, Printer, SerialPrinter};
