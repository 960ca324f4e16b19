//! # crab-receipt
//!
//! Receipt composition and printing for completed sales.
//!
//! ## Scope
//!
//! This crate handles WHAT to print:
//! - One receipt document per sale ([`ReceiptDocument`])
//! - Fixed-width text for the preview and host printing ([`compose`])
//! - ESC/POS command stream for thermal printers ([`encode`])
//! - Hardware-first dispatch with a host-print fallback ([`Dispatcher`])
//! - The receipt screen state machine ([`ReceiptSession`])
//!
//! Byte-level printer access (HOW to print) lives in `crab-printer`.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use crab_receipt::{Dispatcher, ReceiptConfig, ReceiptSession};
//!
//! let config = ReceiptConfig::from_json(&settings_json)?;
//! let dispatcher = Arc::new(Dispatcher::from_config(&config));
//!
//! let session = ReceiptSession::open(dispatcher, transaction, store, "Dana", &config)?;
//! show(session.preview());
//! session.shown()?;
//! // ... user taps "Print again"
//! let outcome = session.reprint().await?;
//! let closed = session.new_transaction();
//! ```

pub mod composer;
pub mod config;
pub mod dispatcher;
pub mod document;
pub mod encoder;
pub mod error;
pub mod flight;
pub mod format;
pub mod logger;
pub mod models;
pub mod money;
pub mod session;
pub mod sink;

// Re-exports
pub use composer::{compose, render_text};
pub use config::{ReceiptConfig, SerialConfig, SpoolFormat, SpoolerConfig};
pub use dispatcher::{Dispatcher, PrintOutcome};
pub use document::{LINE_WIDTH, ReceiptDocument, ReceiptLine, Section, SectionKind};
pub use encoder::{encode, render_escpos};
pub use error::{ReceiptError, ReceiptResult};
pub use models::{LineItem, StoreProfile, Transaction};
pub use session::{NextStep, ReceiptSession, SessionClosed, SessionState};
pub use sink::{OutputSink, SerialSink, SinkError, SinkKind, SpoolerSink};
