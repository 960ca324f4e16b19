//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use crab_printer::Command;
use crab_receipt::{
    OutputSink, ReceiptDocument, SinkError, SinkKind, StoreProfile, Transaction, render_escpos,
    render_text,
};

pub fn store() -> StoreProfile {
    StoreProfile {
        name: "Corner Market".to_string(),
        address: "12 High Street, Springfield".to_string(),
        phone: "555-0142".to_string(),
    }
}

/// Sale as checkout hands it over
pub fn sale(json: &str) -> Transaction {
    serde_json::from_str(json).unwrap()
}

pub fn apple_sale() -> Transaction {
    sale(
        r#"{
            "transaction_id": "TX-1001",
            "items": [{"id": "sku-apple", "name": "Apple", "quantity": 2, "unit_price": "1.50"}],
            "subtotal": "3.00",
            "tax": "0.30",
            "total": "3.30",
            "payment_method": "Cash",
            "date": "2024-03-09T14:05:07+01:00"
        }"#,
    )
}

pub fn empty_sale() -> Transaction {
    sale(
        r#"{
            "transaction_id": "TX-EMPTY",
            "items": [],
            "subtotal": "0",
            "tax": "0",
            "total": "0",
            "payment_method": "Cash",
            "date": "2024-03-09T14:05:07+01:00"
        }"#,
    )
}

/// In-memory printer: renders what a real sink would send and records it
pub struct RecordingSink {
    kind: SinkKind,
    delay: Duration,
    failures_left: AtomicUsize,
    failure: fn() -> SinkError,
    pub deliveries: AtomicUsize,
    pub cuts: AtomicUsize,
    pub last_text: Mutex<String>,
}

impl RecordingSink {
    pub fn new(kind: SinkKind) -> Self {
        Self {
            kind,
            delay: Duration::ZERO,
            failures_left: AtomicUsize::new(0),
            failure: || SinkError::WriteFailure("unused".into()),
            deliveries: AtomicUsize::new(0),
            cuts: AtomicUsize::new(0),
            last_text: Mutex::new(String::new()),
        }
    }

    /// Each delivery takes `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fail the next `times` deliveries with `failure`
    pub fn failing(mut self, times: usize, failure: fn() -> SinkError) -> Self {
        self.failures_left = AtomicUsize::new(times);
        self.failure = failure;
        self
    }

    pub fn deliveries(&self) -> usize {
        self.deliveries.load(Ordering::SeqCst)
    }

    pub fn cuts(&self) -> usize {
        self.cuts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OutputSink for RecordingSink {
    fn kind(&self) -> SinkKind {
        self.kind
    }

    async fn deliver(&self, document: &ReceiptDocument) -> Result<(), SinkError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let should_fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err((self.failure)());
        }

        self.deliveries.fetch_add(1, Ordering::SeqCst);
        match self.kind {
            SinkKind::Hardware => {
                let stream = render_escpos(document);
                self.cuts
                    .fetch_add(stream.count(&Command::Cut), Ordering::SeqCst);
            }
            SinkKind::Fallback => {
                *self.last_text.lock().unwrap() = render_text(document);
            }
        }
        Ok(())
    }
}
