//! Output dispatcher
//!
//! Hardware first, host print as the fallback:
//! 1. hardware sink present → deliver the ESC/POS stream
//! 2. capability missing, access denied or write failed → fallback sink
//! 3. fallback failed → [`PrintOutcome::Failed`], the only failure the UI shows
//!
//! The sale is committed before printing starts; nothing here returns an
//! error for a hardware problem.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::config::ReceiptConfig;
use crate::document::ReceiptDocument;
use crate::error::{ReceiptError, ReceiptResult};
use crate::flight::SingleFlight;
use crate::models::{StoreProfile, Transaction};
use crate::sink::{OutputSink, SerialSink, SinkError, SpoolerSink};

/// Result of one print attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PrintOutcome {
    /// Printed on the attached printer
    Hardware,
    /// Handed to the host print facility
    Fallback,
    /// Neither path worked; the user may retry
    Failed { reason: String },
}

impl PrintOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, PrintOutcome::Failed { .. })
    }

    /// Whether the UI should offer a manual retry
    pub fn can_retry(&self) -> bool {
        self.is_failed()
    }
}

pub struct Dispatcher {
    hardware: Option<Arc<dyn OutputSink>>,
    fallback: Arc<dyn OutputSink>,
    in_flight: SingleFlight,
}

impl Dispatcher {
    pub fn new(hardware: Option<Arc<dyn OutputSink>>, fallback: Arc<dyn OutputSink>) -> Self {
        Self {
            hardware,
            fallback,
            in_flight: SingleFlight::new(),
        }
    }

    /// Serial printer (unless disabled) with the host spooler as fallback
    pub fn from_config(config: &ReceiptConfig) -> Self {
        let hardware = config
            .serial
            .enabled
            .then(|| Arc::new(SerialSink::new(config.serial.clone())) as Arc<dyn OutputSink>);
        let fallback = Arc::new(SpoolerSink::new(config.spooler.clone()));
        Self::new(hardware, fallback)
    }

    pub fn has_hardware(&self) -> bool {
        self.hardware.is_some()
    }

    /// Whether a print for `transaction_id` is running
    pub fn is_printing(&self, transaction_id: &str) -> bool {
        self.in_flight.is_active(transaction_id)
    }

    /// Print a receipt for a completed sale
    ///
    /// Returns [`ReceiptError::PrintInFlight`] if a print for the same
    /// transaction is still running; the running one is left untouched.
    #[instrument(skip_all, fields(transaction_id = %transaction.transaction_id))]
    pub async fn print(
        &self,
        transaction: &Transaction,
        store: &StoreProfile,
        cashier_name: &str,
    ) -> ReceiptResult<PrintOutcome> {
        let _token = self
            .in_flight
            .try_acquire(&transaction.transaction_id)
            .ok_or_else(|| ReceiptError::PrintInFlight(transaction.transaction_id.clone()))?;

        let document = ReceiptDocument::build(transaction, store, cashier_name);
        Ok(self.dispatch(&document).await)
    }

    async fn dispatch(&self, document: &ReceiptDocument) -> PrintOutcome {
        if let Some(hardware) = &self.hardware {
            match hardware.deliver(document).await {
                Ok(()) => {
                    info!("Receipt printed on hardware");
                    return PrintOutcome::Hardware;
                }
                Err(e @ (SinkError::DeviceUnavailable(_) | SinkError::PermissionDenied(_))) => {
                    info!(reason = %e, "Hardware printer not usable, using fallback");
                }
                Err(e) => {
                    warn!(error = %e, "Hardware print failed, using fallback");
                }
            }
        }

        match self.fallback.deliver(document).await {
            Ok(()) => PrintOutcome::Fallback,
            Err(e) => {
                error!(error = %e, "Fallback print failed");
                PrintOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::*;
    use crate::sink::SinkKind;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Sink that fails with a fixed error (or succeeds) and counts calls
    struct ScriptedSink {
        kind: SinkKind,
        fail: Option<fn() -> SinkError>,
        calls: AtomicUsize,
    }

    impl ScriptedSink {
        fn ok(kind: SinkKind) -> Arc<Self> {
            Arc::new(Self {
                kind,
                fail: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(kind: SinkKind, fail: fn() -> SinkError) -> Arc<Self> {
            Arc::new(Self {
                kind,
                fail: Some(fail),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl OutputSink for ScriptedSink {
        fn kind(&self) -> SinkKind {
            self.kind
        }

        async fn deliver(&self, _document: &ReceiptDocument) -> Result<(), SinkError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            match self.fail {
                Some(f) => Err(f()),
                None => Ok(()),
            }
        }
    }

    async fn print_with(
        hardware: Option<Arc<ScriptedSink>>,
        fallback: Arc<ScriptedSink>,
    ) -> PrintOutcome {
        let dispatcher = Dispatcher::new(
            hardware.map(|h| h as Arc<dyn OutputSink>),
            fallback as Arc<dyn OutputSink>,
        );
        dispatcher
            .print(&apple_sale(), &store(), "Dana")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_hardware_success_skips_fallback() {
        let hw = ScriptedSink::ok(SinkKind::Hardware);
        let fb = ScriptedSink::ok(SinkKind::Fallback);
        let outcome = print_with(Some(hw.clone()), fb.clone()).await;
        assert_eq!(outcome, PrintOutcome::Hardware);
        assert_eq!(hw.calls(), 1);
        assert_eq!(fb.calls(), 0);
    }

    #[tokio::test]
    async fn test_no_capability_uses_fallback() {
        let fb = ScriptedSink::ok(SinkKind::Fallback);
        let outcome = print_with(None, fb.clone()).await;
        assert_eq!(outcome, PrintOutcome::Fallback);
        assert_eq!(fb.calls(), 1);
    }

    #[tokio::test]
    async fn test_hardware_errors_degrade_silently() {
        let errors: [fn() -> SinkError; 3] = [
            || SinkError::DeviceUnavailable("none".into()),
            || SinkError::PermissionDenied("declined".into()),
            || SinkError::WriteFailure("cable pulled".into()),
        ];
        for err in errors {
            let hw = ScriptedSink::failing(SinkKind::Hardware, err);
            let fb = ScriptedSink::ok(SinkKind::Fallback);
            let outcome = print_with(Some(hw.clone()), fb.clone()).await;
            assert_eq!(outcome, PrintOutcome::Fallback);
            assert_eq!(fb.calls(), 1);
        }
    }

    #[tokio::test]
    async fn test_render_failure_is_reported() {
        let hw = ScriptedSink::failing(SinkKind::Hardware, || {
            SinkError::DeviceUnavailable("none".into())
        });
        let fb = ScriptedSink::failing(SinkKind::Fallback, || {
            SinkError::RenderFailure("blocked".into())
        });
        let outcome = print_with(Some(hw), fb).await;
        assert!(outcome.is_failed());
        assert!(outcome.can_retry());
        assert!(matches!(outcome, PrintOutcome::Failed { ref reason } if reason.contains("blocked")));
    }

    #[tokio::test]
    async fn test_concurrent_print_rejected() {
        let fb = ScriptedSink::ok(SinkKind::Fallback);
        let dispatcher = Dispatcher::new(None, fb.clone());
        let tx = apple_sale();
        let s = store();

        let (a, b) = tokio::join!(
            dispatcher.print(&tx, &s, "Dana"),
            dispatcher.print(&tx, &s, "Dana")
        );

        assert_eq!(a.unwrap(), PrintOutcome::Fallback);
        assert!(matches!(b, Err(ReceiptError::PrintInFlight(ref id)) if id == "TX-1001"));
        assert_eq!(fb.calls(), 1);
        assert!(!dispatcher.is_printing("TX-1001"));
    }

    #[tokio::test]
    async fn test_sequential_prints_allowed() {
        let fb = ScriptedSink::ok(SinkKind::Fallback);
        let dispatcher = Dispatcher::new(None, fb.clone());
        for _ in 0..2 {
            dispatcher
                .print(&apple_sale(), &store(), "Dana")
                .await
                .unwrap();
        }
        assert_eq!(fb.calls(), 2);
    }

    #[test]
    fn test_from_config() {
        assert!(Dispatcher::from_config(&ReceiptConfig::default()).has_hardware());
        assert!(!Dispatcher::from_config(&ReceiptConfig::default().without_serial()).has_hardware());
    }

    #[test]
    fn test_outcome_serializes() {
        let json = serde_json::to_value(PrintOutcome::Failed {
            reason: "blocked".into(),
        })
        .unwrap();
        assert_eq!(json["outcome"], "failed");
        assert_eq!(json["reason"], "blocked");
        assert_eq!(
            serde_json::to_value(PrintOutcome::Hardware).unwrap()["outcome"],
            "hardware"
        );
    }
}
