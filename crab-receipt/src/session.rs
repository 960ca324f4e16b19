//! Receipt screen orchestration
//!
//! One [`ReceiptSession`] per completed sale. State machine:
//!
//! ```text
//! Idle --shown--> AutoPrinting --print returns--> Ready
//! Ready --reprint--> Reprinting --print returns--> Ready
//! any --close / new transaction--> (consumed)
//! ```
//!
//! The automatic print fires once, after `auto_print_delay_ms`. Closing the
//! session before the delay elapses cancels it. A reprint is only accepted
//! from `Ready`, so rapid taps never queue a second print.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::composer::compose;
use crate::config::ReceiptConfig;
use crate::dispatcher::{Dispatcher, PrintOutcome};
use crate::error::{ReceiptError, ReceiptResult};
use crate::models::{StoreProfile, Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    AutoPrinting,
    Ready,
    Reprinting,
}

/// What the UI should do after the session ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NextStep {
    /// Back to the previous screen
    Dismiss,
    /// Checkout should start a fresh sale
    NewTransaction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionClosed {
    pub transaction_id: String,
    pub next: NextStep,
}

/// Everything a print needs, shareable with the timer task
#[derive(Clone)]
struct PrintJob {
    dispatcher: Arc<Dispatcher>,
    transaction: Arc<Transaction>,
    store: Arc<StoreProfile>,
    cashier_name: Arc<str>,
    state: Arc<watch::Sender<SessionState>>,
    outcome: Arc<watch::Sender<Option<PrintOutcome>>>,
}

impl PrintJob {
    /// Print once and return to `Ready`, even if the caller goes away mid-print
    async fn run(&self) -> ReceiptResult<PrintOutcome> {
        let _ready = ReadyOnDrop(self.state.clone());
        let outcome = self
            .dispatcher
            .print(&self.transaction, &self.store, &self.cashier_name)
            .await?;
        self.outcome.send_replace(Some(outcome.clone()));
        Ok(outcome)
    }
}

struct ReadyOnDrop(Arc<watch::Sender<SessionState>>);

impl Drop for ReadyOnDrop {
    fn drop(&mut self) {
        self.0.send_replace(SessionState::Ready);
    }
}

pub struct ReceiptSession {
    job: PrintJob,
    preview: String,
    delay: Duration,
    cancel: CancellationToken,
}

impl ReceiptSession {
    /// Open the receipt screen for a completed sale
    ///
    /// Rejects a transaction that breaks its invariants; nothing is printed
    /// in that case.
    #[instrument(skip_all, fields(transaction_id = %transaction.transaction_id))]
    pub fn open(
        dispatcher: Arc<Dispatcher>,
        transaction: Transaction,
        store: StoreProfile,
        cashier_name: impl Into<String>,
        config: &ReceiptConfig,
    ) -> ReceiptResult<Self> {
        transaction.validate()?;

        let cashier_name: String = cashier_name.into();
        let preview = compose(&transaction, &store, &cashier_name);
        let (state, _) = watch::channel(SessionState::Idle);
        let (outcome, _) = watch::channel(None);

        info!(items = transaction.items.len(), total = %transaction.total, "Receipt session opened");

        Ok(Self {
            job: PrintJob {
                dispatcher,
                transaction: Arc::new(transaction),
                store: Arc::new(store),
                cashier_name: cashier_name.into(),
                state: Arc::new(state),
                outcome: Arc::new(outcome),
            },
            preview,
            delay: config.auto_print_delay(),
            cancel: CancellationToken::new(),
        })
    }

    pub fn transaction_id(&self) -> &str {
        &self.job.transaction.transaction_id
    }

    /// Composed receipt text for on-screen display
    pub fn preview(&self) -> &str {
        &self.preview
    }

    pub fn state(&self) -> SessionState {
        *self.job.state.borrow()
    }

    /// Watch state transitions
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.job.state.subscribe()
    }

    /// Outcome of the most recent completed print
    pub fn last_outcome(&self) -> Option<PrintOutcome> {
        self.job.outcome.borrow().clone()
    }

    /// The preview is on screen: schedule the one automatic print
    ///
    /// Must run inside a Tokio runtime.
    pub fn shown(&self) -> ReceiptResult<()> {
        self.transition(SessionState::Idle, SessionState::AutoPrinting, "show")?;

        let job = self.job.clone();
        let cancel = self.cancel.clone();
        let delay = self.delay;
        let transaction_id = self.transaction_id().to_string();

        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(transaction_id = %transaction_id, "Auto-print cancelled");
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }
            if let Err(e) = job.run().await {
                warn!(transaction_id = %transaction_id, error = %e, "Auto-print skipped");
            }
        });

        Ok(())
    }

    /// Print again (also the manual retry after a failed print)
    ///
    /// Only accepted from `Ready`; a reprint while another print runs is
    /// rejected with [`ReceiptError::SessionState`].
    #[instrument(skip_all, fields(transaction_id = %self.transaction_id()))]
    pub async fn reprint(&self) -> ReceiptResult<PrintOutcome> {
        self.transition(SessionState::Ready, SessionState::Reprinting, "reprint")?;
        info!("Reprint requested");
        self.job.run().await
    }

    /// Wait until no print is running or scheduled
    ///
    /// Resolves immediately in `Ready`, and in `Idle` since nothing is
    /// scheduled before [`shown`](Self::shown).
    pub async fn wait_ready(&self) {
        let mut rx = self.subscribe();
        // sender lives in self, so the channel cannot close here
        let _ = rx
            .wait_for(|s| matches!(s, SessionState::Ready | SessionState::Idle))
            .await;
    }

    /// Leave the receipt screen
    pub fn close(self) -> SessionClosed {
        self.finish(NextStep::Dismiss)
    }

    /// Leave the receipt screen and ask checkout for a fresh sale
    pub fn new_transaction(self) -> SessionClosed {
        self.finish(NextStep::NewTransaction)
    }

    fn finish(self, next: NextStep) -> SessionClosed {
        self.cancel.cancel();
        info!(transaction_id = %self.transaction_id(), ?next, state = ?self.state(), "Receipt session closed");
        SessionClosed {
            transaction_id: self.transaction_id().to_string(),
            next,
        }
    }

    fn transition(
        &self,
        from: SessionState,
        to: SessionState,
        action: &'static str,
    ) -> ReceiptResult<()> {
        let mut current = from;
        let moved = self.job.state.send_if_modified(|state| {
            if *state == from {
                *state = to;
                true
            } else {
                current = *state;
                false
            }
        });
        if moved {
            Ok(())
        } else {
            Err(ReceiptError::SessionState {
                action,
                state: current,
            })
        }
    }
}

impl Drop for ReceiptSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
