//! Error types for the receipt subsystem

use thiserror::Error;

use crate::session::SessionState;

#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Transaction handed over by checkout breaks an invariant
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    /// A print for this transaction is already running
    #[error("Print already in flight for transaction {0}")]
    PrintInFlight(String),

    /// Session action not allowed in the current state
    #[error("Cannot {action} while {state:?}")]
    SessionState {
        action: &'static str,
        state: SessionState,
    },

    #[error("Invalid config: {0}")]
    Config(String),
}

pub type ReceiptResult<T> = Result<T, ReceiptError>;
