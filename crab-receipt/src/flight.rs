//! Single-flight guard
//!
//! At most one print per transaction id at a time. A [`FlightToken`] holds
//! the key and frees it on drop, so every exit path (including a cancelled
//! future) releases it.

use std::sync::Arc;

use dashmap::DashSet;

#[derive(Debug, Clone, Default)]
pub struct SingleFlight {
    active: Arc<DashSet<String>>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `key`; `None` while another token for it is alive
    pub fn try_acquire(&self, key: &str) -> Option<FlightToken> {
        if self.active.insert(key.to_string()) {
            Some(FlightToken {
                active: Arc::clone(&self.active),
                key: key.to_string(),
            })
        } else {
            None
        }
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.active.contains(key)
    }
}

/// Proof of an in-flight claim
#[derive(Debug)]
pub struct FlightToken {
    active: Arc<DashSet<String>>,
    key: String,
}

impl FlightToken {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for FlightToken {
    fn drop(&mut self) {
        self.active.remove(&self.key);
    }
}
