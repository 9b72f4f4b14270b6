//! Outbound command channel to the native host
//!
//! The host receives a command name plus an opaque parameter string (a JSON
//! object, a raw scalar, or empty) and eventually calls back into the
//! controller with fresh state. The send is fire-and-forget: no synchronous
//! response, no cancellation, no ordering guarantee beyond "callback, if
//! any, happens after the send".

use std::sync::{Arc, Mutex};

/// Trait for outbound command delivery
pub trait OutboundChannel: Send {
    /// Deliver a command to the host. Must not block the caller.
    fn notify(&self, operation: &str, params: &str);
}

/// Channel that drops every command; useful when no host is attached yet.
#[derive(Debug, Default)]
pub struct NullChannel;

impl OutboundChannel for NullChannel {
    fn notify(&self, operation: &str, params: &str) {
        log::debug!("dropping outbound command {operation}?params={params}");
    }
}

/// Channel that records every command for inspection; the test double for
/// the native host.
#[derive(Debug, Clone, Default)]
pub struct RecordingChannel {
    commands: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all commands sent so far, in send order
    pub fn commands(&self) -> Vec<(String, String)> {
        self.commands.lock().unwrap().clone()
    }

    /// The most recently sent command, if any
    pub fn last(&self) -> Option<(String, String)> {
        self.commands.lock().unwrap().last().cloned()
    }
}

impl OutboundChannel for RecordingChannel {
    fn notify(&self, operation: &str, params: &str) {
        log::debug!("recording outbound command {operation}?params={params}");
        self.commands
            .lock()
            .unwrap()
            .push((operation.to_string(), params.to_string()));
    }
}
