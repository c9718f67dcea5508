//! Stream event sink
//!
//! The streamer reports everything observable through a closed set of
//! event variants, delivered in arrival order to a single sink handle.

use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// An observable event raised while streaming a program
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A command was acknowledged by the device
    Ack {
        /// The acknowledged sequence number.
        seq: u64,
    },
    /// A command failed permanently (device error or retry exhaustion)
    Failure {
        /// The sequence concerned, when known.
        seq: Option<u64>,
        /// Human-readable description.
        message: String,
    },
    /// A parsed telemetry payload arrived
    Telemetry {
        /// The JSON payload.
        payload: Value,
    },
    /// A status report line arrived
    Status {
        /// The full status line.
        line: String,
    },
    /// Delivery progress
    Progress {
        /// Commands acknowledged so far.
        acked: usize,
        /// Total commands in the program.
        total: usize,
    },
}

/// Receives stream events in arrival order
pub trait EventSink: Send {
    /// Handle one event. Called from the streaming task; keep it quick.
    fn emit(&mut self, event: StreamEvent);
}

/// Shared handle to an event sink
pub type EventSinkHandle = Arc<Mutex<dyn EventSink>>;

/// A sink that drops every event
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: StreamEvent) {}
}

/// A sink that stores every event, for inspection in tests and tooling
#[derive(Debug, Default)]
pub struct CollectingSink {
    /// The events received so far, oldest first.
    pub events: Vec<StreamEvent>,
}

impl EventSink for CollectingSink {
    fn emit(&mut self, event: StreamEvent) {
        self.events.push(event);
    }
}
