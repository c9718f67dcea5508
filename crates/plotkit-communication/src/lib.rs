//! # PlotKit Communication
//!
//! Reliable delivery of compiled programs to the plotter over a
//! line-oriented channel: a sliding-window acknowledgement/retry protocol
//! with telemetry, status, and failure reporting through a closed event
//! set.

pub mod channel;
pub mod events;
pub mod response;
pub mod streamer;

pub use channel::{CommandChannel, NoOpChannel};
pub use events::{CollectingSink, EventSink, EventSinkHandle, NullSink, StreamEvent};
pub use response::DeviceResponse;
pub use streamer::{InFlightCommand, ProgramStreamer, StopHandle, StreamState, StreamSummary};
