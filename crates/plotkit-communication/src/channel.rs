//! Line-based device channel abstraction
//!
//! The streamer only needs to send a line of text and receive lines back;
//! how the connection is established (serial, TCP, WebSocket) is the
//! caller's concern.

use async_trait::async_trait;
use plotkit_core::Result;

/// A bidirectional, line-oriented command channel
///
/// `recv_line` must be cancel-safe: the streamer bounds every receive with
/// its tick interval, and a cancelled receive must not lose an inbound
/// line.
#[async_trait]
pub trait CommandChannel: Send {
    /// Send one command line to the device.
    async fn send_line(&mut self, line: &str) -> Result<()>;

    /// Receive the next inbound line.
    ///
    /// Returns `Ok(None)` once the peer has closed the channel.
    async fn recv_line(&mut self) -> Result<Option<String>>;
}

/// A channel that goes nowhere
///
/// Discards sends and reports the channel as closed on receive. Useful as
/// a placeholder when wiring components together.
#[derive(Debug, Default)]
pub struct NoOpChannel;

#[async_trait]
impl CommandChannel for NoOpChannel {
    async fn send_line(&mut self, _line: &str) -> Result<()> {
        Ok(())
    }

    async fn recv_line(&mut self) -> Result<Option<String>> {
        Ok(None)
    }
}
