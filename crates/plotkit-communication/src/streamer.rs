//! Sliding-window program streaming
//!
//! Streams a sequenced program over a [`CommandChannel`], keeping at most
//! `window_size` commands unacknowledged, retrying on ack timeout, and
//! dropping a command as permanently failed once its retries are
//! exhausted.
//!
//! The whole protocol runs as one cooperative task that owns the pending
//! queue and the in-flight table; receives are bounded by the tick
//! interval so sending, receiving, and the timeout scan interleave without
//! any shared mutable state.

use crate::channel::CommandChannel;
use crate::events::{EventSinkHandle, NullSink, StreamEvent};
use crate::response::DeviceResponse;
use parking_lot::Mutex;
use plotkit_core::{parse_sequence, ChannelError, Program, ProtocolSettings, Result};
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::time::{timeout, Duration, Instant};

/// Delay between protocol ticks when no inbound traffic arrives.
const TICK_INTERVAL: Duration = Duration::from_millis(10);

/// How long to keep draining acknowledgements after the main loop exits.
const DRAIN_GRACE: Duration = Duration::from_secs(5);

/// Poll interval during the drain phase.
const DRAIN_POLL: Duration = Duration::from_millis(100);

/// A sent command awaiting acknowledgement
#[derive(Debug, Clone)]
pub struct InFlightCommand {
    /// The command's sequence number.
    pub seq: u64,
    /// The exact line as sent; retries resend it unchanged.
    pub line: String,
    /// When the line was last (re)sent.
    pub sent_at: Instant,
    /// Resend attempts so far.
    pub retry_count: u32,
}

/// Lifecycle of a streamer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// No stream has run yet
    Idle,
    /// A stream is in progress
    Streaming,
    /// The last stream ran to termination
    Completed,
    /// The last stream was aborted (stop flag or channel failure)
    Aborted,
}

/// Outcome of one stream attempt
#[derive(Debug, Clone, serde::Serialize)]
pub struct StreamSummary {
    /// Commands handed to the streamer.
    pub total: usize,
    /// Commands sent at least once.
    pub sent: usize,
    /// Commands acknowledged.
    pub acked: usize,
    /// Resends performed.
    pub retries: usize,
    /// Commands dropped after exhausting retries.
    pub failed: usize,
    /// Sequence numbers still unacknowledged at exit.
    pub outstanding: Vec<u64>,
    /// Wall-clock duration of the attempt.
    pub elapsed: Duration,
    /// True when nothing is outstanding, nothing failed permanently, and
    /// the stream was not aborted.
    pub success: bool,
}

/// Cooperative stop signal for a running stream
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Request the stream to stop at its next tick.
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether a stop has been requested.
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Streams sequenced programs to a device with reliable delivery
pub struct ProgramStreamer<C: CommandChannel> {
    channel: C,
    settings: ProtocolSettings,
    sink: EventSinkHandle,
    stop: StopHandle,
    state: StreamState,

    pending: VecDeque<String>,
    in_flight: BTreeMap<u64, InFlightCommand>,
    total_commands: usize,
    total_sent: usize,
    total_acked: usize,
    total_retries: usize,
    total_failed: usize,
    last_acked_seq: u64,
}

impl<C: CommandChannel> ProgramStreamer<C> {
    /// Create a streamer over an open channel.
    pub fn new(channel: C, settings: ProtocolSettings) -> Self {
        Self {
            channel,
            settings,
            sink: Arc::new(Mutex::new(NullSink)),
            stop: StopHandle::default(),
            state: StreamState::Idle,
            pending: VecDeque::new(),
            in_flight: BTreeMap::new(),
            total_commands: 0,
            total_sent: 0,
            total_acked: 0,
            total_retries: 0,
            total_failed: 0,
            last_acked_seq: 0,
        }
    }

    /// Attach an event sink; events are delivered in arrival order.
    pub fn with_event_sink(mut self, sink: EventSinkHandle) -> Self {
        self.sink = sink;
        self
    }

    /// Handle for stopping the stream from elsewhere.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Highest sequence number acknowledged so far.
    pub fn last_acked_seq(&self) -> u64 {
        self.last_acked_seq
    }

    /// Stream a compiled program.
    pub async fn stream_program(&mut self, program: &Program) -> Result<StreamSummary> {
        self.stream_commands(program.lines()).await
    }

    /// Stream a list of already-sequenced command lines.
    pub async fn stream_commands(&mut self, commands: &[String]) -> Result<StreamSummary> {
        self.reset(commands);
        self.state = StreamState::Streaming;
        let started = Instant::now();

        tracing::info!(
            total = self.total_commands,
            window = self.settings.window_size,
            ack_timeout_ms = self.settings.ack_timeout_ms,
            "streaming program"
        );

        let aborted = match self.run().await {
            Ok(aborted) => aborted,
            Err(e) => {
                self.state = StreamState::Aborted;
                tracing::error!(error = %e, "streaming failed");
                return Err(e);
            }
        };

        let elapsed = started.elapsed();
        let outstanding: Vec<u64> = self.in_flight.keys().copied().collect();
        let success = !aborted && outstanding.is_empty() && self.total_failed == 0;
        self.state = if aborted {
            StreamState::Aborted
        } else {
            StreamState::Completed
        };

        tracing::info!(
            sent = self.total_sent,
            acked = self.total_acked,
            retries = self.total_retries,
            failed = self.total_failed,
            outstanding = outstanding.len(),
            success,
            "streaming finished"
        );

        Ok(StreamSummary {
            total: self.total_commands,
            sent: self.total_sent,
            acked: self.total_acked,
            retries: self.total_retries,
            failed: self.total_failed,
            outstanding,
            elapsed,
            success,
        })
    }

    fn reset(&mut self, commands: &[String]) {
        self.pending = commands.iter().cloned().collect();
        self.in_flight.clear();
        self.total_commands = commands.len();
        self.total_sent = 0;
        self.total_acked = 0;
        self.total_retries = 0;
        self.total_failed = 0;
        self.last_acked_seq = 0;
        self.stop.clear();
    }

    /// Main protocol loop. Returns whether the stream was aborted.
    async fn run(&mut self) -> Result<bool> {
        let ack_timeout = Duration::from_millis(self.settings.ack_timeout_ms);
        let window = self.settings.window_size.max(1);
        let mut aborted = false;

        while !self.pending.is_empty() || !self.in_flight.is_empty() {
            if self.stop.is_stopped() {
                tracing::warn!(
                    outstanding = self.in_flight.len(),
                    "streaming stopped by user"
                );
                aborted = true;
                break;
            }

            // Fill the window.
            while self.in_flight.len() < window {
                let Some(line) = self.pending.pop_front() else {
                    break;
                };
                self.send_tracked(line).await?;
            }
            debug_assert!(self.in_flight.len() <= window);

            // Receive until the tick elapses; the tick delay doubles as the
            // cooperative yield point.
            match timeout(TICK_INTERVAL, self.channel.recv_line()).await {
                Ok(Ok(Some(line))) => self.handle_line(&line),
                Ok(Ok(None)) => return Err(ChannelError::Closed.into()),
                Ok(Err(e)) => return Err(e),
                Err(_) => {}
            }

            self.check_timeouts(ack_timeout).await?;

            self.emit(StreamEvent::Progress {
                acked: self.total_acked,
                total: self.total_commands,
            });
        }

        // Bounded grace period for straggling acknowledgements. Skipped on
        // abort: outstanding entries are reported, not retried further.
        if !aborted && !self.in_flight.is_empty() {
            tracing::info!(
                outstanding = self.in_flight.len(),
                "waiting for final acknowledgements"
            );
            let deadline = Instant::now() + DRAIN_GRACE;
            while !self.in_flight.is_empty() && Instant::now() < deadline {
                match timeout(DRAIN_POLL, self.channel.recv_line()).await {
                    Ok(Ok(Some(line))) => self.handle_line(&line),
                    Ok(Ok(None)) => break,
                    Ok(Err(e)) => return Err(e),
                    Err(_) => {}
                }
                self.check_timeouts(ack_timeout).await?;
            }
        }

        Ok(aborted)
    }

    async fn send_tracked(&mut self, line: String) -> Result<()> {
        let Some(seq) = parse_sequence(&line) else {
            tracing::warn!(line = %line, "command missing sequence number, skipping");
            return Ok(());
        };

        self.channel.send_line(&line).await?;
        self.in_flight.insert(
            seq,
            InFlightCommand {
                seq,
                line,
                sent_at: Instant::now(),
                retry_count: 0,
            },
        );
        self.total_sent += 1;
        Ok(())
    }

    fn handle_line(&mut self, line: &str) {
        match DeviceResponse::parse(line) {
            DeviceResponse::Ack { seq } => {
                if self.in_flight.remove(&seq).is_some() {
                    self.total_acked += 1;
                    self.last_acked_seq = self.last_acked_seq.max(seq);
                    self.emit(StreamEvent::Ack { seq });
                } else {
                    tracing::debug!(seq, "ignoring acknowledgement for unknown sequence");
                }
            }
            DeviceResponse::Error { seq, detail } => {
                tracing::warn!(line = %detail, "device reported error");
                self.emit(StreamEvent::Failure {
                    seq,
                    message: detail,
                });
            }
            DeviceResponse::Busy { detail } => {
                tracing::debug!(%detail, "device busy");
            }
            DeviceResponse::Telemetry { payload } => {
                self.emit(StreamEvent::Telemetry { payload });
            }
            DeviceResponse::MalformedTelemetry { raw } => {
                tracing::warn!(%raw, "failed to parse telemetry payload");
            }
            DeviceResponse::Status { line } => {
                self.emit(StreamEvent::Status { line });
            }
            DeviceResponse::Position { line } => {
                tracing::debug!(%line, "position report");
            }
            DeviceResponse::Unrecognized { line } => {
                tracing::debug!(%line, "unrecognized response");
            }
        }
    }

    /// Resend timed-out commands; drop them once retries are exhausted.
    async fn check_timeouts(&mut self, ack_timeout: Duration) -> Result<()> {
        let now = Instant::now();
        let expired: Vec<u64> = self
            .in_flight
            .values()
            .filter(|c| now.duration_since(c.sent_at) > ack_timeout)
            .map(|c| c.seq)
            .collect();

        for seq in expired {
            let Some(entry) = self.in_flight.get(&seq) else {
                continue;
            };
            let retry_count = entry.retry_count;
            let line = entry.line.clone();

            if retry_count < self.settings.max_retries {
                tracing::warn!(
                    seq,
                    attempt = retry_count + 1,
                    max = self.settings.max_retries,
                    "ack timeout, resending"
                );
                self.channel.send_line(&line).await?;
                if let Some(entry) = self.in_flight.get_mut(&seq) {
                    entry.retry_count += 1;
                    entry.sent_at = Instant::now();
                }
                self.total_retries += 1;
            } else {
                self.in_flight.remove(&seq);
                self.total_failed += 1;
                tracing::error!(seq, "retries exhausted, dropping command");
                self.emit(StreamEvent::Failure {
                    seq: Some(seq),
                    message: format!("Max retries exceeded: N{}", seq),
                });
            }
        }
        Ok(())
    }

    fn emit(&self, event: StreamEvent) {
        self.sink.lock().emit(event);
    }

    /// Ask the device for a status report (unsequenced query).
    pub async fn request_status(&mut self) -> Result<()> {
        self.channel.send_line("N0 M408").await
    }

    /// Send an immediate homing command outside any program.
    pub async fn send_home(&mut self) -> Result<()> {
        self.channel.send_line("N0 G28").await
    }

    /// Turn flow off immediately, pausing material output.
    pub async fn send_pause(&mut self) -> Result<()> {
        self.channel.send_line("N0 M5").await
    }
}
