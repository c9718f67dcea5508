//! # PlotKit
//!
//! A Rust toolpath compiler and reliable command streamer for small XY
//! plotters.
//!
//! ## Architecture
//!
//! PlotKit is organized as a workspace with multiple crates:
//!
//! 1. **plotkit-core** - Error taxonomy, configuration, program container
//! 2. **plotkit-compiler** - SVG import, path parsing, tessellation,
//!    simplification, path ordering, program emission
//! 3. **plotkit-communication** - Line channel abstraction, device response
//!    parsing, sliding-window reliable delivery
//! 4. **plotkit** - Main binary that compiles drawings to program files
//!
//! ## Pipeline
//!
//! Geometry flows strictly: parse (curves tessellated inline) → normalize →
//! simplify → optimize → emit → stream.

pub use plotkit_compiler as compiler;
pub use plotkit_communication as communication;

pub use plotkit_core::{
    parse_sequence, ChannelError, Config, EnvelopeSettings, Error, FlowSettings,
    GeometrySettings, MotionSettings, ParseError, Program, ProgramError, ProtocolSettings,
    Result,
};

pub use plotkit_compiler::{
    emit_point_list, CompileStats, CompiledJob, ConstraintWarning, PlotPath, Point,
    ProgramEmitter, SvgImporter, ToolpathCompiler,
};

pub use plotkit_communication::{
    CommandChannel, DeviceResponse, EventSink, EventSinkHandle, NoOpChannel, ProgramStreamer,
    StopHandle, StreamEvent, StreamState, StreamSummary,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with console output and `RUST_LOG`
/// environment variable support.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
