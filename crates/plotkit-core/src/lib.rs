//! # PlotKit Core
//!
//! Core types shared by the PlotKit crates: the unified error taxonomy,
//! the explicit configuration surface, and the sequenced program container.

pub mod config;
pub mod error;
pub mod program;

pub use config::{
    Config, EnvelopeSettings, FlowSettings, GeometrySettings, MotionSettings, ProtocolSettings,
};
pub use error::{ChannelError, Error, ParseError, ProgramError, Result};
pub use program::{parse_sequence, Program};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
