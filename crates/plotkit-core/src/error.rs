//! Error handling for PlotKit
//!
//! Provides error types for all layers of the pipeline:
//! - Parse errors (vector path grammar and SVG import)
//! - Channel errors (device communication)
//! - Program errors (malformed program files)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Geometry parse error type
///
/// Represents fatal errors raised while parsing vector path data or an SVG
/// document. Parsing aborts on the first error; no partial program is
/// produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A path command letter outside the supported grammar
    #[error("Unknown path command '{command}'")]
    UnknownCommand {
        /// The unrecognized command letter.
        command: char,
    },

    /// A coordinate token that is not a valid number
    #[error("Invalid number '{token}' in path data")]
    InvalidNumber {
        /// The offending token text.
        token: String,
    },

    /// A command was given the wrong number of coordinates
    #[error("Command '{command}' expects coordinates in groups of {expected}, got {got}")]
    WrongArity {
        /// The command letter.
        command: char,
        /// Coordinates required per group (0 for none).
        expected: usize,
        /// Coordinates actually supplied.
        got: usize,
    },

    /// Path data started with coordinates instead of a command
    #[error("Path data must start with a command, found '{token}'")]
    ExpectedCommand {
        /// The token found instead of a command letter.
        token: String,
    },

    /// SVG document could not be processed
    #[error("SVG import failed: {reason}")]
    Svg {
        /// The reason the document was rejected.
        reason: String,
    },
}

/// Channel error type
///
/// Represents errors on the line-based device channel. Any of these is
/// fatal to the stream attempt that observed it.
#[derive(Error, Debug, Clone)]
pub enum ChannelError {
    /// The peer closed the channel
    #[error("Channel closed by peer")]
    Closed,

    /// A line could not be sent
    #[error("Send failed: {reason}")]
    SendFailed {
        /// The underlying failure description.
        reason: String,
    },

    /// A line could not be received
    #[error("Receive failed: {reason}")]
    ReceiveFailed {
        /// The underlying failure description.
        reason: String,
    },
}

/// Program container error type
#[derive(Error, Debug, Clone)]
pub enum ProgramError {
    /// A stored program line is missing its `N<seq>` prefix
    #[error("Program line {line_number} has no sequence number: {line}")]
    MissingSequence {
        /// 1-based line number in the file.
        line_number: usize,
        /// The offending line text.
        line: String,
    },
}

/// Main error type for PlotKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry parse error
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Channel error
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// Program container error
    #[error(transparent)]
    Program(#[from] ProgramError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a parse error
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::Parse(_))
    }

    /// Check if this is a channel error
    pub fn is_channel_error(&self) -> bool {
        matches!(self, Error::Channel(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
