//! Error types for the session server.

use crate::role::Role;
use derive_more::{Display, Error};
use tracing::instrument;

/// A client line that is not a usable move.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ProtocolError {
    /// The line is not an unsigned integer.
    #[display("Malformed move {:?}", _0)]
    Malformed(String),
    /// The index is past the last cell.
    #[display("Cell index {} is out of range (0-8)", _0)]
    OutOfRange(usize),
}

impl std::error::Error for ProtocolError {}

/// Seating failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum SessionError {
    /// Both seats are already taken.
    #[display("Session already has 2 participants")]
    Full,
}

/// Fault that ends one participant channel.
#[derive(Debug, Display, Error)]
pub enum ChannelError {
    /// The remote side closed the stream before the game ended.
    #[display("The {role} participant disconnected")]
    Disconnected {
        /// Role whose stream closed.
        role: Role,
    },
    /// Reading from or writing to the stream failed.
    #[display("I/O error on the {role} participant's stream: {source}")]
    Io {
        /// Role whose stream failed.
        role: Role,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The participant's outbound queue was closed before the channel ended.
    #[display("Outbound queue for the {role} participant is closed")]
    OutboxClosed {
        /// Role whose queue closed.
        role: Role,
    },
    /// The writer task panicked or was cancelled.
    #[display("Writer task for the {role} participant failed: {source}")]
    Writer {
        /// Role whose writer failed.
        role: Role,
        /// Underlying join error.
        source: tokio::task::JoinError,
    },
    /// The participant's task panicked or was cancelled.
    #[display("Task for the {role} participant failed: {source}")]
    Task {
        /// Role whose task failed.
        role: Role,
        /// Underlying join error.
        source: tokio::task::JoinError,
    },
}

impl ChannelError {
    /// Role of the channel that failed.
    pub fn role(&self) -> Role {
        match self {
            ChannelError::Disconnected { role }
            | ChannelError::Io { role, .. }
            | ChannelError::OutboxClosed { role }
            | ChannelError::Writer { role, .. }
            | ChannelError::Task { role, .. } => *role,
        }
    }
}

/// Fatal listener failure.
#[derive(Debug, Display, Error)]
pub enum ListenerError {
    /// The listen address could not be bound.
    #[display("Cannot bind {addr}: {source}")]
    Bind {
        /// Address that failed to bind.
        addr: String,
        /// Underlying error.
        source: std::io::Error,
    },
    /// Accepting a connection failed.
    #[display("Cannot accept connection: {_0}")]
    Accept(std::io::Error),
    /// The bound socket has no local address.
    #[display("Cannot read local address: {_0}")]
    LocalAddr(std::io::Error),
    /// An accepted connection could not be seated.
    #[display("Cannot seat participant: {_0}")]
    Seat(SessionError),
}

impl From<SessionError> for ListenerError {
    fn from(err: SessionError) -> Self {
        Self::Seat(err)
    }
}

/// Configuration error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
