//! Two-party tic-tac-toe session server.
//!
//! A [`Listener`] accepts exactly two TCP connections, seats them as the
//! first (X) and second (O) participant of one [`Session`], and runs a
//! [`Participant`] channel for each. The session coordinator enforces turn
//! order and forwards every applied move to the opponent.
//!
//! The wire protocol is line oriented: the client sends a cell index
//! (`0`-`8`) per line, the server answers with the lines produced by
//! [`ServerMessage`].
//!
//! ```
//! use duel_server::{MoveVerdict, Role, Session};
//! use duel_tictactoe::Position;
//! use tokio::sync::mpsc;
//!
//! let session = Session::new();
//! let (first, _first_rx) = mpsc::unbounded_channel();
//! let (second, _second_rx) = mpsc::unbounded_channel();
//! assert_eq!(session.seat(first), Ok(Role::First));
//! assert_eq!(session.seat(second), Ok(Role::Second));
//!
//! let verdict = session.try_submit_move(Role::First, Position::Center);
//! assert_eq!(verdict, MoveVerdict::Valid);
//! assert_eq!(session.to_move(), Role::Second);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod listener;
mod participant;
mod protocol;
mod role;
mod session;

pub use config::{DEFAULT_PORT, ServerConfig};
pub use error::{ChannelError, ConfigError, ListenerError, ProtocolError, SessionError};
pub use listener::{Listener, MatchReport};
pub use participant::Participant;
pub use protocol::{ServerMessage, parse_move};
pub use role::Role;
pub use session::{MoveVerdict, Outbox, SEATS, Session};
