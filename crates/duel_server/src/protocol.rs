//! Line-oriented wire protocol.
//!
//! Every server message is rendered by its `Display` impl and written
//! followed by a newline. [`ServerMessage::OpponentMoved`] spans two lines:
//! a marker line and the cell index. Clients send one cell index per line.

use crate::error::ProtocolError;
use duel_tictactoe::{Mark, Outcome, Position};
use tracing::instrument;

/// A message sent from the server to one participant.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ServerMessage {
    /// The mark assigned to the participant.
    #[display("{_0}")]
    Mark(Mark),
    /// Sent to the first participant on connection.
    #[display("Player X connected")]
    FirstConnected,
    /// Sent to the first participant after [`ServerMessage::FirstConnected`].
    #[display("Waiting for another player")]
    Waiting,
    /// Sent to the first participant once the second has connected.
    #[display("Other player connected. Your move.")]
    OpponentArrived,
    /// Sent to the second participant on connection.
    #[display("Player O connected, please wait")]
    PleaseWait,
    /// The submitted move was applied.
    #[display("Valid move.")]
    ValidMove,
    /// The submitted move was rejected; the participant may retry.
    #[display("Invalid move, try again")]
    InvalidMove,
    /// The opponent placed a mark at the position.
    #[display("Opponent moved\n{}", _0.to_index())]
    OpponentMoved(Position),
    /// The game has ended; the connection closes after this line.
    #[display("Game over: {}", describe(_0))]
    GameOver(Outcome),
}

fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Win(mark) => format!("{mark} wins"),
        Outcome::Tie => "tie".to_string(),
        Outcome::Ongoing => "ongoing".to_string(),
    }
}

/// Parses one client line into a board position.
///
/// Surrounding whitespace is ignored. Anything that is not an unsigned
/// integer is malformed; integers past 8 are out of range.
#[instrument]
pub fn parse_move(line: &str) -> Result<Position, ProtocolError> {
    let token = line.trim();
    let index: usize = token
        .parse()
        .map_err(|_| ProtocolError::Malformed(token.to_string()))?;
    Position::from_index(index).ok_or(ProtocolError::OutOfRange(index))
}
