//! Game rules for tic-tac-toe.
//!
//! Pure functions evaluating a [`Board`]. Rules are kept apart from board
//! storage so the server can evaluate the board inside its own critical
//! section without the board owning any policy.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::is_winner;

use super::{Board, Mark, Outcome};
use tracing::{error, instrument};

/// Evaluates the board in priority order: X wins, O wins, full board.
///
/// Both marks owning a line cannot arise from alternating play. If it does
/// the board was filled by something other than the session, so it is
/// reported at error level and resolved as a win for X.
#[instrument(skip(board))]
pub fn outcome(board: &Board) -> Outcome {
    let x_wins = is_winner(board, Mark::X);
    let o_wins = is_winner(board, Mark::O);

    match (x_wins, o_wins) {
        (true, true) => {
            error!(board = %board.display(), "Both marks own a line");
            Outcome::Win(Mark::X)
        }
        (true, false) => Outcome::Win(Mark::X),
        (false, true) => Outcome::Win(Mark::O),
        (false, false) if is_full(board) => Outcome::Tie,
        (false, false) => Outcome::Ongoing,
    }
}
