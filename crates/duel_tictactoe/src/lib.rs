//! Pure tic-tac-toe game logic for the duel session server.
//!
//! This crate knows nothing about networking or concurrency. It provides
//! the board, the marks placed on it and the rules that decide whether a
//! game is still running, won or tied.
//!
//! # Example
//!
//! ```
//! use duel_tictactoe::{Board, Mark, Outcome, Position};
//!
//! let mut board = Board::new();
//! for pos in [Position::TopLeft, Position::TopCenter, Position::TopRight] {
//!     board.place(pos, Mark::X).unwrap();
//! }
//! assert_eq!(board.outcome(), Outcome::Win(Mark::X));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod position;
pub mod rules;
mod types;

pub use action::{BoardError, Move};
pub use position::Position;
pub use types::{Board, Mark, Outcome, Square};
