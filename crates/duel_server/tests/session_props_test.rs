//! Property-based tests for turn order and write-once cells.
//!
//! Increase cases locally with: PROPTEST_CASES=2000 cargo test -p duel_server

use duel_server::{MoveVerdict, Role, ServerMessage, Session};
use duel_tictactoe::{Board, Position, Square};
use proptest::prelude::*;
use std::env;
use tokio::sync::mpsc;

fn proptest_config() -> ProptestConfig {
    let cases = env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(256);

    ProptestConfig {
        cases,
        ..ProptestConfig::default()
    }
}

/// Every order in which the nine cells can be claimed.
fn cell_order() -> impl Strategy<Value = Vec<usize>> {
    Just((0..9).collect::<Vec<usize>>()).prop_shuffle()
}

fn seated_session() -> (
    Session,
    mpsc::UnboundedReceiver<ServerMessage>,
    mpsc::UnboundedReceiver<ServerMessage>,
) {
    let session = Session::new();
    let (first_tx, first_rx) = mpsc::unbounded_channel();
    let (second_tx, second_rx) = mpsc::unbounded_channel();
    session.seat(first_tx).unwrap();
    session.seat(second_tx).unwrap();
    (session, first_rx, second_rx)
}

fn occupied(board: &Board) -> usize {
    board
        .squares()
        .iter()
        .filter(|square| **square != Square::Empty)
        .count()
}

proptest! {
    #![proptest_config(proptest_config())]

    /// Turns alternate from the first role, each applied move fills exactly
    /// one new cell, and replaying a taken cell changes nothing.
    #[test]
    fn prop_alternating_play_is_write_once(order in cell_order()) {
        let (session, _first_rx, _second_rx) = seated_session();
        let mut expected = Role::First;
        let mut claimed: Vec<Position> = Vec::new();

        for index in order {
            let position = Position::from_index(index).unwrap();
            prop_assert_eq!(session.to_move(), expected);

            prop_assert_eq!(session.try_submit_move(expected, position), MoveVerdict::Valid);
            claimed.push(position);
            expected = expected.opponent();

            let board = session.board();
            prop_assert_eq!(session.to_move(), expected);
            prop_assert_eq!(session.history().len(), occupied(&board));
            prop_assert_eq!(session.history().len(), claimed.len());

            if session.outcome().is_terminal() {
                prop_assert_eq!(
                    session.try_submit_move(expected, position),
                    MoveVerdict::GameOver
                );
                prop_assert_eq!(session.board(), board);
                break;
            }
            for taken in &claimed {
                prop_assert_eq!(
                    session.try_submit_move(expected, *taken),
                    MoveVerdict::Occupied
                );
                prop_assert_eq!(session.board(), board.clone());
                prop_assert_eq!(session.to_move(), expected);
            }
        }

        let marks = session.history().iter().map(|m| m.mark).collect::<Vec<_>>();
        for (turn, mark) in marks.iter().enumerate() {
            let role = if turn % 2 == 0 { Role::First } else { Role::Second };
            prop_assert_eq!(*mark, role.mark());
        }
    }

    /// The role off turn is always refused and never changes the board.
    #[test]
    fn prop_off_turn_never_applies(order in cell_order()) {
        let (session, _first_rx, _second_rx) = seated_session();

        for index in order {
            if session.outcome().is_terminal() {
                break;
            }
            let position = Position::from_index(index).unwrap();
            let mover = session.to_move();
            let board = session.board();

            prop_assert_eq!(
                session.try_submit_move(mover.opponent(), position),
                MoveVerdict::NotYourTurn
            );
            prop_assert_eq!(session.board(), board);
            prop_assert_eq!(session.to_move(), mover);

            prop_assert_eq!(session.try_submit_move(mover, position), MoveVerdict::Valid);
        }
    }
}
