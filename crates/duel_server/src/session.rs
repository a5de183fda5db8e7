//! Session coordinator shared by both participant channels.
//!
//! All mutable game state lives in one [`SessionState`] behind one mutex.
//! The mutex is only held for short, synchronous sections and never across
//! an `.await`, so a participant stalled on network I/O can never block the
//! other participant's moves.
//!
//! Two wait conditions sit next to the lock:
//!
//! - `opponent_joined`: the join-wait, "both seats are taken".
//! - `turn_changed`: the turn-wait, "the role-to-move or the outcome changed".
//!
//! Every waiter registers with the [`Notify`] *before* checking its
//! predicate under the lock and re-checks after each wake. A state change
//! that lands between the check and the `.await` therefore still wakes it.

use crate::error::SessionError;
use crate::protocol::ServerMessage;
use crate::role::Role;
use duel_tictactoe::{Board, Move, Outcome, Position};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::{Notify, mpsc};
use tracing::{debug, info, instrument, warn};

/// Number of participants in a session.
pub const SEATS: usize = 2;

/// Queue of messages waiting to be written to one participant's stream.
pub type Outbox = mpsc::UnboundedSender<ServerMessage>;

/// Result of submitting a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum MoveVerdict {
    /// The move was applied and the turn passed to the opponent.
    #[display("valid")]
    Valid,
    /// The square is taken; nothing changed and the turn stays.
    #[display("occupied")]
    Occupied,
    /// Not the submitter's turn (only from [`Session::try_submit_move`]).
    #[display("not your turn")]
    NotYourTurn,
    /// The game already ended; nothing changed.
    #[display("game over")]
    GameOver,
}

#[derive(Debug)]
struct SessionState {
    board: Board,
    to_move: Role,
    seated: usize,
    connected: usize,
    outcome: Outcome,
    history: Vec<Move>,
    outboxes: [Option<Outbox>; SEATS],
}

impl SessionState {
    fn new() -> Self {
        Self {
            board: Board::new(),
            to_move: Role::First,
            seated: 0,
            connected: 0,
            outcome: Outcome::Ongoing,
            history: Vec::new(),
            outboxes: [None, None],
        }
    }

    fn is_turn_of(&self, role: Role) -> bool {
        self.seated == SEATS && self.to_move == role
    }

    /// Queues a message for `role`. A participant that already left is
    /// skipped.
    fn push(&self, role: Role, message: ServerMessage) {
        match &self.outboxes[role.index()] {
            Some(outbox) => {
                if outbox.send(message).is_err() {
                    debug!(%role, "Writer for participant is gone, dropping message");
                }
            }
            None => debug!(%role, "Participant left, dropping message"),
        }
    }

    /// Applies a move for the role holding the turn.
    fn apply(&mut self, role: Role, position: Position) -> MoveVerdict {
        let mark = role.mark();
        if let Err(err) = self.board.place(position, mark) {
            debug!(%role, %err, "Rejected move");
            return MoveVerdict::Occupied;
        }

        self.history.push(Move::new(mark, position));
        self.to_move = role.opponent();
        self.push(role.opponent(), ServerMessage::OpponentMoved(position));
        self.outcome = self.board.outcome();

        info!(
            %role,
            position = position.to_index(),
            board = %self.board.display(),
            "Move applied"
        );
        if self.outcome.is_terminal() {
            info!(outcome = ?self.outcome, moves = self.history.len(), "Game over");
        }

        MoveVerdict::Valid
    }
}

/// Coordinator owning the board, the turn cursor and the wait conditions.
///
/// Shared by `Arc` between the listener and both participant channels.
#[derive(Debug)]
pub struct Session {
    state: Mutex<SessionState>,
    opponent_joined: Notify,
    turn_changed: Notify,
}

impl Session {
    /// Creates an empty session: empty board, no seats taken, X to move.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating session");
        Self {
            state: Mutex::new(SessionState::new()),
            opponent_joined: Notify::new(),
            turn_changed: Notify::new(),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        // Every critical section leaves the state consistent before anything
        // that could panic, so a poisoned lock still guards valid data.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Assigns the next free seat without waiting.
    ///
    /// Called once per accepted connection, in accept order: the first call
    /// gets [`Role::First`], the second [`Role::Second`]. `outbox` receives
    /// the notifications the coordinator pushes to this participant.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Full`] once both seats are taken.
    #[instrument(skip(self, outbox))]
    pub fn seat(&self, outbox: Outbox) -> Result<Role, SessionError> {
        let mut state = self.state();
        let Some(&role) = Role::ALL.get(state.seated) else {
            warn!("Session already has 2 participants");
            return Err(SessionError::Full);
        };

        state.outboxes[role.index()] = Some(outbox);
        state.seated += 1;
        state.connected += 1;
        let full = state.seated == SEATS;
        drop(state);

        info!(%role, mark = %role.mark(), "Participant seated");
        if full {
            self.opponent_joined.notify_waiters();
            self.turn_changed.notify_waiters();
        }
        Ok(role)
    }

    /// Join-wait: returns once both seats are taken.
    #[instrument(skip(self))]
    pub async fn await_opponent(&self) {
        loop {
            let notified = self.opponent_joined.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.seated() == SEATS {
                return;
            }
            debug!("Waiting for the second participant");
            notified.await;
        }
    }

    /// Takes a seat and, for the first participant, waits for the second.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Full`] once both seats are taken.
    pub async fn join(&self, outbox: Outbox) -> Result<Role, SessionError> {
        let role = self.seat(outbox)?;
        self.await_opponent().await;
        Ok(role)
    }

    /// Submits a move, waiting for `role`'s turn if necessary.
    ///
    /// Waits until both seats are taken and `role` is the role-to-move, or
    /// until the game is over. Never returns [`MoveVerdict::NotYourTurn`].
    #[instrument(skip(self, position), fields(position = position.to_index()))]
    pub async fn submit_move(&self, role: Role, position: Position) -> MoveVerdict {
        loop {
            let notified = self.turn_changed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(verdict) = self.attempt(role, position) {
                debug!(%verdict, "Move submitted");
                return verdict;
            }
            debug!("Waiting for turn");
            notified.await;
        }
    }

    /// Submits a move without waiting.
    ///
    /// Returns [`MoveVerdict::NotYourTurn`] when the turn belongs to the
    /// opponent or the second seat is still empty.
    #[instrument(skip(self, position), fields(position = position.to_index()))]
    pub fn try_submit_move(&self, role: Role, position: Position) -> MoveVerdict {
        self.attempt(role, position)
            .unwrap_or(MoveVerdict::NotYourTurn)
    }

    /// One locked attempt; `None` means the caller must wait for its turn.
    fn attempt(&self, role: Role, position: Position) -> Option<MoveVerdict> {
        let mut state = self.state();
        if state.outcome.is_terminal() {
            return Some(MoveVerdict::GameOver);
        }
        if !state.is_turn_of(role) {
            return None;
        }

        let verdict = state.apply(role, position);
        drop(state);

        if verdict == MoveVerdict::Valid {
            self.turn_changed.notify_waiters();
        }
        Some(verdict)
    }

    /// Returns once the game has been won or tied.
    pub async fn wait_for_end(&self) -> Outcome {
        loop {
            let notified = self.turn_changed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let outcome = self.outcome();
            if outcome.is_terminal() {
                return outcome;
            }
            notified.await;
        }
    }

    /// Marks `role`'s channel as gone and drops its outbound queue.
    ///
    /// Leaving never changes the board or the outcome. Leaving an unfinished
    /// game is reported, since the opponent has no way to finish it.
    #[instrument(skip(self))]
    pub fn leave(&self, role: Role) {
        let mut state = self.state();
        if state.outboxes[role.index()].take().is_none() {
            debug!("Participant already left");
            return;
        }
        state.connected = state.connected.saturating_sub(1);

        if state.outcome.is_terminal() {
            info!(connected = state.connected, "Participant finished");
        } else {
            warn!(
                moves = state.history.len(),
                connected = state.connected,
                "Participant left before the game ended"
            );
        }
    }

    /// Snapshot of the current outcome.
    pub fn outcome(&self) -> Outcome {
        self.state().outcome
    }

    /// Role whose turn it is.
    pub fn to_move(&self) -> Role {
        self.state().to_move
    }

    /// Copy of the board.
    pub fn board(&self) -> Board {
        self.state().board.clone()
    }

    /// Moves applied so far, in order.
    pub fn history(&self) -> Vec<Move> {
        self.state().history.clone()
    }

    /// Number of seats taken.
    pub fn seated(&self) -> usize {
        self.state().seated
    }

    /// Number of seated participants whose channel is still running.
    pub fn connected(&self) -> usize {
        self.state().connected
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
