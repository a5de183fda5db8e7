//! TCP listener that seats exactly two participants.

use crate::config::ServerConfig;
use crate::error::{ChannelError, ListenerError};
use crate::participant::Participant;
use crate::role::Role;
use crate::session::{SEATS, Session};
use duel_tictactoe::{Board, Move, Outcome};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinError;
use tracing::{debug, error, info, instrument};

/// Final state of a session once both participant channels have ended.
#[derive(Debug, derive_new::new)]
pub struct MatchReport {
    /// Outcome when the last channel ended.
    pub outcome: Outcome,
    /// Final board.
    pub board: Board,
    /// Moves applied, in order.
    pub history: Vec<Move>,
    /// Channel faults, one per failed participant.
    pub faults: Vec<ChannelError>,
}

/// Accepts two connections and runs one session between them.
#[derive(Debug)]
pub struct Listener {
    listener: TcpListener,
    session: Arc<Session>,
}

impl Listener {
    /// Binds the configured address.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::Bind`] if the address cannot be bound.
    #[instrument(skip(config), fields(addr = %config.address()))]
    pub async fn bind(config: &ServerConfig) -> Result<Self, ListenerError> {
        let addr = config.address();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ListenerError::Bind { addr, source })?;

        Ok(Self {
            listener,
            session: Arc::new(Session::new()),
        })
    }

    /// Address actually bound (useful with port 0).
    pub fn local_addr(&self) -> Result<SocketAddr, ListenerError> {
        self.listener.local_addr().map_err(ListenerError::LocalAddr)
    }

    /// Handle to the session, for observing it while [`Listener::run`] is
    /// in progress.
    pub fn session(&self) -> Arc<Session> {
        Arc::clone(&self.session)
    }

    /// Seats two connections in accept order, then plays the session out.
    ///
    /// Each participant runs on its own task. The listening socket is
    /// closed after the second accept, so later connections are refused.
    /// Returns once both channels have ended.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::Accept`] if accepting a connection fails.
    #[instrument(skip(self))]
    pub async fn run(self) -> Result<MatchReport, ListenerError> {
        let Self { listener, session } = self;

        let mut channels = Vec::with_capacity(SEATS);
        for _ in 0..SEATS {
            let (stream, peer) = listener.accept().await.map_err(ListenerError::Accept)?;
            let participant = Participant::seat(Arc::clone(&session), stream)?;
            let role = participant.role();
            info!(%role, %peer, "Participant connected");
            channels.push((role, tokio::spawn(participant.run())));
        }
        drop(listener);
        info!("Both seats taken, no longer accepting connections");

        let mut faults = Vec::new();
        for (role, channel) in channels {
            match settle(role, channel.await) {
                Ok(outcome) => debug!(%role, ?outcome, "Participant done"),
                Err(err) => {
                    error!(%role, %err, "Participant channel failed");
                    faults.push(err);
                }
            }
        }

        let report = MatchReport::new(
            session.outcome(),
            session.board(),
            session.history(),
            faults,
        );
        info!(outcome = ?report.outcome, moves = report.history.len(), "Session ended");
        Ok(report)
    }
}

/// Flattens a finished participant task into its channel result.
fn settle(
    role: Role,
    joined: Result<Result<Outcome, ChannelError>, JoinError>,
) -> Result<Outcome, ChannelError> {
    joined.unwrap_or_else(|source| Err(ChannelError::Task { role, source }))
}
