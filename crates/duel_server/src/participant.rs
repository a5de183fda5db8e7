//! Per-connection participant channel.

use crate::error::{ChannelError, SessionError};
use crate::protocol::{self, ServerMessage};
use crate::role::Role;
use crate::session::{MoveVerdict, Outbox, Session};
use duel_tictactoe::Outcome;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// One seated participant and its byte stream.
///
/// [`Participant::run`] drives the participant's side of the game on the
/// caller's task. Outbound lines go through a queue drained by a dedicated
/// writer task; the coordinator pushes opponent moves into the same queue.
pub struct Participant<S> {
    role: Role,
    session: Arc<Session>,
    stream: S,
    outbox: Outbox,
    inbox: mpsc::UnboundedReceiver<ServerMessage>,
}

impl<S> Participant<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    /// Takes the next free seat in `session` for `stream`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Full`] once both seats are taken.
    #[instrument(skip(session, stream))]
    pub fn seat(session: Arc<Session>, stream: S) -> Result<Self, SessionError> {
        let (outbox, inbox) = mpsc::unbounded_channel();
        let role = session.seat(outbox.clone())?;
        Ok(Self {
            role,
            session,
            stream,
            outbox,
            inbox,
        })
    }

    /// Role assigned at seating.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Plays until the game ends or the stream fails.
    ///
    /// Always leaves the session and flushes every queued line before
    /// returning. The stream is shut down afterwards.
    ///
    /// # Errors
    ///
    /// [`ChannelError::Disconnected`] if the remote side closes mid-game,
    /// [`ChannelError::Io`] on read or write failures.
    #[instrument(skip(self), fields(role = %self.role))]
    pub async fn run(self) -> Result<Outcome, ChannelError> {
        let Self {
            role,
            session,
            stream,
            outbox,
            inbox,
        } = self;

        let (reader, writer) = tokio::io::split(stream);
        let writer = tokio::spawn(write_messages(writer, inbox));

        let result = play(role, &session, reader, &outbox).await;

        // The writer stops once both senders are gone: ours and the session's.
        session.leave(role);
        drop(outbox);
        let flushed = match writer.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(ChannelError::Io { role, source }),
            Err(source) => Err(ChannelError::Writer { role, source }),
        };

        match (result, flushed) {
            (Ok(outcome), Ok(())) => {
                info!(?outcome, "Participant channel finished");
                Ok(outcome)
            }
            (Ok(_), Err(err)) => Err(err),
            (Err(err), flushed) => {
                if let Err(write_err) = flushed {
                    debug!(%write_err, "Writer also failed");
                }
                Err(err)
            }
        }
    }
}

async fn play<R>(
    role: Role,
    session: &Session,
    reader: R,
    outbox: &Outbox,
) -> Result<Outcome, ChannelError>
where
    R: AsyncRead + Unpin,
{
    let send = |message: ServerMessage| {
        outbox
            .send(message)
            .map_err(|_| ChannelError::OutboxClosed { role })
    };

    send(ServerMessage::Mark(role.mark()))?;
    match role {
        Role::First => {
            send(ServerMessage::FirstConnected)?;
            send(ServerMessage::Waiting)?;
            session.await_opponent().await;
            send(ServerMessage::OpponentArrived)?;
        }
        Role::Second => send(ServerMessage::PleaseWait)?,
    }

    let mut lines = BufReader::new(reader).lines();
    loop {
        let outcome = session.outcome();
        if outcome.is_terminal() {
            send(ServerMessage::GameOver(outcome))?;
            return Ok(outcome);
        }

        let line = tokio::select! {
            line = lines.next_line() => {
                line.map_err(|source| ChannelError::Io { role, source })?
            }
            _ = session.wait_for_end() => continue,
        };
        let Some(line) = line else {
            warn!("Connection closed mid-game");
            return Err(ChannelError::Disconnected { role });
        };

        let reply = match protocol::parse_move(&line) {
            Ok(position) => match session.submit_move(role, position).await {
                MoveVerdict::Valid => ServerMessage::ValidMove,
                MoveVerdict::Occupied | MoveVerdict::NotYourTurn => ServerMessage::InvalidMove,
                MoveVerdict::GameOver => continue,
            },
            Err(err) => {
                warn!(%err, "Rejected move");
                ServerMessage::InvalidMove
            }
        };
        send(reply)?;
    }
}

async fn write_messages<W>(
    mut writer: W,
    mut inbox: mpsc::UnboundedReceiver<ServerMessage>,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(message) = inbox.recv().await {
        writer.write_all(format!("{message}\n").as_bytes()).await?;
        writer.flush().await?;
    }
    writer.shutdown().await
}
