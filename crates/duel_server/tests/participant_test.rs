//! Participant channel tests over in-memory streams.

use duel_server::{ChannelError, Participant, Role, Session};
use duel_tictactoe::{Mark, Outcome, Position};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{
    AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines, ReadHalf, WriteHalf,
};
use tokio::task::JoinHandle;
use tokio::time::timeout;

const PATIENCE: Duration = Duration::from_secs(5);

const FIRST_GREETING: &[&str] = &[
    "X",
    "Player X connected",
    "Waiting for another player",
    "Other player connected. Your move.",
];

struct Client {
    lines: Lines<BufReader<ReadHalf<DuplexStream>>>,
    writer: WriteHalf<DuplexStream>,
}

impl Client {
    fn new(stream: DuplexStream) -> Self {
        let (reader, writer) = tokio::io::split(stream);
        Self {
            lines: BufReader::new(reader).lines(),
            writer,
        }
    }

    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{line}\n").as_bytes())
            .await
            .unwrap();
    }

    async fn next(&mut self) -> Option<String> {
        timeout(PATIENCE, self.lines.next_line())
            .await
            .expect("timed out waiting for a line")
            .unwrap()
    }

    async fn expect(&mut self, expected: &[&str]) {
        for line in expected {
            assert_eq!(self.next().await.as_deref(), Some(*line));
        }
    }
}

type Channel = JoinHandle<Result<Outcome, ChannelError>>;

fn start() -> (Arc<Session>, Client, Channel, Client, Channel) {
    let session = Arc::new(Session::new());
    let (first_server, first_client) = tokio::io::duplex(1024);
    let (second_server, second_client) = tokio::io::duplex(1024);

    let first = Participant::seat(Arc::clone(&session), first_server).unwrap();
    let second = Participant::seat(Arc::clone(&session), second_server).unwrap();
    assert_eq!(first.role(), Role::First);
    assert_eq!(second.role(), Role::Second);

    (
        session,
        Client::new(first_client),
        tokio::spawn(first.run()),
        Client::new(second_client),
        tokio::spawn(second.run()),
    )
}

#[tokio::test]
async fn test_full_game_over_duplex() {
    let (session, mut x, x_channel, mut o, o_channel) = start();

    x.expect(FIRST_GREETING).await;
    o.expect(&["O", "Player O connected, please wait"]).await;

    x.send("0").await;
    x.expect(&["Valid move."]).await;
    o.expect(&["Opponent moved", "0"]).await;

    o.send("3").await;
    o.expect(&["Valid move."]).await;
    x.expect(&["Opponent moved", "3"]).await;

    x.send("1").await;
    x.expect(&["Valid move."]).await;
    o.expect(&["Opponent moved", "1"]).await;

    o.send("4").await;
    o.expect(&["Valid move."]).await;
    x.expect(&["Opponent moved", "4"]).await;

    x.send("2").await;
    x.expect(&["Valid move.", "Game over: X wins"]).await;
    o.expect(&["Opponent moved", "2", "Game over: X wins"]).await;

    assert_eq!(x.next().await, None);
    assert_eq!(o.next().await, None);

    let won = Outcome::Win(Mark::X);
    assert_eq!(timeout(PATIENCE, x_channel).await.unwrap().unwrap().unwrap(), won);
    assert_eq!(timeout(PATIENCE, o_channel).await.unwrap().unwrap().unwrap(), won);
    assert_eq!(session.history().len(), 5);
    assert_eq!(session.connected(), 0);
}

#[tokio::test]
async fn test_bad_lines_are_rejected_and_retried() {
    let (session, mut x, _x_channel, mut o, _o_channel) = start();
    x.expect(FIRST_GREETING).await;
    o.expect(&["O", "Player O connected, please wait"]).await;

    x.send("middle").await;
    x.expect(&["Invalid move, try again"]).await;
    x.send("9").await;
    x.expect(&["Invalid move, try again"]).await;
    assert_eq!(session.history().len(), 0);

    x.send(" 4 ").await;
    x.expect(&["Valid move."]).await;
    o.expect(&["Opponent moved", "4"]).await;

    o.send("4").await;
    o.expect(&["Invalid move, try again"]).await;
    assert_eq!(session.to_move(), Role::Second);
}

#[tokio::test]
async fn test_early_move_waits_for_turn() {
    let (session, mut x, _x_channel, mut o, _o_channel) = start();
    x.expect(FIRST_GREETING).await;
    o.expect(&["O", "Player O connected, please wait"]).await;

    o.send("8").await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!session.board().is_occupied(Position::BottomRight));

    x.send("0").await;
    x.expect(&["Valid move."]).await;
    o.expect(&["Opponent moved", "0", "Valid move."]).await;
    x.expect(&["Opponent moved", "8"]).await;
    assert_eq!(session.to_move(), Role::First);
}

#[tokio::test]
async fn test_disconnect_ends_only_that_channel() {
    let (session, mut x, x_channel, mut o, o_channel) = start();
    x.expect(FIRST_GREETING).await;
    o.expect(&["O", "Player O connected, please wait"]).await;

    x.send("4").await;
    x.expect(&["Valid move."]).await;
    o.expect(&["Opponent moved", "4"]).await;
    drop(x);

    let fault = timeout(PATIENCE, x_channel)
        .await
        .unwrap()
        .unwrap()
        .unwrap_err();
    assert!(matches!(fault, ChannelError::Disconnected { role: Role::First }));
    assert_eq!(fault.role(), Role::First);

    assert_eq!(session.connected(), 1);
    assert_eq!(session.outcome(), Outcome::Ongoing);
    assert!(session.board().is_occupied(Position::Center));
    assert!(!o_channel.is_finished());
    o_channel.abort();
}
