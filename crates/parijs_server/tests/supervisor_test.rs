//! End-to-end matches over in-memory pipes speaking the line protocol.

use parijs_game::{Color, MoveResponse, Phase};
use parijs_server::{
    BotBrain, ClientMessage, Connection, GatewayError, MatchSupervisor, ServerConfig,
    ServerMessage,
};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines, ReadHalf, WriteHalf};

type ClientLines = Lines<BufReader<ReadHalf<DuplexStream>>>;

/// Creates a server-side connection and the client end of its pipe.
fn connect(name: &str, timeout: Option<Duration>) -> (Connection, ClientLines, WriteHalf<DuplexStream>) {
    let (server, client) = tokio::io::duplex(64 * 1024);
    let (server_read, server_write) = tokio::io::split(server);
    let (client_read, client_write) = tokio::io::split(client);
    let connection = Connection::new(name, server_read, server_write, timeout);
    (connection, BufReader::new(client_read).lines(), client_write)
}

async fn next_message(lines: &mut ClientLines) -> Option<ServerMessage> {
    let line = lines.next_line().await.expect("readable pipe")?;
    Some(serde_json::from_str(&line).expect("server sends valid JSON"))
}

async fn send(writer: &mut WriteHalf<DuplexStream>, message: &ClientMessage) {
    let mut line = serde_json::to_string(message).expect("serializable");
    line.push('\n');
    writer.write_all(line.as_bytes()).await.expect("writable pipe");
}

/// Plays like the bot client and returns every message received.
async fn play_client(mut lines: ClientLines, mut writer: WriteHalf<DuplexStream>) -> Vec<ServerMessage> {
    let mut brain = BotBrain::default();
    let mut seen = Vec::new();
    while let Some(message) = next_message(&mut lines).await {
        match &message {
            ServerMessage::AskMove {
                request_id,
                available_buildings,
                block,
            } => {
                let mv = brain.choose(available_buildings, block.as_ref());
                send(&mut writer, &ClientMessage::Move {
                    request_id: *request_id,
                    mv: mv.into(),
                })
                .await;
            }
            ServerMessage::MoveResponse { response, .. } => brain.observe_response(response),
            ServerMessage::OpponentMoved { update } => brain.observe_opponent(update.mv()),
            _ => {}
        }
        let done = matches!(
            message,
            ServerMessage::PhaseStarted {
                phase: Phase::Building { .. }
            } | ServerMessage::MatchAborted { .. }
        );
        seen.push(message);
        if done {
            break;
        }
    }
    seen
}

/// Reads until the next ask and returns its request id.
async fn next_ask(lines: &mut ClientLines) -> u64 {
    loop {
        match next_message(lines).await {
            Some(ServerMessage::AskMove { request_id, .. }) => return request_id,
            Some(_) => continue,
            None => panic!("server closed the pipe before asking"),
        }
    }
}

fn seeded_supervisor() -> MatchSupervisor {
    MatchSupervisor::new(&ServerConfig::default().with_seed(Some(21)))
}

#[tokio::test]
async fn test_full_match_over_pipes() {
    let (blue, blue_lines, blue_writer) = connect("alice", None);
    let (orange, orange_lines, orange_writer) = connect("bob", None);

    let handle = seeded_supervisor().start(blue, orange);
    let blue_client = tokio::spawn(play_client(blue_lines, blue_writer));
    let orange_client = tokio::spawn(play_client(orange_lines, orange_writer));

    let outcome = handle.await.expect("match task").expect("setup completes");
    assert_eq!(*outcome.accepted_moves(), 16);
    assert_eq!(*outcome.denied_moves(), 0);
    let placer = outcome.last_block_placer().expect("blocks were placed");
    assert_eq!(*outcome.building_first_player(), placer.opponent());

    let blue_seen = blue_client.await.expect("blue client");
    let orange_seen = orange_client.await.expect("orange client");

    assert_eq!(
        blue_seen.first(),
        Some(&ServerMessage::MatchStarted {
            color: Color::Blue,
            opponent: "bob".to_string()
        })
    );
    assert_eq!(
        orange_seen.first(),
        Some(&ServerMessage::MatchStarted {
            color: Color::Orange,
            opponent: "alice".to_string()
        })
    );

    let building = ServerMessage::PhaseStarted {
        phase: Phase::Building {
            first_player: placer.opponent(),
        },
    };
    assert_eq!(blue_seen.last(), Some(&building));
    assert_eq!(orange_seen.last(), Some(&building));

    let asks = |seen: &[ServerMessage]| {
        seen.iter()
            .filter(|message| matches!(message, ServerMessage::AskMove { .. }))
            .count()
    };
    assert_eq!(asks(&blue_seen), 8);
    assert_eq!(asks(&orange_seen), 8);
}

#[tokio::test]
async fn test_disconnect_aborts_match_with_forfeit() {
    let (blue, mut blue_lines, blue_writer) = connect("alice", None);
    let (orange, mut orange_lines, orange_writer) = connect("bob", None);

    let handle = seeded_supervisor().start(blue, orange);

    assert!(matches!(
        next_message(&mut blue_lines).await,
        Some(ServerMessage::MatchStarted { .. })
    ));
    drop(blue_lines);
    drop(blue_writer);

    let error = handle.await.expect("match task").expect_err("match aborts");
    assert_eq!(error.color, Color::Blue);
    assert!(error.source.is_disconnect());

    let mut abort_reason = None;
    while let Some(message) = next_message(&mut orange_lines).await {
        if let ServerMessage::MatchAborted { reason } = message {
            abort_reason = Some(reason);
            break;
        }
    }
    let reason = abort_reason.expect("survivor is told about the abort");
    assert!(reason.contains("forfeits"), "unexpected reason: {reason}");
    drop(orange_writer);
}

#[tokio::test(start_paused = true)]
async fn test_silent_player_times_out() {
    let timeout = Some(Duration::from_secs(3));
    let (blue, blue_lines, blue_writer) = connect("alice", timeout);
    let (orange, orange_lines, orange_writer) = connect("bob", timeout);

    // Nobody answers; the first ask times out.
    let handle = seeded_supervisor().start(blue, orange);
    let error = handle.await.expect("match task").expect_err("match aborts");
    assert!(matches!(error.source, GatewayError::Timeout { seconds: 3, .. }));
    drop((blue_lines, blue_writer, orange_lines, orange_writer));
}

#[tokio::test]
async fn test_garbage_line_is_protocol_desync() {
    let (blue, blue_lines, mut blue_writer) = connect("alice", None);
    let (orange, orange_lines, orange_writer) = connect("bob", None);

    let handle = seeded_supervisor().start(blue, orange);
    blue_writer
        .write_all(b"not json\n")
        .await
        .expect("writable pipe");

    let error = handle.await.expect("match task").expect_err("match aborts");
    assert_eq!(error.color, Color::Blue);
    assert!(matches!(error.source, GatewayError::ProtocolDesync { .. }));
    drop((blue_lines, orange_lines, orange_writer));
}

#[tokio::test]
async fn test_unknown_building_is_denied_and_reasked() {
    let (blue, mut blue_lines, mut blue_writer) = connect("alice", None);
    let (orange, mut orange_lines, mut orange_writer) = connect("bob", None);

    let handle = seeded_supervisor().start(blue, orange);

    let (first, request_id) = tokio::select! {
        id = next_ask(&mut blue_lines) => (Color::Blue, id),
        id = next_ask(&mut orange_lines) => (Color::Orange, id),
    };
    let (lines, writer) = match first {
        Color::Blue => (&mut blue_lines, &mut blue_writer),
        Color::Orange => (&mut orange_lines, &mut orange_writer),
    };

    let line = format!(
        "{{\"type\":\"move\",\"request_id\":{request_id},\"move\":{{\"kind\":\"pick_building\",\"name\":\"Eiffel\"}}}}\n"
    );
    writer.write_all(line.as_bytes()).await.expect("writable pipe");

    match next_message(lines).await {
        Some(ServerMessage::MoveResponse {
            request_id: answered,
            response: MoveResponse::Deny { reason },
        }) => {
            assert_eq!(answered, request_id);
            assert!(reason.contains("Eiffel"), "unexpected reason: {reason}");
        }
        other => panic!("expected a deny, got {other:?}"),
    }
    assert_eq!(next_ask(lines).await, request_id + 1);

    // The match is still running, waiting on the re-ask.
    assert!(!handle.is_finished());
    handle.abort();
}
