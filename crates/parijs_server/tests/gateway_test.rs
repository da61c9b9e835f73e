//! Tests for ask/reply correlation in the player gateway.

use parijs_game::Position;
use parijs_server::{
    ClientMessage, Gateway, GatewayError, MoveRequest, Player, ProposedMove, ServerMessage,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

fn gateway(timeout: Option<Duration>) -> (Arc<Gateway>, mpsc::UnboundedReceiver<ServerMessage>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(Gateway::new("tester", tx, timeout)), rx)
}

fn empty_request() -> MoveRequest {
    MoveRequest::new(Vec::new(), None)
}

async fn next_request_id(rx: &mut mpsc::UnboundedReceiver<ServerMessage>) -> u64 {
    match rx.recv().await {
        Some(ServerMessage::AskMove { request_id, .. }) => request_id,
        other => panic!("expected ask_move, got {other:?}"),
    }
}

#[tokio::test]
async fn test_reply_with_matching_id_completes_ask() {
    let (gateway, mut rx) = gateway(None);
    let asker = tokio::spawn({
        let gateway = Arc::clone(&gateway);
        async move { gateway.ask_move(empty_request()).await }
    });

    let request_id = next_request_id(&mut rx).await;
    assert_eq!(request_id, 1);
    assert!(gateway.is_awaiting());

    let mv = ProposedMove::PlaceBlockAt {
        position: Position::new(2, 2),
    };
    gateway
        .deliver(ClientMessage::Move {
            request_id,
            mv: mv.clone(),
        })
        .expect("reply matches");

    assert_eq!(asker.await.expect("task"), Ok(mv));
    assert!(!gateway.is_awaiting());
}

#[tokio::test]
async fn test_request_ids_increase() {
    let (gateway, mut rx) = gateway(None);
    for expected in 1..=3 {
        let asker = tokio::spawn({
            let gateway = Arc::clone(&gateway);
            async move { gateway.ask_move(empty_request()).await }
        });
        let request_id = next_request_id(&mut rx).await;
        assert_eq!(request_id, expected);
        gateway
            .deliver(ClientMessage::Move {
                request_id,
                mv: ProposedMove::Pass,
            })
            .expect("reply matches");
        assert_eq!(asker.await.expect("task"), Ok(ProposedMove::Pass));
    }
}

#[tokio::test]
async fn test_second_concurrent_ask_is_rejected() {
    let (gateway, mut rx) = gateway(None);
    let first = tokio::spawn({
        let gateway = Arc::clone(&gateway);
        async move { gateway.ask_move(empty_request()).await }
    });
    let request_id = next_request_id(&mut rx).await;

    let second = gateway.ask_move(empty_request()).await;
    assert!(matches!(second, Err(GatewayError::ProtocolDesync { .. })));

    gateway
        .deliver(ClientMessage::Move {
            request_id,
            mv: ProposedMove::Pass,
        })
        .expect("first ask still pending");
    assert_eq!(first.await.expect("task"), Ok(ProposedMove::Pass));
}

#[tokio::test]
async fn test_mismatched_reply_is_desync() {
    let (gateway, mut rx) = gateway(None);
    let asker = tokio::spawn({
        let gateway = Arc::clone(&gateway);
        async move { gateway.ask_move(empty_request()).await }
    });
    let request_id = next_request_id(&mut rx).await;

    let delivered = gateway.deliver(ClientMessage::Move {
        request_id: request_id + 7,
        mv: ProposedMove::Pass,
    });
    assert!(matches!(delivered, Err(GatewayError::ProtocolDesync { .. })));
    assert!(matches!(
        asker.await.expect("task"),
        Err(GatewayError::ProtocolDesync { .. })
    ));

    // The gateway stays failed.
    assert!(matches!(
        gateway.ask_move(empty_request()).await,
        Err(GatewayError::ProtocolDesync { .. })
    ));
}

#[tokio::test]
async fn test_close_while_awaiting_is_transport_closed() {
    let (gateway, mut rx) = gateway(None);
    let asker = tokio::spawn({
        let gateway = Arc::clone(&gateway);
        async move { gateway.ask_move(empty_request()).await }
    });
    next_request_id(&mut rx).await;

    gateway.close();
    assert_eq!(
        asker.await.expect("task"),
        Err(GatewayError::TransportClosed {
            player: "tester".to_string()
        })
    );
    assert!(!gateway.is_awaiting());
}

#[tokio::test(start_paused = true)]
async fn test_unanswered_ask_times_out_and_clears_slot() {
    let (gateway, mut rx) = gateway(Some(Duration::from_secs(5)));
    let result = gateway.ask_move(empty_request()).await;
    assert_eq!(
        result,
        Err(GatewayError::Timeout {
            player: "tester".to_string(),
            request_id: 1,
            seconds: 5,
        })
    );
    assert!(!gateway.is_awaiting());
    assert_eq!(next_request_id(&mut rx).await, 1);

    // A late reply now has no pending ask.
    let late = gateway.deliver(ClientMessage::Move {
        request_id: 1,
        mv: ProposedMove::Pass,
    });
    assert!(matches!(late, Err(GatewayError::ProtocolDesync { .. })));
}
