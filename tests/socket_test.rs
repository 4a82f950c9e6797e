//! Heartbeat and reconnect behaviour of a single socket, on a paused clock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use linda::adapters::mock::{ConnectOutcome, MockConnector};
use linda::traits::WsError;
use linda::websocket::{ConnectionState, HeartbeatSocket, SocketConfig, SocketHandlers};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::Message;

fn config() -> SocketConfig {
    SocketConfig::new("ws://chat.test/ws?token=t")
}

fn socket(connector: &Arc<MockConnector>, config: SocketConfig) -> HeartbeatSocket {
    HeartbeatSocket::new(config, connector.clone())
}

async fn wait_for_state(socket: &HeartbeatSocket, state: ConnectionState) {
    let mut rx = socket.state_receiver();
    rx.wait_for(|s| *s == state).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_refused_connection_retries_three_times_then_gives_up() {
    let connector = Arc::new(MockConnector::refusing());
    let exhausted = Arc::new(Mutex::new(Vec::new()));
    let errors = Arc::new(Mutex::new(0));

    let socket = socket(&connector, config());
    let (e, x) = (errors.clone(), exhausted.clone());
    socket.set_handlers(
        SocketHandlers::new()
            .on_error(move |_| *e.lock().unwrap() += 1)
            .on_reconnect_exhausted(move |n| x.lock().unwrap().push(n)),
    );

    socket.connect();
    tokio::time::sleep(Duration::from_secs(120)).await;

    let attempts = connector.attempts();
    assert_eq!(attempts.len(), 4, "initial attempt plus three reconnects");
    for pair in attempts.windows(2) {
        assert_eq!(pair[1].at - pair[0].at, Duration::from_millis(3000));
    }
    assert_eq!(*errors.lock().unwrap(), 4);
    assert_eq!(*exhausted.lock().unwrap(), vec![3]);
    assert_eq!(socket.state(), ConnectionState::Closed);
    assert_eq!(socket.reconnect_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_reconnect_disabled_with_zero_attempts() {
    let connector = Arc::new(MockConnector::refusing());
    let mut config = config();
    config.reconnect_attempts = 0;
    let exhausted = Arc::new(Mutex::new(Vec::new()));

    let socket = socket(&connector, config);
    let x = exhausted.clone();
    socket.set_handlers(
        SocketHandlers::new().on_reconnect_exhausted(move |n| x.lock().unwrap().push(n)),
    );
    socket.connect();
    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_eq!(connector.attempt_count(), 1);
    assert!(exhausted.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_heartbeat_fires_on_interval() {
    let connector = Arc::new(MockConnector::new());
    let socket = socket(&connector, config());
    socket.connect();

    let mut peer = connector.next_peer().await.unwrap();
    wait_for_state(&socket, ConnectionState::Open).await;
    let opened_at = Instant::now();

    assert_eq!(peer.recv_text().await.as_deref(), Some("ping"));
    assert_eq!(opened_at.elapsed(), Duration::from_secs(30));

    assert_eq!(peer.recv_text().await.as_deref(), Some("ping"));
    assert_eq!(opened_at.elapsed(), Duration::from_secs(60));
}

#[tokio::test(start_paused = true)]
async fn test_heartbeat_disabled_by_zero_interval() {
    let connector = Arc::new(MockConnector::new());
    let mut config = config();
    config.heartbeat_interval = Duration::ZERO;
    let socket = socket(&connector, config);
    socket.connect();

    let mut peer = connector.next_peer().await.unwrap();
    wait_for_state(&socket, ConnectionState::Open).await;
    tokio::time::sleep(Duration::from_secs(300)).await;

    assert!(peer.drain().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_heartbeat_ack_is_not_delivered() {
    let connector = Arc::new(MockConnector::new());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let socket = socket(&connector, config());
    socket.set_handlers(SocketHandlers::new().on_message(move |m| {
        let _ = tx.send(m.text().to_string());
    }));
    socket.connect();

    let peer = connector.next_peer().await.unwrap();
    peer.send_text("pong");
    peer.send_text("hello");
    peer.send_text("pong ");

    assert_eq!(rx.recv().await.as_deref(), Some("hello"));
    assert_eq!(rx.recv().await.as_deref(), Some("pong "));
}

#[tokio::test(start_paused = true)]
async fn test_server_close_reconnects_and_resets_counter() {
    let connector = Arc::new(MockConnector::new());
    let closes = Arc::new(Mutex::new(0));
    let socket = socket(&connector, config());
    let c = closes.clone();
    socket.set_handlers(SocketHandlers::new().on_close(move || *c.lock().unwrap() += 1));
    socket.connect();

    let first = connector.next_peer().await.unwrap();
    wait_for_state(&socket, ConnectionState::Open).await;
    first.close();

    let _second = connector.next_peer().await.unwrap();
    wait_for_state(&socket, ConnectionState::Open).await;

    let attempts = connector.attempts();
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[1].at - attempts[0].at, Duration::from_millis(3000));
    assert_eq!(*closes.lock().unwrap(), 1);
    assert_eq!(socket.reconnect_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_counter_resets_after_partial_failures() {
    let connector = Arc::new(MockConnector::new());
    connector.push_outcome(ConnectOutcome::Accept);
    connector.push_outcome(ConnectOutcome::Refuse("down".to_string()));
    connector.push_outcome(ConnectOutcome::Refuse("down".to_string()));

    let socket = socket(&connector, config());
    socket.connect();

    let first = connector.next_peer().await.unwrap();
    wait_for_state(&socket, ConnectionState::Open).await;
    drop(first);

    // two refusals, then the third reconnect is accepted
    let _peer = connector.next_peer().await.unwrap();
    wait_for_state(&socket, ConnectionState::Open).await;
    assert_eq!(connector.attempt_count(), 4);
    assert_eq!(socket.reconnect_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_stream_error_reports_then_reconnects() {
    let connector = Arc::new(MockConnector::new());
    let errors = Arc::new(Mutex::new(Vec::new()));
    let socket = socket(&connector, config());
    let e = errors.clone();
    socket.set_handlers(
        SocketHandlers::new().on_error(move |err| e.lock().unwrap().push(err.clone())),
    );
    socket.connect();

    let first = connector.next_peer().await.unwrap();
    wait_for_state(&socket, ConnectionState::Open).await;
    first.send_error(WsError::Protocol("reset".to_string()));

    let _second = connector.next_peer().await.unwrap();
    assert_eq!(
        *errors.lock().unwrap(),
        vec![WsError::Protocol("reset".to_string())]
    );
}

#[tokio::test(start_paused = true)]
async fn test_manual_disconnect_is_silent_and_final() {
    let connector = Arc::new(MockConnector::new());
    let closes = Arc::new(Mutex::new(0));
    let socket = socket(&connector, config());
    let c = closes.clone();
    socket.set_handlers(SocketHandlers::new().on_close(move || *c.lock().unwrap() += 1));
    socket.connect();

    let mut peer = connector.next_peer().await.unwrap();
    wait_for_state(&socket, ConnectionState::Open).await;

    socket.disconnect();
    assert_eq!(socket.state(), ConnectionState::Closed);
    assert_eq!(peer.recv().await, None);

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(connector.attempt_count(), 1);
    assert_eq!(*closes.lock().unwrap(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_disconnect_cancels_pending_reconnect() {
    let connector = Arc::new(MockConnector::refusing());
    let socket = socket(&connector, config());
    socket.connect();

    // let the first attempt fail and a reconnect get scheduled
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(connector.attempt_count(), 1);

    socket.disconnect();
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(connector.attempt_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_send_only_while_open() {
    let connector = Arc::new(MockConnector::new());
    let socket = socket(&connector, config());

    socket.send("too early");
    socket.connect();

    let mut peer = connector.next_peer().await.unwrap();
    wait_for_state(&socket, ConnectionState::Open).await;
    socket.send("hi");

    assert_eq!(peer.recv().await, Some(Message::Text("hi".to_string())));
}

#[tokio::test(start_paused = true)]
async fn test_connect_while_open_is_ignored() {
    let connector = Arc::new(MockConnector::new());
    let socket = socket(&connector, config());
    socket.connect();

    let _peer = connector.next_peer().await.unwrap();
    wait_for_state(&socket, ConnectionState::Open).await;
    socket.connect();
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(connector.attempt_count(), 1);
    assert_eq!(socket.state(), ConnectionState::Open);
}

#[tokio::test(start_paused = true)]
async fn test_close_frame_ends_connection() {
    let connector = Arc::new(MockConnector::new());
    let mut config = config();
    config.reconnect_attempts = 0;
    let socket = socket(&connector, config);
    socket.connect();

    let peer = connector.next_peer().await.unwrap();
    wait_for_state(&socket, ConnectionState::Open).await;

    peer.close();
    wait_for_state(&socket, ConnectionState::Closed).await;
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(connector.attempt_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_close_frame_stops_heartbeat_before_hang_up() {
    let connector = Arc::new(MockConnector::new());
    let socket = socket(&connector, config());
    socket.connect();

    let mut peer = connector.next_peer().await.unwrap();
    wait_for_state(&socket, ConnectionState::Open).await;

    tokio::time::sleep(Duration::from_secs(10)).await;
    peer.send_close();
    wait_for_state(&socket, ConnectionState::Closing).await;

    tokio::time::sleep(Duration::from_secs(90)).await;
    let pings = peer
        .drain()
        .into_iter()
        .filter(|m| matches!(m, Message::Text(t) if t == "ping"))
        .count();
    assert_eq!(pings, 0);
    assert_eq!(socket.state(), ConnectionState::Closing);
    assert_eq!(connector.attempt_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_handlers_may_disconnect_from_on_close() {
    let connector = Arc::new(MockConnector::new());
    let socket = socket(&connector, config());
    let handle = socket.clone();
    socket.set_handlers(SocketHandlers::new().on_close(move || handle.disconnect()));
    socket.connect();

    let peer = connector.next_peer().await.unwrap();
    wait_for_state(&socket, ConnectionState::Open).await;
    drop(peer);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(connector.attempt_count(), 1);
}
