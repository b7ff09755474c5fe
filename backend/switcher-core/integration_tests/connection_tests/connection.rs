use crate::connection_tests::helpers::{
    StalledPeer, TestPeer, connected_pair, drain, expect_eof, read_utf16, start_manager,
    start_manager_with, wait_for_event, wait_for_phase,
};

use switcher_core::{ConnectionPhase, SwitcherConfig};
use switcher_core::constants::{DISCONNECTED_MESSAGE, PEER_CLOSED_MESSAGE, PORT_RANGE_MESSAGE};
use switcher_core::error::connection::ConnectionError;

use models::{ConnectionStatus, LightState, UiEvent};

/// **VALUE**: Verifies the identity handshake a peer sees right after connecting.
///
/// **WHY THIS MATTERS**: The peer identifies the device from the first two records. If
/// the order or the exact text changes, the peer never recognizes us.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - The device record is missing or sent after the lights record
/// - The encoding falls back to UTF-8
/// - The UI never leaves the "wait" indicator
#[tokio::test]
async fn given_listening_peer_when_connect_then_sends_device_then_lights() {
    // GIVEN
    let (manager, mut events) = start_manager(false);
    let peer = TestPeer::bind().await;

    // WHEN
    let port_text = peer.port_text();
    let (result, mut stream) =
        tokio::join!(manager.connect("127.0.0.1", &port_text), peer.accept());

    // THEN
    result.expect("Connect should succeed");
    let handshake = read_utf16(&mut stream, "Device: LightSwitcher;Lights: False;").await;
    assert_eq!(handshake, "Device: LightSwitcher;Lights: False;");

    assert_eq!(manager.phase(), ConnectionPhase::Connected);
    assert!(manager.is_connected().await);
    assert_eq!(
        manager.endpoint().await.map(|endpoint| endpoint.port()),
        Some(peer.port)
    );

    let events = drain(&mut events);
    let indicators: Vec<_> = events
        .iter()
        .filter(|event| matches!(event, UiEvent::Connection(_)))
        .cloned()
        .collect();
    assert_eq!(
        indicators,
        vec![
            UiEvent::Connection(ConnectionStatus::Wait),
            UiEvent::Connection(ConnectionStatus::Up),
        ]
    );
    assert!(events.contains(&UiEvent::Controls { connected: true }));
    assert!(events.contains(&UiEvent::Log("Network: Sent info".to_string())));
}

/// **VALUE**: Verifies an out-of-range port is rejected before any socket exists.
///
/// **WHY THIS MATTERS**: The user must see the range message and the UI must not flip to
/// the "wait" indicator for input that was never going to work.
#[tokio::test]
async fn given_port_out_of_range_when_connect_then_rejected_without_transport() {
    // GIVEN
    let (manager, mut events) = start_manager(false);
    drain(&mut events);

    // WHEN
    let result = manager.connect("127.0.0.1", "99999").await;

    // THEN
    assert!(matches!(result, Err(ConnectionError::InvalidPort { .. })));
    assert_eq!(manager.phase(), ConnectionPhase::Idle);
    assert_eq!(
        drain(&mut events),
        vec![UiEvent::Log(format!("Port: {PORT_RANGE_MESSAGE}"))]
    );
}

#[tokio::test]
async fn given_hostname_when_connect_then_rejected_as_invalid_address() {
    let (manager, _events) = start_manager(false);

    let result = manager.connect("light.local", "8080").await;

    assert!(matches!(result, Err(ConnectionError::InvalidAddress { .. })));
    assert_eq!(manager.phase(), ConnectionPhase::Idle);
}

/// **VALUE**: Verifies a second connect while connected is refused.
///
/// **BUG THIS CATCHES**: A second session overwriting the first and leaking its socket
/// and receive task.
#[tokio::test]
async fn given_connected_when_connect_again_then_rejected_and_session_kept() {
    // GIVEN
    let (manager, _events) = start_manager(false);
    let (peer, _stream) = connected_pair(&manager).await;

    // WHEN
    let result = manager.connect("127.0.0.1", &peer.port_text()).await;

    // THEN
    assert!(matches!(result, Err(ConnectionError::AlreadyActive { .. })));
    assert_eq!(manager.phase(), ConnectionPhase::Connected);
    assert!(manager.is_connected().await);
}

#[tokio::test]
async fn given_nothing_listening_when_connect_then_reports_error_and_returns_to_idle() {
    // GIVEN: a port that was free a moment ago
    let (manager, mut events) = start_manager(false);
    let port = {
        let peer = TestPeer::bind().await;
        peer.port
    };

    // WHEN
    let result = manager.connect("127.0.0.1", &port.to_string()).await;

    // THEN
    assert!(matches!(result, Err(ConnectionError::Connect { .. })));
    assert_eq!(manager.phase(), ConnectionPhase::Idle);
    let events = drain(&mut events);
    assert!(events.contains(&UiEvent::Connection(ConnectionStatus::Err)));
    assert!(events.contains(&UiEvent::Controls { connected: false }));
    assert!(events.contains(&UiEvent::Log(
        "Connection: Connection's unavailable.".to_string()
    )));
}

/// **VALUE**: Verifies the disconnect notice and the clean teardown.
///
/// **WHY THIS MATTERS**: The peer only drops the device from its list when it sees
/// `Method: DISCONNECT;`. Without it the peer keeps a ghost entry.
#[tokio::test]
async fn given_connected_when_disconnect_then_peer_receives_notice_and_eof() {
    // GIVEN
    let (manager, mut events) = start_manager(false);
    let (_peer, mut stream) = connected_pair(&manager).await;
    drain(&mut events);

    // WHEN
    manager.disconnect().await;

    // THEN
    assert_eq!(
        read_utf16(&mut stream, "Method: DISCONNECT;").await,
        "Method: DISCONNECT;"
    );
    expect_eof(&mut stream).await;

    assert_eq!(manager.phase(), ConnectionPhase::Idle);
    assert!(!manager.is_connected().await);
    let events = drain(&mut events);
    assert!(events.contains(&UiEvent::Connection(ConnectionStatus::Down)));
    assert!(events.contains(&UiEvent::Controls { connected: false }));
    assert!(events.contains(&UiEvent::Log(DISCONNECTED_MESSAGE.to_string())));
}

#[tokio::test]
async fn given_idle_when_disconnect_then_nothing_happens() {
    let (manager, mut events) = start_manager(false);
    drain(&mut events);

    manager.disconnect().await;

    assert_eq!(manager.phase(), ConnectionPhase::Idle);
    assert!(drain(&mut events).is_empty());
}

#[tokio::test]
async fn given_peer_closes_when_connected_then_manager_returns_to_idle() {
    // GIVEN
    let (manager, mut events) = start_manager(false);
    let (_peer, stream) = connected_pair(&manager).await;

    // WHEN
    drop(stream);

    // THEN
    let seen = wait_for_event(&mut events, &UiEvent::Log(DISCONNECTED_MESSAGE.to_string())).await;
    assert!(seen.contains(&UiEvent::Connection(ConnectionStatus::Down)));
    assert!(seen.contains(&UiEvent::Log(PEER_CLOSED_MESSAGE.to_string())));
    wait_for_phase(&manager, ConnectionPhase::Idle).await;
    assert!(!manager.is_connected().await);
}

/// **VALUE**: Verifies the manager can connect again after a session ends.
///
/// **BUG THIS CATCHES**: A lifecycle stuck in `Disconnecting` or `Failed` that blocks
/// every later attempt.
#[tokio::test]
async fn given_previous_session_closed_when_connect_again_then_succeeds() {
    // GIVEN
    let (manager, _events) = start_manager(false);
    let (_first_peer, _first_stream) = connected_pair(&manager).await;
    manager.disconnect().await;

    // WHEN
    let peer = TestPeer::bind().await;
    let port_text = peer.port_text();
    let (result, mut stream) =
        tokio::join!(manager.connect("127.0.0.1", &port_text), peer.accept());

    // THEN
    result.expect("Reconnect should succeed");
    assert_eq!(
        read_utf16(&mut stream, "Device: LightSwitcher;").await,
        "Device: LightSwitcher;"
    );
    assert_eq!(manager.light_state(), LightState::Off);
}

/// **VALUE**: Verifies the configured connect timeout ends an attempt nobody answers.
///
/// **WHY THIS MATTERS**: A peer that never completes the handshake must not leave the
/// UI stuck on the "wait" indicator forever.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - `connect_timeout_ms` is ignored
/// - The timeout is reported as a plain connect failure
/// - The lifecycle stays in `Connecting` afterwards
#[tokio::test]
async fn given_peer_never_accepts_when_connect_then_times_out_and_returns_to_idle() {
    // GIVEN
    let mut config = SwitcherConfig::default();
    config.network.connect_timeout_ms = 150;
    let (manager, mut events) = start_manager_with(config, false);
    let peer = StalledPeer::bind().await;
    drain(&mut events);

    // WHEN
    let result = manager.connect("127.0.0.1", &peer.port_text()).await;

    // THEN
    assert!(matches!(result, Err(ConnectionError::Timeout { .. })));
    assert_eq!(manager.phase(), ConnectionPhase::Idle);
    assert!(!manager.is_connected().await);
    let events = drain(&mut events);
    assert!(events.contains(&UiEvent::Connection(ConnectionStatus::Err)));
    assert!(events.contains(&UiEvent::Controls { connected: false }));
}

/// **VALUE**: Verifies disconnect cancels an attempt that is still connecting.
///
/// **WHY THIS MATTERS**: The user must be able to abort a slow attempt without waiting
/// for the timeout, and aborting is not an error.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - Disconnect is a no-op while `Connecting`
/// - The cancelled attempt shows the error indicator instead of "down"
/// - A session is published after the cancel
#[tokio::test]
async fn given_attempt_pending_when_disconnect_then_attempt_cancelled_and_idle() {
    // GIVEN
    let mut config = SwitcherConfig::default();
    config.network.connect_timeout_ms = 30_000;
    let (manager, mut events) = start_manager_with(config, false);
    let peer = StalledPeer::bind().await;
    let port_text = peer.port_text();
    drain(&mut events);

    // WHEN
    let (result, ()) = tokio::join!(manager.connect("127.0.0.1", &port_text), async {
        wait_for_phase(&manager, ConnectionPhase::Connecting).await;
        manager.disconnect().await;
    });

    // THEN
    assert!(matches!(result, Err(ConnectionError::Cancelled { .. })));
    assert_eq!(manager.phase(), ConnectionPhase::Idle);
    assert!(!manager.is_connected().await);
    let events = drain(&mut events);
    assert!(events.contains(&UiEvent::Connection(ConnectionStatus::Down)));
    assert!(!events.contains(&UiEvent::Connection(ConnectionStatus::Err)));
    assert!(events.contains(&UiEvent::Controls { connected: false }));
}
