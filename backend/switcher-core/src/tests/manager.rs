use super::{drain, log_lines, ui_channel};

use crate::config::SwitcherConfig;
use crate::connection::endpoint::Endpoint;
use crate::connection::lifecycle::ConnectionPhase;
use crate::connection::manager::ConnectionManager;
use crate::constants::CONNECTION_UNAVAILABLE_MESSAGE;

use models::{ConnectionStatus, LightState, UiEvent};

use tokio::io::{AsyncReadExt, duplex};

/// **VALUE**: Verifies a local toggle whose push cannot be written ends the session.
///
/// **WHY THIS MATTERS**: A dead transport discovered on the send side has no receive
/// error to report it. Without teardown the UI would keep showing "connected".
///
/// **BUG THIS CATCHES**: Would catch if:
/// - The write error is swallowed and the session stays published
/// - The light does not flip because the push failed
/// - The UI never sees the down indicator
#[tokio::test]
async fn given_dead_transport_when_local_toggle_then_session_released_and_light_flipped() {
    // GIVEN
    let (ui, mut events) = ui_channel(false);
    let manager = ConnectionManager::new(SwitcherConfig::default(), ui);
    let (local, peer) = duplex(64);
    drop(peer);
    let endpoint = Endpoint::parse("127.0.0.1", "8080").expect("Valid endpoint");
    manager.install_session(endpoint, Box::new(local)).await;
    drain(&mut events);

    // WHEN
    let state = manager.toggle_light().await;

    // THEN
    assert_eq!(state, LightState::On);
    assert_eq!(manager.light_state(), LightState::On);
    assert_eq!(manager.phase(), ConnectionPhase::Idle);
    assert!(!manager.is_connected().await);

    let events = drain(&mut events);
    assert!(events.contains(&UiEvent::Lights(LightState::On)));
    assert!(events.contains(&UiEvent::Connection(ConnectionStatus::Down)));
    assert!(events.contains(&UiEvent::Controls { connected: false }));
    assert!(log_lines(&events).contains(&CONNECTION_UNAVAILABLE_MESSAGE));
}

#[tokio::test]
async fn given_live_transport_when_local_toggle_then_session_kept_and_state_pushed() {
    // GIVEN
    let (ui, _events) = ui_channel(false);
    let manager = ConnectionManager::new(SwitcherConfig::default(), ui);
    let (local, mut peer) = duplex(256);
    let endpoint = Endpoint::parse("127.0.0.1", "8080").expect("Valid endpoint");
    manager.install_session(endpoint, Box::new(local)).await;

    // WHEN
    let state = manager.toggle_light().await;

    // THEN
    assert_eq!(state, LightState::On);
    assert!(manager.is_connected().await);
    let expected = SwitcherConfig::default()
        .network
        .encoding
        .encode("Lights: True;");
    let mut received = vec![0u8; expected.len()];
    peer.read_exact(&mut received).await.expect("Peer read");
    assert_eq!(received, expected);
}
