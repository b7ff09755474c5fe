use crate::connection_tests::helpers::{
    connected_pair, drain, read_records, read_utf16, start_manager, wait_for_event, write_utf16,
};

use models::{LightState, UiEvent};

use tokio::io::AsyncWriteExt;

/// **VALUE**: Verifies the full SWITCH round trip over a real socket.
///
/// **WHY THIS MATTERS**: This is the device's main job: the peer flips the light and
/// immediately sees the new state.
#[tokio::test]
async fn given_connected_when_peer_sends_switch_then_light_on_and_reply_sent() {
    // GIVEN
    let (manager, mut events) = start_manager(false);
    let (_peer, mut stream) = connected_pair(&manager).await;

    // WHEN
    write_utf16(&mut stream, "Method: SWITCH;").await;

    // THEN
    assert_eq!(read_utf16(&mut stream, "Lights: True;").await, "Lights: True;");
    let seen = wait_for_event(&mut events, &UiEvent::Lights(LightState::On)).await;
    assert!(seen.contains(&UiEvent::Log(
        "Network: Lights switch was requested.".to_string()
    )));
    assert_eq!(manager.light_state(), LightState::On);
}

#[tokio::test]
async fn given_connected_when_peer_requests_status_then_replies_42() {
    let (manager, _events) = start_manager(false);
    let (_peer, mut stream) = connected_pair(&manager).await;

    write_utf16(&mut stream, "Method: REQUEST_STATUS;").await;

    assert_eq!(read_utf16(&mut stream, "Status: 42;").await, "Status: 42;");
    assert_eq!(manager.light_state(), LightState::Off);
}

/// **VALUE**: Verifies a burst of commands, split mid-record, is answered in order.
///
/// **BUG THIS CATCHES**: Replies reordered or a record lost at a TCP segment boundary.
#[tokio::test]
async fn given_fragmented_burst_when_received_then_replies_follow_command_order() {
    // GIVEN
    let (manager, _events) = start_manager(false);
    let (_peer, mut stream) = connected_pair(&manager).await;

    // WHEN
    write_utf16(&mut stream, "Method: SWITCH;Method: REQ").await;
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    write_utf16(&mut stream, "UEST_STATUS;Method: SWITCH;").await;

    // THEN
    let expected = "Lights: True;Status: 42;Lights: False;";
    assert_eq!(read_utf16(&mut stream, expected).await, expected);
    assert_eq!(manager.light_state(), LightState::Off);
}

#[tokio::test]
async fn given_connected_when_local_toggle_then_peer_receives_new_state() {
    // GIVEN
    let (manager, _events) = start_manager(false);
    let (_peer, mut stream) = connected_pair(&manager).await;

    // WHEN
    let state = manager.toggle_light().await;

    // THEN
    assert_eq!(state, LightState::On);
    assert_eq!(read_utf16(&mut stream, "Lights: True;").await, "Lights: True;");
}

#[tokio::test]
async fn given_idle_when_local_toggle_then_state_flips_without_session() {
    let (manager, mut events) = start_manager(false);
    drain(&mut events);

    let state = manager.toggle_light().await;

    assert_eq!(state, LightState::On);
    assert_eq!(drain(&mut events), vec![UiEvent::Lights(LightState::On)]);
}

#[tokio::test]
async fn given_unknown_record_when_received_then_logged_once_and_session_survives() {
    // GIVEN
    let (manager, mut events) = start_manager(false);
    let (_peer, mut stream) = connected_pair(&manager).await;

    // WHEN
    write_utf16(&mut stream, "Colour: blue;Method: REQUEST_STATUS;").await;

    // THEN
    assert_eq!(read_utf16(&mut stream, "Status: 42;").await, "Status: 42;");
    let unknown: Vec<_> = drain(&mut events)
        .into_iter()
        .filter(|event| matches!(event, UiEvent::Log(line) if line.contains("unknown data")))
        .collect();
    assert_eq!(
        unknown,
        vec![UiEvent::Log(
            "Network: Received unknown data: \"Colour: blue;\"".to_string()
        )]
    );
    assert!(manager.is_connected().await);
}

/// **VALUE**: Verifies local toggles racing peer SWITCH commands leave both sides agreeing.
///
/// **WHY THIS MATTERS**: The peer shows whatever the last `Lights:` record said. If a
/// flip and its push can be separated, two pushes swap places and the peer shows the
/// wrong state until the next change.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - The local toggle flips outside the send lock
/// - The receive loop flips outside the send lock
/// - A push is lost or duplicated under contention
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_local_and_peer_toggles_racing_when_settled_then_peer_matches_device() {
    // GIVEN
    const ROUNDS: usize = 25;
    const TOGGLES: usize = 20;
    let (manager, _events) = start_manager(false);
    let (_peer, mut stream) = connected_pair(&manager).await;
    let switches: Vec<u8> = "Method: SWITCH;"
        .repeat(TOGGLES)
        .encode_utf16()
        .flat_map(u16::to_le_bytes)
        .collect();

    for round in 0..ROUNDS {
        // WHEN
        let local = {
            let manager = manager.clone();
            tokio::spawn(async move {
                for _ in 0..TOGGLES {
                    manager.toggle_light().await;
                }
            })
        };
        stream.write_all(&switches).await.expect("Peer write failed");
        local.await.expect("Local toggles panicked");

        // THEN
        let records = read_records(&mut stream, TOGGLES * 2).await;
        assert!(records.iter().all(|record| record.starts_with("Lights: ")));
        let expected = format!("Lights: {}", manager.light_state().as_wire());
        assert_eq!(
            records.last(),
            Some(&expected),
            "round {round}: peer's last record disagrees with the device"
        );
    }
}
