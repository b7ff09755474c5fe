use light_switcher::console::{Console, ConsoleCommand};

use switcher_core::{ConnectionManager, ConnectionPhase, SwitcherConfig, UiHandle, VerboseLogging};

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

// ============================================================================
// Integration tests for the console driving a real connection
// ============================================================================

const WAIT: Duration = Duration::from_secs(5);

/// Bind a listener inside the allowed [1024; 49151] range.
async fn bind_peer(base: u16) -> (TcpListener, u16) {
    let start = base + (std::process::id() % 500) as u16 * 13;
    for port in start..start + 400 {
        if let Ok(listener) = TcpListener::bind(("127.0.0.1", port)).await {
            return (listener, port);
        }
    }
    panic!("No free test port in range");
}

fn utf16(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

async fn expect_text(stream: &mut TcpStream, text: &str) {
    let expected = utf16(text);
    let mut received = vec![0u8; expected.len()];
    tokio::time::timeout(WAIT, stream.read_exact(&mut received))
        .await
        .expect("Timed out waiting for data")
        .expect("Peer read failed");
    assert_eq!(received, expected, "expected {text:?}");
}

/// **VALUE**: Tests a full user session typed at the console against a live peer.
///
/// **WHY THIS MATTERS**: This is the closest we get to clicking through the window:
/// connect, flip the light locally, let the peer flip it back, then disconnect.
///
/// **BUG THIS CATCHES**: Would catch if the console and the engine disagree on any step,
/// e.g. a local switch not reaching the peer or disconnect leaving the session alive.
#[tokio::test]
async fn given_console_session_when_user_switches_and_disconnects_then_peer_sees_every_step() {
    // GIVEN: A peer and a console wired to a fresh manager
    let (listener, port) = bind_peer(31000).await;
    let verbose = VerboseLogging::new(false);
    let (ui, _events) = UiHandle::channel(verbose.clone());
    let manager = ConnectionManager::new(SwitcherConfig::default(), ui.clone());
    let console = Console::new(manager.clone(), verbose, ui);

    // WHEN: The user connects
    let connect = ConsoleCommand::Connect {
        address: "127.0.0.1".to_string(),
        port: port.to_string(),
    };
    let (flow, accepted) = tokio::join!(console.execute(connect), listener.accept());
    assert!(flow.is_continue());
    let (mut stream, _) = accepted.expect("Accept failed");

    // THEN: The handshake arrives
    expect_text(&mut stream, "Device: LightSwitcher;Lights: False;").await;
    assert_eq!(manager.phase(), ConnectionPhase::Connected);

    // WHEN: The user flips the light
    assert!(console.execute(ConsoleCommand::Switch).await.is_continue());

    // THEN: The peer is told
    expect_text(&mut stream, "Lights: True;").await;

    // WHEN: The peer flips it back
    stream
        .write_all(&utf16("Method: SWITCH;"))
        .await
        .expect("Peer write failed");

    // THEN: The reply carries the new state
    expect_text(&mut stream, "Lights: False;").await;

    // WHEN: The user disconnects
    assert!(console.execute(ConsoleCommand::Disconnect).await.is_continue());

    // THEN: The peer gets the notice and the manager is idle
    expect_text(&mut stream, "Method: DISCONNECT;").await;
    assert_eq!(manager.phase(), ConnectionPhase::Idle);
}
