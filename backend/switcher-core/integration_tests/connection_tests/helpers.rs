//! Test helpers for connection integration tests.
//!
//! This module provides:
//! - A scripted TCP peer bound inside the allowed port range
//! - A listener whose accept queue is full, for attempts that never complete
//! - UTF-16LE read/write helpers for the peer side
//! - UI event collection with timeouts

use switcher_core::{ConnectionManager, ConnectionPhase, SwitcherConfig, UiHandle, VerboseLogging};

use models::UiEvent;

use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::sync::mpsc::UnboundedReceiver;

/// Upper bound for any single wait in these tests.
pub const WAIT: Duration = Duration::from_secs(5);

const PORT_BASE: u16 = 20000;
const PORT_SPAN: u16 = 20000;

static NEXT_PORT: AtomicU16 = AtomicU16::new(0);

/// Listener standing in for the controlling peer.
pub struct TestPeer {
    pub listener: TcpListener,
    pub port: u16,
}

impl TestPeer {
    /// Bind on 127.0.0.1 inside [1024; 49151].
    ///
    /// The OS ephemeral range can lie above 49151, so port 0 is not an option.
    pub async fn bind() -> Self {
        let offset = (std::process::id() % 1000) as u16 * 17;

        for _ in 0..500 {
            let step = NEXT_PORT.fetch_add(1, Ordering::Relaxed);
            let port = PORT_BASE + (offset + step) % PORT_SPAN;
            if let Ok(listener) = TcpListener::bind(("127.0.0.1", port)).await {
                return Self { listener, port };
            }
        }

        panic!("No free test port in range");
    }

    pub fn port_text(&self) -> String {
        self.port.to_string()
    }

    pub async fn accept(&self) -> TcpStream {
        let (stream, _) = tokio::time::timeout(WAIT, self.listener.accept())
            .await
            .expect("Timed out waiting for client")
            .expect("Accept failed");
        stream
    }
}

/// Listener that never accepts, with its backlog already filled.
///
/// New connection attempts to it stay pending until the caller gives up.
pub struct StalledPeer {
    _listener: TcpListener,
    _queued: Vec<TcpStream>,
    pub port: u16,
}

impl StalledPeer {
    pub async fn bind() -> Self {
        let offset = (std::process::id() % 1000) as u16 * 17;

        for _ in 0..500 {
            let step = NEXT_PORT.fetch_add(1, Ordering::Relaxed);
            let port = PORT_BASE + (offset + step) % PORT_SPAN;
            let Ok(socket) = TcpSocket::new_v4() else {
                continue;
            };
            if socket.bind(([127, 0, 0, 1], port).into()).is_err() {
                continue;
            }
            let Ok(listener) = socket.listen(1) else {
                continue;
            };

            let mut queued = Vec::new();
            for _ in 0..64 {
                let attempt = tokio::time::timeout(
                    Duration::from_millis(200),
                    TcpStream::connect(("127.0.0.1", port)),
                )
                .await;
                match attempt {
                    Ok(Ok(stream)) => queued.push(stream),
                    Ok(Err(e)) => panic!("Filling the backlog failed: {e}"),
                    Err(_) => {
                        return Self {
                            _listener: listener,
                            _queued: queued,
                            port,
                        };
                    }
                }
            }
            panic!("Backlog of port {port} never filled up");
        }

        panic!("No free test port in range");
    }

    pub fn port_text(&self) -> String {
        self.port.to_string()
    }
}

pub fn utf16(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

/// Read exactly as many bytes as `expected` occupies in UTF-16LE and decode them.
pub async fn read_utf16(stream: &mut TcpStream, expected: &str) -> String {
    let mut buffer = vec![0u8; utf16(expected).len()];
    tokio::time::timeout(WAIT, stream.read_exact(&mut buffer))
        .await
        .expect("Timed out waiting for data")
        .expect("Peer read failed");

    let units: Vec<u16> = buffer
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).expect("Peer received invalid UTF-16")
}

pub async fn write_utf16(stream: &mut TcpStream, text: &str) {
    stream
        .write_all(&utf16(text))
        .await
        .expect("Peer write failed");
}

/// Wait until the client closes its side.
pub async fn expect_eof(stream: &mut TcpStream) {
    let mut buffer = [0u8; 64];
    let read = tokio::time::timeout(WAIT, stream.read(&mut buffer))
        .await
        .expect("Timed out waiting for EOF")
        .unwrap_or(0);
    assert_eq!(read, 0, "Expected EOF, got {read} more bytes");
}

/// Manager with default config and a UI receiver the test can drain.
pub fn start_manager(verbose: bool) -> (ConnectionManager, UnboundedReceiver<UiEvent>) {
    start_manager_with(SwitcherConfig::default(), verbose)
}

pub fn start_manager_with(
    config: SwitcherConfig,
    verbose: bool,
) -> (ConnectionManager, UnboundedReceiver<UiEvent>) {
    let (ui, events) = UiHandle::channel(VerboseLogging::new(verbose));
    (ConnectionManager::new(config, ui), events)
}

/// Read `count` records, whatever their lengths, and return them without delimiters.
pub async fn read_records(stream: &mut TcpStream, count: usize) -> Vec<String> {
    let mut records = Vec::with_capacity(count);
    let mut current = Vec::new();
    let mut pair = [0u8; 2];

    while records.len() < count {
        tokio::time::timeout(WAIT, stream.read_exact(&mut pair))
            .await
            .expect("Timed out waiting for records")
            .expect("Peer read failed");
        match u16::from_le_bytes(pair) {
            unit if unit == u16::from(b';') => {
                records.push(String::from_utf16(&current).expect("Peer received invalid UTF-16"));
                current.clear();
            }
            unit => current.push(unit),
        }
    }
    records
}

/// Collect events until one matches `wanted`, returning everything seen.
pub async fn wait_for_event(
    events: &mut UnboundedReceiver<UiEvent>,
    wanted: &UiEvent,
) -> Vec<UiEvent> {
    let mut seen = Vec::new();
    loop {
        let event = tokio::time::timeout(WAIT, events.recv())
            .await
            .unwrap_or_else(|_| panic!("Timed out waiting for {wanted:?}, saw {seen:?}"))
            .expect("UI channel closed");
        let found = &event == wanted;
        seen.push(event);
        if found {
            return seen;
        }
    }
}

/// Everything emitted so far, without waiting.
pub fn drain(events: &mut UnboundedReceiver<UiEvent>) -> Vec<UiEvent> {
    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    seen
}

pub async fn wait_for_phase(manager: &ConnectionManager, phase: ConnectionPhase) {
    tokio::time::timeout(WAIT, async {
        while manager.phase() != phase {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("Timed out waiting for phase {phase}, still {}", manager.phase()));
}

/// Connect `manager` to a fresh peer and consume the identity handshake.
pub async fn connected_pair(manager: &ConnectionManager) -> (TestPeer, TcpStream) {
    let peer = TestPeer::bind().await;

    let port_text = peer.port_text();
    let (result, mut stream) =
        tokio::join!(manager.connect("127.0.0.1", &port_text), peer.accept());
    result.expect("Connect should succeed");

    let handshake = read_utf16(&mut stream, "Device: LightSwitcher;Lights: False;").await;
    assert_eq!(handshake, "Device: LightSwitcher;Lights: False;");

    (peer, stream)
}
