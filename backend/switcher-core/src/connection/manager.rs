//! Connection lifecycle and session ownership.
//!
//! [`ConnectionManager`] is the only thing the UI talks to. It validates the
//! address fields, opens the TCP stream, performs the identity handshake,
//! spawns the receive loop and tears everything down again on disconnect or
//! transport failure.
//!
//! # Concurrency
//!
//! - The initiating context calls `connect` / `disconnect` / `toggle_light`.
//! - One receive task per session reads and dispatches inbound records.
//! - Both may send; [`OutboundWriter`] serializes writes.
//! - The receive task is stopped through a [`CancellationToken`], never aborted,
//!   so it cannot be torn down halfway through a batch.
//!
//! The session slot is an async mutex; the lifecycle phase and the pending
//! attempt token sit behind short synchronous locks that are never held
//! across an await.

use crate::config::SwitcherConfig;
use crate::connection::endpoint::Endpoint;
use crate::connection::lifecycle::{ConnectionPhase, Lifecycle};
use crate::connection::outbound::OutboundWriter;
#[cfg(test)]
use crate::connection::outbound::BoxedWriter;
use crate::connection::receive_loop::{LoopExit, ReceiveLoop};
use crate::connection::record_cache::RecordCache;
use crate::constants::{
    CONNECTION_LOG_LABEL, CONNECTION_MANUALLY_CLOSED_MESSAGE, DISCONNECTED_MESSAGE,
    NOT_CONNECTED_MESSAGE, PEER_CLOSED_MESSAGE, RECEIVE_LOOP_STOPPED_MESSAGE,
};
use crate::device::DeviceState;
use crate::error::connection::ConnectionError;
use crate::protocol::{CommandDispatcher, MessageCodec};
use crate::ui::UiHandle;

use common::ErrorLocation;
use models::{ConnectionStatus, LightState, Method, Record};

use std::panic::Location;
use std::sync::{Arc, Mutex as SyncMutex, MutexGuard as SyncMutexGuard, PoisonError, Weak};

use log::{debug, info, warn};
use tokio::net::TcpStream;
use tokio::spawn as TokioSpawn;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::timeout as TokioTimeout;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Why a session is being torn down.
enum Teardown {
    Requested,
    PeerClosed,
    TransportFailed(ConnectionError),
}

/// Everything owned by one live connection.
struct ActiveSession {
    id: Uuid,
    endpoint: Endpoint,
    writer: OutboundWriter,
    cancel: CancellationToken,
    receive_task: JoinHandle<()>,
}

struct ManagerInner {
    config: SwitcherConfig,
    codec: MessageCodec,
    device: DeviceState,
    ui: UiHandle,
    lifecycle: Lifecycle,
    /// Token of the attempt in flight, so `disconnect` can cancel it.
    attempt: SyncMutex<Option<CancellationToken>>,
    session: Mutex<Option<ActiveSession>>,
}

impl ManagerInner {
    fn attempt_slot(&self) -> SyncMutexGuard<'_, Option<CancellationToken>> {
        self.attempt.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Client endpoint for the light protocol.
///
/// Cheap to clone; all clones drive the same connection.
#[derive(Clone)]
pub struct ConnectionManager {
    inner: Arc<ManagerInner>,
}

impl ConnectionManager {
    /// Create a manager with the light in its configured start state.
    ///
    /// The initial light state is pushed to the UI immediately.
    pub fn new(config: SwitcherConfig, ui: UiHandle) -> Self {
        let device = DeviceState::new(config.initial_lights(), ui.clone());
        device.publish();

        Self {
            inner: Arc::new(ManagerInner {
                codec: MessageCodec::new(config.network.encoding),
                config,
                device,
                ui,
                lifecycle: Lifecycle::new(),
                attempt: SyncMutex::new(None),
                session: Mutex::new(None),
            }),
        }
    }

    pub fn phase(&self) -> ConnectionPhase {
        self.inner.lifecycle.current()
    }

    pub fn light_state(&self) -> LightState {
        self.inner.device.get()
    }

    /// Peer of the live session, if any.
    pub async fn endpoint(&self) -> Option<Endpoint> {
        self.inner
            .session
            .lock()
            .await
            .as_ref()
            .map(|session| session.endpoint)
    }

    pub async fn is_connected(&self) -> bool {
        self.inner.session.lock().await.is_some()
    }

    /// Connect to `address_text:port_text`.
    ///
    /// On success the device identity and current light state have been sent
    /// and the receive loop is running. Every outcome is also reported to the
    /// UI; the returned error is for callers that want to branch on it.
    ///
    /// # Errors
    ///
    /// - [`ConnectionError::InvalidAddress`] / [`ConnectionError::InvalidPort`] before
    ///   any transport is created
    /// - [`ConnectionError::AlreadyActive`] if an attempt or session exists
    /// - [`ConnectionError::Connect`], [`ConnectionError::Timeout`],
    ///   [`ConnectionError::Cancelled`] or [`ConnectionError::Io`] if the attempt fails
    pub async fn connect(&self, address_text: &str, port_text: &str) -> Result<(), ConnectionError> {
        let ui = &self.inner.ui;

        let endpoint = match Endpoint::parse(address_text, port_text) {
            Ok(endpoint) => endpoint,
            Err(e) => {
                warn!("Rejected connect request: {e}");
                ui.log(e.ui_line(true));
                return Err(e);
            }
        };

        if let Err(phase) = self.inner.lifecycle.begin_connect() {
            let err = ConnectionError::AlreadyActive {
                message: format!("cannot connect to {endpoint} while {phase}"),
                location: ErrorLocation::from(Location::caller()),
            };
            warn!("{err}");
            ui.log(err.ui_line(ui.is_verbose()));
            return Err(err);
        }

        let cancel = CancellationToken::new();
        *self.inner.attempt_slot() = Some(cancel.clone());

        ui.connection(ConnectionStatus::Wait);
        ui.controls(true);
        ui.log(format!("{CONNECTION_LOG_LABEL}Connecting to {endpoint}"));

        let stream = match self.open_transport(endpoint, &cancel).await {
            Ok(stream) => stream,
            Err(e) => {
                self.fail_attempt(&e);
                return Err(e);
            }
        };

        self.establish(endpoint, stream, cancel).await
    }

    /// Close the session, or cancel a pending attempt.
    ///
    /// Sends a best-effort `Method: DISCONNECT`, stops the receive loop and
    /// waits for it, then closes the transport. A no-op when idle.
    pub async fn disconnect(&self) {
        let attempt = self.inner.attempt_slot().take();
        if let Some(token) = &attempt {
            token.cancel();
        }

        let session = self.inner.session.lock().await.take();
        match session {
            Some(session) => self.release(session, Teardown::Requested, true).await,
            None if attempt.is_some() => debug!("Disconnect cancelled a pending connection attempt"),
            None => {
                debug!("Disconnect requested with no active connection");
                self.inner.ui.verbose(NOT_CONNECTED_MESSAGE);
            }
        }
    }

    /// Flip the light locally and push the new state to the peer if connected.
    ///
    /// While a session is live the flip happens inside the writer's critical
    /// section, so the last `Lights:` record the peer reads always matches
    /// the device even when a peer `SWITCH` lands at the same moment.
    pub async fn toggle_light(&self) -> LightState {
        let device = &self.inner.device;

        let slot = self.inner.session.lock().await;
        let Some(session) = slot.as_ref() else {
            return device.toggle();
        };

        let id = session.id;
        let mut toggled = device.get();
        let pushed = session
            .writer
            .send_with(|| {
                toggled = device.toggle();
                Some(Record::lights(toggled))
            })
            .await;
        drop(slot);

        if let Err(e) = pushed {
            self.drop_session(id, Teardown::TransportFailed(e)).await;
        }

        toggled
    }

    async fn open_transport(
        &self,
        endpoint: Endpoint,
        cancel: &CancellationToken,
    ) -> Result<TcpStream, ConnectionError> {
        let limit = self.inner.config.connect_timeout();

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ConnectionError::Cancelled {
                message: format!("connect to {endpoint} was cancelled"),
                location: ErrorLocation::from(Location::caller()),
            }),
            result = TokioTimeout(limit, TcpStream::connect(endpoint.socket_addr())) => match result {
                Ok(Ok(stream)) => Ok(stream),
                Ok(Err(e)) => Err(ConnectionError::Connect {
                    message: e.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                }),
                Err(_) => Err(ConnectionError::Timeout {
                    message: format!("no answer from {endpoint} within {limit:?}"),
                    location: ErrorLocation::from(Location::caller()),
                }),
            },
        }
    }

    /// Connecting -> Connected: handshake, spawn the receive loop, publish the session.
    async fn establish(
        &self,
        endpoint: Endpoint,
        stream: TcpStream,
        cancel: CancellationToken,
    ) -> Result<(), ConnectionError> {
        let ui = &self.inner.ui;

        if let Err(e) = stream.set_nodelay(true) {
            debug!("Could not disable Nagle on {endpoint}: {e}");
        }
        let (reader, writer) = stream.into_split();
        let writer = OutboundWriter::new(Box::new(writer), self.inner.codec, ui.clone());

        // Held until the session is published so `disconnect` sees either
        // nothing (and cancels the token) or the finished session.
        let mut slot = self.inner.session.lock().await;

        if cancel.is_cancelled() {
            drop(slot);
            writer.close().await;
            let err = ConnectionError::Cancelled {
                message: format!("connect to {endpoint} was cancelled"),
                location: ErrorLocation::from(Location::caller()),
            };
            self.fail_attempt(&err);
            return Err(err);
        }

        self.inner.lifecycle.set(ConnectionPhase::Connected);
        ui.connection(ConnectionStatus::Up);
        ui.log(format!("{CONNECTION_LOG_LABEL}Connected to {endpoint}"));

        let device_type = &self.inner.config.device.device_type;
        let handshake = match writer.send(&Record::device(device_type)).await {
            Ok(()) => {
                writer
                    .send_with(|| Some(Record::lights(self.inner.device.get())))
                    .await
            }
            Err(e) => Err(e),
        };

        if let Err(e) = handshake {
            drop(slot);
            writer.close().await;
            self.fail_attempt(&e);
            return Err(e);
        }

        let id = Uuid::new_v4();
        let receive_loop = ReceiveLoop::new(
            reader,
            self.inner.codec,
            CommandDispatcher::new(self.inner.device.clone(), ui.clone()),
            RecordCache::default(),
            writer.clone(),
            ui.clone(),
            cancel.clone(),
            self.inner.config.network.receive_buffer_size,
        );

        let manager = Arc::downgrade(&self.inner);
        let receive_task = TokioSpawn(run_receive_loop(manager, id, receive_loop));

        *slot = Some(ActiveSession {
            id,
            endpoint,
            writer,
            cancel,
            receive_task,
        });
        drop(slot);
        self.inner.attempt_slot().take();

        info!("Session {id} established with {endpoint}");
        Ok(())
    }

    /// Failed -> Idle after an attempt that never produced a session.
    fn fail_attempt(&self, error: &ConnectionError) {
        let ui = &self.inner.ui;

        self.inner.attempt_slot().take();
        self.inner.lifecycle.set(ConnectionPhase::Failed);

        if let ConnectionError::Cancelled { .. } = error {
            info!("{error}");
            ui.connection(ConnectionStatus::Down);
            ui.verbose(error.ui_line(true));
        } else {
            warn!("Connection attempt failed: {error}");
            ui.connection(ConnectionStatus::Err);
            ui.log(error.ui_line(ui.is_verbose()));
        }
        ui.controls(false);

        self.inner.lifecycle.set(ConnectionPhase::Idle);
    }

    async fn on_receive_exit(&self, id: Uuid, exit: LoopExit) {
        match exit {
            LoopExit::Cancelled => self.inner.ui.verbose(RECEIVE_LOOP_STOPPED_MESSAGE),
            LoopExit::PeerClosed => self.drop_session(id, Teardown::PeerClosed).await,
            LoopExit::Failed(e) => self.drop_session(id, Teardown::TransportFailed(e)).await,
        }
    }

    /// Release session `id` if it is still the live one.
    ///
    /// Used from inside the receive task, so it never joins that task.
    async fn drop_session(&self, id: Uuid, reason: Teardown) {
        let session = {
            let mut slot = self.inner.session.lock().await;
            if slot.as_ref().is_some_and(|session| session.id == id) {
                slot.take()
            } else {
                None
            }
        };

        match session {
            Some(session) => self.release(session, reason, false).await,
            None => debug!("Session {id} was already released"),
        }
    }

    /// Connected -> Disconnecting -> Idle.
    async fn release(&self, session: ActiveSession, reason: Teardown, join: bool) {
        let ui = &self.inner.ui;
        let ActiveSession {
            id,
            endpoint,
            writer,
            cancel,
            receive_task,
        } = session;

        self.inner.lifecycle.set(ConnectionPhase::Disconnecting);

        if let Err(e) = writer.send(&Record::method(Method::Disconnect)).await {
            debug!("Disconnect notice to {endpoint} not delivered: {e}");
        }

        cancel.cancel();
        if join {
            if let Err(e) = receive_task.await {
                warn!("Receive task of session {id} ended abnormally: {e}");
            }
        }

        writer.close().await;

        ui.controls(false);
        ui.connection(ConnectionStatus::Down);

        match reason {
            Teardown::Requested => {
                ui.log(DISCONNECTED_MESSAGE);
                ui.verbose(CONNECTION_MANUALLY_CLOSED_MESSAGE);
            }
            Teardown::PeerClosed => {
                ui.log(PEER_CLOSED_MESSAGE);
                ui.log(DISCONNECTED_MESSAGE);
            }
            Teardown::TransportFailed(e) => {
                warn!("Session {id} with {endpoint} failed: {e}");
                ui.log(e.ui_line(ui.is_verbose()));
            }
        }

        self.inner.lifecycle.set(ConnectionPhase::Idle);
        info!("Session {id} with {endpoint} closed");
    }
}

#[cfg(test)]
impl ConnectionManager {
    /// Publish a session over `writer` with no socket and an idle receive task.
    pub(crate) async fn install_session(&self, endpoint: Endpoint, writer: BoxedWriter) {
        let cancel = CancellationToken::new();
        let stopped = cancel.clone();
        let receive_task = TokioSpawn(async move { stopped.cancelled().await });

        *self.inner.session.lock().await = Some(ActiveSession {
            id: Uuid::new_v4(),
            endpoint,
            writer: OutboundWriter::new(writer, self.inner.codec, self.inner.ui.clone()),
            cancel,
            receive_task,
        });
        self.inner.lifecycle.set(ConnectionPhase::Connected);
    }
}

async fn run_receive_loop(
    manager: Weak<ManagerInner>,
    id: Uuid,
    receive_loop: ReceiveLoop<tokio::net::tcp::OwnedReadHalf>,
) {
    let exit = receive_loop.run().await;
    debug!("Receive loop of session {id} exited: {exit:?}");

    match manager.upgrade() {
        Some(inner) => ConnectionManager { inner }.on_receive_exit(id, exit).await,
        None => debug!("Manager dropped before session {id} ended"),
    }
}
