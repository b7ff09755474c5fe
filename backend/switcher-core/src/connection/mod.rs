//! TCP client side of the light protocol.

pub mod endpoint;
pub mod lifecycle;
pub mod manager;

pub(crate) mod outbound;
pub(crate) mod receive_loop;
pub(crate) mod record_cache;

pub use endpoint::Endpoint;
pub use lifecycle::ConnectionPhase;
pub use manager::ConnectionManager;
