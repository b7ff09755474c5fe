//! Wire protocol: framing, record codec and command dispatch.
//!
//! The string-keyed, `;`-terminated format is the contract with the peer and
//! stays exactly as it is on the wire. It is confined to this module: the
//! connection layer only ever handles [`Record`](models::Record) values.
//!
//! ```text
//! bytes ──► Framer ──► segments ──► MessageCodec ──► Record ──► CommandDispatcher
//!                                                               │
//!                                    outbound Record ◄──────────┘
//! ```

pub mod codec;
pub mod dispatcher;
pub mod encoding;
pub mod framer;

pub use codec::MessageCodec;
pub use dispatcher::CommandDispatcher;
pub use encoding::WireEncoding;
pub use framer::Framer;
