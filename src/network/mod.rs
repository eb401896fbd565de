//! Network Module
//!
//! TCP, UDP and TLS transports behind a single round-trip call.
//!
//! ## Model
//! - One connection per exchange, no pooling
//! - One write, one read of at most 4096 bytes
//! - Connection released on every exit path

mod tls;
mod transport;

pub use tls::build_connector;
pub use transport::{RoundTrip, Transport, RECV_BUFFER_SIZE};
