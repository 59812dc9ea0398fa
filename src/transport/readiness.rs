//! Hook into an externally owned event loop.
//!
//! A node never waits on its socket itself. On `start` it asks the registry to
//! watch the bound address for readability; the loop owner then calls
//! [`Node::socket_ready`](crate::Node::socket_ready) whenever data arrives.

use std::net::SocketAddr;

use super::SocketError;

/// Registration side of a readiness-driven event loop.
pub trait ReadinessRegistry {
    /// Start reporting read readiness for the socket bound at `local`.
    fn add_read_interest(&mut self, local: SocketAddr) -> Result<(), SocketError>;

    /// Stop reporting read readiness for the socket bound at `local`.
    fn remove_read_interest(&mut self, local: SocketAddr);
}

impl<R: ReadinessRegistry + ?Sized> ReadinessRegistry for &mut R {
    fn add_read_interest(&mut self, local: SocketAddr) -> Result<(), SocketError> {
        (**self).add_read_interest(local)
    }

    fn remove_read_interest(&mut self, local: SocketAddr) {
        (**self).remove_read_interest(local);
    }
}

/// Registry for nodes that are only used to send.
///
/// Inbound traffic is never signalled; callers may still poll
/// [`Node::socket_ready`](crate::Node::socket_ready) by hand.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoReadiness;

impl ReadinessRegistry for NoReadiness {
    fn add_read_interest(&mut self, _local: SocketAddr) -> Result<(), SocketError> {
        Ok(())
    }

    fn remove_read_interest(&mut self, _local: SocketAddr) {}
}
