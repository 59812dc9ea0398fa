//! Transport collaborators: datagram socket and event-loop registration.

mod readiness;
mod socket;

pub use readiness::{NoReadiness, ReadinessRegistry};
pub use socket::{DatagramSocket, SocketError, UdpBinding};
