//! KiNet - lighting-control node sending DMX channel data over UDP
//!
//! This library builds the two KiNet command packets a controller understands,
//! bulk DMX and per-port PORTOUT, and sends each as a single best-effort
//! datagram to UDP port 6038. Every packet carries a transaction number from
//! one per-node counter.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::net::Ipv4Addr;
//! use kinet::{DmxBuffer, Node, NoReadiness, UdpBinding};
//!
//! let mut node = Node::new(UdpBinding::new(), NoReadiness);
//! node.start()?;
//!
//! let mut universe = DmxBuffer::new();
//! universe.set_channel(0, 255);
//! node.send_dmx(Ipv4Addr::new(10, 0, 0, 20), &universe)?;
//! node.send_port_out(Ipv4Addr::new(10, 0, 0, 21), 1, &universe)?;
//! # Ok::<(), kinet::Error>(())
//! ```
//!
//! The protocol is fire-and-forget: there is no acknowledgement, retry or
//! fragmentation, and inbound datagrams are read only to be discarded.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod dmx;
pub mod node;
pub mod protocol;
pub mod transport;

pub use dmx::{DMX_UNIVERSE_SIZE, DmxBuffer};
pub use node::{Node, NodeConfig, NodeStats};
pub use protocol::{
    Error, HEADER_SIZE, KINET_PORT, MAGIC_NUMBER, MessageType, PacketHeader, Result,
    TransactionNumber,
};
pub use transport::{DatagramSocket, NoReadiness, ReadinessRegistry, SocketError, UdpBinding};
