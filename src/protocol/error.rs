//! KiNet error types

use std::net::SocketAddr;

use thiserror::Error;

use crate::transport::SocketError;

/// KiNet node and protocol errors
#[derive(Error, Debug)]
pub enum Error {
    /// `start` called on a node that is already running
    #[error("node is already running")]
    AlreadyRunning,

    /// Operation requires a running node
    #[error("node is not running")]
    NotRunning,

    /// Socket could not be bound
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address the node tried to bind
        addr: SocketAddr,
        /// Underlying socket failure
        source: SocketError,
    },

    /// Event loop refused to watch the bound socket
    #[error("failed to register for read readiness: {0}")]
    Register(#[source] SocketError),

    /// Datagram could not be sent
    #[error("failed to send KiNet packet: {0}")]
    Send(#[source] SocketError),

    /// Transport accepted fewer bytes than the packet holds
    #[error("partial send: {sent} of {expected} bytes")]
    PartialSend {
        /// Bytes the transport reported as sent
        sent: usize,
        /// Bytes staged for the datagram
        expected: usize,
    },

    /// Channel data exceeds what a single packet can carry
    #[error("payload too large: {len} bytes (max {max})")]
    PayloadTooLarge {
        /// Payload size
        len: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Buffer too small
    #[error("buffer too small: need {needed} bytes, got {got}")]
    BufferTooSmall {
        /// Needed size
        needed: usize,
        /// Actual size
        got: usize,
    },

    /// Invalid magic number
    #[error("invalid magic number: expected 0x0401DC4A, got {found:#x}")]
    InvalidMagic {
        /// Found magic number
        found: u32,
    },

    /// Unsupported protocol version
    #[error("unsupported protocol version: expected 0x0100, got {found:#06x}")]
    InvalidVersion {
        /// Found version
        found: u16,
    },

    /// Invalid message type
    #[error("invalid message type: {type_code:#06x}")]
    InvalidMessageType {
        /// Invalid type code
        type_code: u16,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
