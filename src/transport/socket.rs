//! Minimal UDP socket layer for a KiNet node.

use std::fmt;
use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

/// Error type for socket operations.
#[derive(Debug)]
pub enum SocketError {
    /// Underlying I/O error
    Io(io::Error),
    /// Operation needs a bound socket
    NotBound,
}

impl fmt::Display for SocketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::NotBound => write!(f, "socket is not bound"),
        }
    }
}

impl std::error::Error for SocketError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::NotBound => None,
        }
    }
}

impl From<io::Error> for SocketError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Datagram transport a node sends through and drains inbound traffic from.
pub trait DatagramSocket {
    /// Bind to the provided address, replacing any previous binding.
    fn bind(&mut self, addr: SocketAddr) -> Result<(), SocketError>;

    /// Release the binding. Closing an unbound socket does nothing.
    fn close(&mut self);

    /// Send one datagram, returning the number of bytes the transport took.
    fn send_to(&mut self, buf: &[u8], addr: SocketAddr) -> Result<usize, SocketError>;

    /// Receive one datagram into `buf`.
    fn recv_from(&mut self, buf: &mut [u8]) -> Result<(usize, SocketAddr), SocketError>;

    /// Local address of the current binding.
    fn local_addr(&self) -> Result<SocketAddr, SocketError>;
}

/// [`DatagramSocket`] backed by a std UDP socket.
#[derive(Debug)]
pub struct UdpBinding {
    socket: Option<UdpSocket>,
    nonblocking: bool,
    write_timeout: Option<Duration>,
}

impl UdpBinding {
    /// Create an unbound socket whose reads never block once bound.
    #[must_use]
    pub fn new() -> Self {
        Self {
            socket: None,
            nonblocking: true,
            write_timeout: None,
        }
    }

    /// Adjust the non-blocking mode applied at bind time.
    #[must_use]
    pub fn with_nonblocking(mut self, nonblocking: bool) -> Self {
        self.nonblocking = nonblocking;
        self
    }

    /// Set the write timeout applied at bind time.
    #[must_use]
    pub fn with_write_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.write_timeout = timeout;
        self
    }

    fn socket(&self) -> Result<&UdpSocket, SocketError> {
        self.socket.as_ref().ok_or(SocketError::NotBound)
    }
}

impl Default for UdpBinding {
    fn default() -> Self {
        Self::new()
    }
}

impl DatagramSocket for UdpBinding {
    fn bind(&mut self, addr: SocketAddr) -> Result<(), SocketError> {
        let socket = UdpSocket::bind(addr)?;
        socket.set_nonblocking(self.nonblocking)?;
        socket.set_write_timeout(self.write_timeout)?;
        self.socket = Some(socket);
        Ok(())
    }

    fn close(&mut self) {
        self.socket = None;
    }

    fn send_to(&mut self, buf: &[u8], addr: SocketAddr) -> Result<usize, SocketError> {
        Ok(self.socket()?.send_to(buf, addr)?)
    }

    fn recv_from(&mut self, buf: &mut [u8]) -> Result<(usize, SocketAddr), SocketError> {
        Ok(self.socket()?.recv_from(buf)?)
    }

    fn local_addr(&self) -> Result<SocketAddr, SocketError> {
        Ok(self.socket()?.local_addr()?)
    }
}
