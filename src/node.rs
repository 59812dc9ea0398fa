//! KiNet node: builds DMX and PORTOUT packets and sends them over UDP.
//!
//! A node is single-owner state. Its output buffer and transaction counter
//! are reused by every send without locking, so two sends must never run
//! concurrently on the same node.

use std::net::{Ipv4Addr, SocketAddr};

use bytes::{Buf, BytesMut};
use tracing::{debug, info, instrument, warn};

use crate::dmx::DmxBuffer;
use crate::protocol::{
    Error, KINET_PORT, MessageType, Result, TransactionNumber, check_payload_len, encode_dmx,
    encode_port_out, write_header,
};
use crate::transport::{DatagramSocket, ReadinessRegistry};

/// Node configuration options.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeConfig {
    /// Address the receiving socket binds to.
    pub bind_addr: SocketAddr,
    /// UDP port packets are sent to.
    pub target_port: u16,
    /// Size of the scratch buffer inbound datagrams are read into.
    pub recv_buffer_size: usize,
    /// First transaction number the node hands out.
    pub initial_transaction: u32,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, KINET_PORT)),
            target_port: KINET_PORT,
            recv_buffer_size: 1500,
            initial_transaction: 0,
        }
    }
}

/// Per-node traffic counters.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeStats {
    /// Packets handed to the transport in full.
    pub packets_sent: u64,
    /// Bytes handed to the transport in full packets.
    pub bytes_sent: u64,
    /// Sends that failed or went out truncated.
    pub send_failures: u64,
    /// Inbound datagrams read and dropped.
    pub discarded_datagrams: u64,
}

/// A KiNet node.
///
/// `S` is the datagram transport, `R` the event loop that reports inbound
/// readiness. The node starts stopped; dropping it stops it.
pub struct Node<S: DatagramSocket, R: ReadinessRegistry> {
    config: NodeConfig,
    socket: S,
    registry: R,
    local_addr: Option<SocketAddr>,
    transactions: TransactionNumber,
    output: BytesMut,
    scratch: Vec<u8>,
    stats: NodeStats,
}

impl<S: DatagramSocket, R: ReadinessRegistry> Node<S, R> {
    /// Create a stopped node with the default configuration.
    pub fn new(socket: S, registry: R) -> Self {
        Self::with_config(NodeConfig::default(), socket, registry)
    }

    /// Create a stopped node.
    pub fn with_config(config: NodeConfig, socket: S, registry: R) -> Self {
        let scratch = vec![0u8; config.recv_buffer_size];
        Self {
            transactions: TransactionNumber::starting_at(config.initial_transaction),
            config,
            socket,
            registry,
            local_addr: None,
            output: BytesMut::with_capacity(2048),
            scratch,
            stats: NodeStats::default(),
        }
    }

    /// Bind the socket and register it with the event loop.
    #[instrument(level = "info", skip(self), fields(bind_addr = %self.config.bind_addr))]
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(Error::AlreadyRunning);
        }

        let addr = self.config.bind_addr;
        if let Err(source) = self.socket.bind(addr) {
            warn!(error = %source, "socket bind failed");
            return Err(Error::Bind { addr, source });
        }

        let local = self.socket.local_addr().unwrap_or(addr);
        if let Err(err) = self.registry.add_read_interest(local) {
            warn!(error = %err, "failed to watch socket for reads");
            self.socket.close();
            return Err(Error::Register(err));
        }

        self.local_addr = Some(local);
        Ok(())
    }

    /// Deregister from the event loop and release the socket.
    ///
    /// The transaction counter is kept, so a later `start` continues the
    /// sequence.
    #[instrument(level = "info", skip(self))]
    pub fn stop(&mut self) -> Result<()> {
        let Some(local) = self.local_addr.take() else {
            return Err(Error::NotRunning);
        };

        self.registry.remove_read_interest(local);
        self.socket.close();
        Ok(())
    }

    /// Whether the node is started.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.local_addr.is_some()
    }

    /// Local address of the receiving socket while running.
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Transaction number the next packet will carry.
    #[must_use]
    pub fn next_transaction(&self) -> u32 {
        self.transactions.peek()
    }

    /// Snapshot of the traffic counters.
    #[must_use]
    pub fn stats(&self) -> NodeStats {
        self.stats
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Underlying transport.
    #[must_use]
    pub fn socket(&self) -> &S {
        &self.socket
    }

    /// Send a whole universe of channel data to `target`.
    ///
    /// An empty buffer sends nothing, consumes no transaction number and
    /// succeeds.
    pub fn send_dmx(&mut self, target: Ipv4Addr, buffer: &DmxBuffer) -> Result<()> {
        let channels = buffer.as_slice();
        if channels.is_empty() {
            debug!("not sending 0 length packet");
            return Ok(());
        }
        // reject before the header takes a transaction number
        check_payload_len(channels.len())?;

        self.output.clear();
        write_header(&mut self.output, MessageType::Dmx, &mut self.transactions);
        encode_dmx(&mut self.output, channels)?;
        self.transmit(target, MessageType::Dmx)
    }

    /// Send channel data for one output `port` of the controller at `target`.
    ///
    /// Same empty-buffer rule as [`Node::send_dmx`].
    pub fn send_port_out(&mut self, target: Ipv4Addr, port: u8, buffer: &DmxBuffer) -> Result<()> {
        let channels = buffer.as_slice();
        if channels.is_empty() {
            debug!("not sending 0 length packet");
            return Ok(());
        }
        // reject before the header takes a transaction number
        check_payload_len(channels.len())?;

        self.output.clear();
        write_header(&mut self.output, MessageType::PortOut, &mut self.transactions);
        encode_port_out(&mut self.output, port, channels)?;
        self.transmit(target, MessageType::PortOut)
    }

    /// Read and drop one pending inbound datagram.
    ///
    /// The event loop calls this when the socket becomes readable. A failed
    /// read is treated as a spurious wakeup.
    pub fn socket_ready(&mut self) {
        let Ok((len, source)) = self.socket.recv_from(&mut self.scratch) else {
            return;
        };

        self.stats.discarded_datagrams += 1;
        info!(%source, len, "received KiNet packet, discarding");
    }

    /// Hand the staged packet to the transport in a single attempt.
    fn transmit(&mut self, target: Ipv4Addr, msg_type: MessageType) -> Result<()> {
        let addr = SocketAddr::from((target, self.config.target_port));
        let expected = self.output.len();
        let result = self.socket.send_to(&self.output, addr);

        let sent = match &result {
            Ok(sent) => (*sent).min(expected),
            Err(_) => 0,
        };
        self.output.advance(sent);

        if let Err(err) = result {
            warn!(%msg_type, %addr, error = %err, "failed to send KiNet packet");
            self.output.clear();
            self.stats.send_failures += 1;
            return Err(Error::Send(err));
        }

        if !self.output.is_empty() {
            warn!(%msg_type, %addr, sent, expected, "failed to send complete KiNet packet");
            self.output.clear();
            self.stats.send_failures += 1;
            return Err(Error::PartialSend { sent, expected });
        }

        self.stats.packets_sent += 1;
        self.stats.bytes_sent += expected as u64;
        Ok(())
    }

    #[cfg(test)]
    fn staged_bytes(&self) -> usize {
        self.output.len()
    }
}

impl<S: DatagramSocket, R: ReadinessRegistry> Drop for Node<S, R> {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
