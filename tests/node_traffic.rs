use std::cell::RefCell;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::rc::Rc;

use kinet::{
    DatagramSocket, DmxBuffer, Error, HEADER_SIZE, MessageType, Node, NodeConfig, PacketHeader,
    ReadinessRegistry, SocketError, UdpBinding,
};
use proptest::prelude::*;

#[derive(Default)]
struct Wire {
    packets: Vec<(Vec<u8>, SocketAddr)>,
    fail_sends: bool,
}

/// Socket that records every datagram on a shared wire.
#[derive(Clone, Default)]
struct RecordingSocket {
    wire: Rc<RefCell<Wire>>,
    bound: Option<SocketAddr>,
}

impl DatagramSocket for RecordingSocket {
    fn bind(&mut self, addr: SocketAddr) -> Result<(), SocketError> {
        self.bound = Some(addr);
        Ok(())
    }

    fn close(&mut self) {
        self.bound = None;
    }

    fn send_to(&mut self, buf: &[u8], addr: SocketAddr) -> Result<usize, SocketError> {
        let mut wire = self.wire.borrow_mut();
        if wire.fail_sends {
            return Err(io::Error::other("network down").into());
        }
        wire.packets.push((buf.to_vec(), addr));
        Ok(buf.len())
    }

    fn recv_from(&mut self, _buf: &mut [u8]) -> Result<(usize, SocketAddr), SocketError> {
        Err(io::Error::from(io::ErrorKind::WouldBlock).into())
    }

    fn local_addr(&self) -> Result<SocketAddr, SocketError> {
        self.bound.ok_or(SocketError::NotBound)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Registration {
    Add(SocketAddr),
    Remove(SocketAddr),
}

#[derive(Clone, Default)]
struct RecordingLoop {
    log: Rc<RefCell<Vec<Registration>>>,
}

impl ReadinessRegistry for RecordingLoop {
    fn add_read_interest(&mut self, local: SocketAddr) -> Result<(), SocketError> {
        self.log.borrow_mut().push(Registration::Add(local));
        Ok(())
    }

    fn remove_read_interest(&mut self, local: SocketAddr) {
        self.log.borrow_mut().push(Registration::Remove(local));
    }
}

const TARGET: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 50);

fn recording_node() -> (Node<RecordingSocket, RecordingLoop>, Rc<RefCell<Wire>>) {
    let socket = RecordingSocket::default();
    let wire = Rc::clone(&socket.wire);
    (Node::new(socket, RecordingLoop::default()), wire)
}

fn transactions(wire: &Wire) -> Vec<u32> {
    wire.packets
        .iter()
        .map(|(bytes, _)| PacketHeader::from_bytes(bytes).unwrap().transaction())
        .collect()
}

#[test]
fn lifecycle_registers_and_deregisters_with_event_loop() {
    let registry = RecordingLoop::default();
    let log = Rc::clone(&registry.log);
    let mut node = Node::new(RecordingSocket::default(), registry);
    let wildcard: SocketAddr = "0.0.0.0:6038".parse().unwrap();

    node.start().unwrap();
    assert_eq!(node.local_addr(), Some(wildcard));
    node.stop().unwrap();
    node.start().unwrap();
    drop(node);

    assert_eq!(
        *log.borrow(),
        vec![
            Registration::Add(wildcard),
            Registration::Remove(wildcard),
            Registration::Add(wildcard),
            Registration::Remove(wildcard),
        ]
    );
}

#[test]
fn dmx_packet_is_byte_exact() {
    let (mut node, wire) = recording_node();
    node.send_dmx(TARGET, &DmxBuffer::from_slice(&[0x10, 0x20]))
        .unwrap();

    let wire = wire.borrow();
    let (bytes, addr) = &wire.packets[0];
    assert_eq!(*addr, SocketAddr::from((TARGET, 6038)));
    assert_eq!(
        bytes.as_slice(),
        &[
            0x04, 0x01, 0xDC, 0x4A, // magic
            0x01, 0x00, // version
            0x01, 0x01, // DMX
            0x00, 0x00, 0x00, 0x00, // transaction
            0x00, 0x00, 0x00, 0x00, // port, flags, timer
            0xFF, 0xFF, 0xFF, 0xFF, // universe
            0x00, // start code
            0x10, 0x20,
        ]
    );
}

#[test]
fn port_out_packet_is_byte_exact() {
    let (mut node, wire) = recording_node();
    node.send_port_out(TARGET, 3, &DmxBuffer::from_slice(&[0xAA; 10]))
        .unwrap();

    let wire = wire.borrow();
    let bytes = &wire.packets[0].0;
    assert_eq!(
        &bytes[..HEADER_SIZE + 12],
        &[
            0x04, 0x01, 0xDC, 0x4A, 0x01, 0x00, 0x08, 0x01, 0x00, 0x00, 0x00, 0x00, // header
            0xFF, 0xFF, 0xFF, 0xFF, // universe
            0x03, // port
            0x00, 0x00, 0x00, // flags1, flags2
            0x00, 0x18, // regulated length
            0x00, 0x00, // start code
        ]
    );

    let body = &bytes[HEADER_SIZE + 12..];
    assert_eq!(body.len(), 24);
    assert_eq!(&body[..10], &[0xAA; 10]);
    assert_eq!(&body[10..], &[0u8; 14]);
}

#[test]
fn port_out_longer_than_minimum_is_unpadded() {
    let (mut node, wire) = recording_node();
    node.send_port_out(TARGET, 1, &DmxBuffer::from_slice(&[0x55; 30]))
        .unwrap();

    let wire = wire.borrow();
    let bytes = &wire.packets[0].0;
    let length_at = HEADER_SIZE + 8;
    assert_eq!(
        u16::from_be_bytes([bytes[length_at], bytes[length_at + 1]]),
        30
    );
    assert_eq!(bytes.len(), HEADER_SIZE + 12 + 30);
}

#[test]
fn full_universe_dmx_has_no_padding() {
    let (mut node, wire) = recording_node();
    let channels: Vec<u8> = (0..512u16).map(|i| (i % 251) as u8).collect();
    node.send_dmx(TARGET, &DmxBuffer::from_slice(&channels))
        .unwrap();

    let wire = wire.borrow();
    let payload = &wire.packets[0].0[HEADER_SIZE..];
    assert_eq!(payload.len(), 8 + 1 + 512);
    assert_eq!(&payload[9..], channels.as_slice());
}

#[test]
fn empty_buffer_emits_nothing_and_keeps_counter() {
    let (mut node, wire) = recording_node();
    let data = DmxBuffer::from_slice(&[1]);

    node.send_dmx(TARGET, &data).unwrap();
    node.send_dmx(TARGET, &DmxBuffer::new()).unwrap();
    node.send_port_out(TARGET, 0, &DmxBuffer::new()).unwrap();
    node.send_port_out(TARGET, 0, &data).unwrap();

    assert_eq!(transactions(&wire.borrow()), vec![0, 1]);
}

#[test]
fn counter_survives_restart() {
    let (mut node, wire) = recording_node();
    let data = DmxBuffer::from_slice(&[1, 2, 3]);

    node.start().unwrap();
    node.send_dmx(TARGET, &data).unwrap();
    node.send_dmx(TARGET, &data).unwrap();
    node.stop().unwrap();
    node.start().unwrap();
    node.send_port_out(TARGET, 2, &data).unwrap();

    assert_eq!(transactions(&wire.borrow()), vec![0, 1, 2]);
}

#[test]
fn counter_wraps_at_u32_max() {
    let config = NodeConfig {
        initial_transaction: u32::MAX,
        ..NodeConfig::default()
    };
    let socket = RecordingSocket::default();
    let wire = Rc::clone(&socket.wire);
    let mut node = Node::with_config(config, socket, RecordingLoop::default());
    let data = DmxBuffer::from_slice(&[7]);

    node.send_dmx(TARGET, &data).unwrap();
    node.send_port_out(TARGET, 1, &data).unwrap();

    assert_eq!(transactions(&wire.borrow()), vec![u32::MAX, 0]);
}

#[test]
fn transmit_failure_is_reported_and_not_retried() {
    let (mut node, wire) = recording_node();
    wire.borrow_mut().fail_sends = true;

    let result = node.send_dmx(TARGET, &DmxBuffer::from_slice(&[1, 2, 3]));
    assert!(matches!(result, Err(Error::Send(_))));
    assert_eq!(node.stats().send_failures, 1);

    wire.borrow_mut().fail_sends = false;
    node.send_dmx(TARGET, &DmxBuffer::from_slice(&[4])).unwrap();

    let wire = wire.borrow();
    assert_eq!(wire.packets.len(), 1);
    // the failed packet still consumed transaction 0
    assert_eq!(transactions(&wire), vec![1]);
    assert_eq!(wire.packets[0].0.len(), HEADER_SIZE + 8 + 1 + 1);
}

#[test]
fn loopback_node_sends_and_discards_inbound() {
    let loopback: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let mut receiver = UdpBinding::new().with_nonblocking(false);
    receiver.bind(loopback).unwrap();
    let receiver_addr = receiver.local_addr().unwrap();

    let config = NodeConfig {
        bind_addr: loopback,
        target_port: receiver_addr.port(),
        ..NodeConfig::default()
    };
    let mut node = Node::with_config(
        config,
        UdpBinding::new().with_nonblocking(false),
        kinet::NoReadiness,
    );
    node.start().unwrap();
    let node_addr = node.local_addr().unwrap();

    node.send_port_out(Ipv4Addr::LOCALHOST, 4, &DmxBuffer::from_slice(&[9; 5]))
        .unwrap();

    let mut buf = [0u8; 1500];
    let (len, from) = receiver.recv_from(&mut buf).unwrap();
    assert_eq!(from, node_addr);
    assert_eq!(len, HEADER_SIZE + 12 + 24);
    let header = PacketHeader::from_bytes(&buf[..len]).unwrap();
    assert_eq!(header.message_type(), Some(MessageType::PortOut));

    receiver.send_to(b"status?", node_addr).unwrap();
    node.socket_ready();
    assert_eq!(node.stats().discarded_datagrams, 1);
    assert_eq!(node.stats().packets_sent, 1);
}

proptest! {
    /// Property: any mix of sends yields consecutive transaction numbers
    #[test]
    fn prop_mixed_sends_number_consecutively(
        start in any::<u32>(),
        sends in prop::collection::vec((any::<bool>(), any::<u8>(), 1usize..=512), 1..40),
    ) {
        let config = NodeConfig { initial_transaction: start, ..NodeConfig::default() };
        let socket = RecordingSocket::default();
        let wire = Rc::clone(&socket.wire);
        let mut node = Node::with_config(config, socket, RecordingLoop::default());

        for (dmx, port, len) in &sends {
            let data = DmxBuffer::from_slice(&vec![*port; *len]);
            if *dmx {
                node.send_dmx(TARGET, &data).unwrap();
            } else {
                node.send_port_out(TARGET, *port, &data).unwrap();
            }
        }

        let seen = transactions(&wire.borrow());
        prop_assert_eq!(seen.len(), sends.len());
        for (i, transaction) in seen.iter().enumerate() {
            prop_assert_eq!(*transaction, start.wrapping_add(i as u32));
        }
    }
}
