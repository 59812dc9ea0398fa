//! KiNet protocol core implementation
//!
//! This module provides the wire format, message types, transaction numbering
//! and payload encoders for KiNet.

mod codec;
mod error;
mod header;
mod sequence;
mod types;

pub(crate) use codec::check_payload_len;
pub use codec::{encode_dmx, encode_port_out, regulated_length};
pub use error::{Error, Result};
pub use header::{PacketHeader, write_header};
pub use sequence::TransactionNumber;
pub use types::MessageType;

/// KiNet magic number
pub const MAGIC_NUMBER: u32 = 0x0401_DC4A;

/// Protocol version one
pub const VERSION_ONE: u16 = 0x0100;

/// Well-known KiNet UDP port
pub const KINET_PORT: u16 = 6038;

/// Header size in bytes
pub const HEADER_SIZE: usize = 12;

/// Universe marker addressing every universe on the receiver
pub const BROADCAST_UNIVERSE: u32 = 0xFFFF_FFFF;

/// Start code for standard DMX512 dimmer data
pub const DMX512_START_CODE: u8 = 0x00;

/// PORTOUT payloads are never declared or sent shorter than this
pub const PORTOUT_MIN_BUFFER_SIZE: u16 = 24;

/// Largest channel payload the PORTOUT length field can describe
pub const MAX_PAYLOAD_SIZE: usize = u16::MAX as usize;

/// Fixed DMX payload prefix: port, flags, timer, universe
pub const DMX_PREFIX_SIZE: usize = 8;

/// Fixed PORTOUT payload prefix: universe, port, flags1, flags2, length, start code
pub const PORTOUT_PREFIX_SIZE: usize = 12;
