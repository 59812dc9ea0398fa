//! KiNet packet header
//!
//! Every outgoing packet starts with the same 12 bytes.

use bytes::BufMut;

use super::{Error, HEADER_SIZE, MAGIC_NUMBER, MessageType, Result, TransactionNumber, VERSION_ONE};

/// KiNet packet header (12 bytes)
///
/// # Wire Format
///
/// ```text
/// 0                   1                   2                   3
/// 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                        Magic Number (4)                       |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |          Version (2)          |        Message Type (2)       |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                    Transaction Number (4)                     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// All fields are big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    magic: u32,
    version: u16,
    msg_type: u16,
    transaction: u32,
}

impl PacketHeader {
    /// Create a new packet header
    #[must_use]
    pub fn new(msg_type: MessageType, transaction: u32) -> Self {
        Self {
            magic: MAGIC_NUMBER,
            version: VERSION_ONE,
            msg_type: msg_type.as_u16(),
            transaction,
        }
    }

    /// Get magic number
    #[must_use]
    pub const fn magic(&self) -> u32 {
        self.magic
    }

    /// Get protocol version
    #[must_use]
    pub const fn version(&self) -> u16 {
        self.version
    }

    /// Get message type
    #[must_use]
    pub fn message_type(&self) -> Option<MessageType> {
        MessageType::from_u16(self.msg_type)
    }

    /// Get transaction number
    #[must_use]
    pub const fn transaction(&self) -> u32 {
        self.transaction
    }

    /// Append the header to `buf`.
    pub fn put<B: BufMut>(&self, buf: &mut B) {
        buf.put_u32(self.magic);
        buf.put_u16(self.version);
        buf.put_u16(self.msg_type);
        buf.put_u32(self.transaction);
    }

    /// Convert to bytes (big-endian)
    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        self.put(&mut &mut bytes[..]);
        bytes
    }

    /// Parse from bytes (big-endian)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(Error::BufferTooSmall {
                needed: HEADER_SIZE,
                got: bytes.len(),
            });
        }

        let magic = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if magic != MAGIC_NUMBER {
            return Err(Error::InvalidMagic { found: magic });
        }

        let version = u16::from_be_bytes([bytes[4], bytes[5]]);
        if version != VERSION_ONE {
            return Err(Error::InvalidVersion { found: version });
        }

        let msg_type = u16::from_be_bytes([bytes[6], bytes[7]]);
        if MessageType::from_u16(msg_type).is_none() {
            return Err(Error::InvalidMessageType {
                type_code: msg_type,
            });
        }

        Ok(Self {
            magic,
            version,
            msg_type,
            transaction: u32::from_be_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
        })
    }
}

/// Append a header for `msg_type` to `buf`, consuming one transaction number.
///
/// Returns the transaction number written.
pub fn write_header<B: BufMut>(
    buf: &mut B,
    msg_type: MessageType,
    transactions: &mut TransactionNumber,
) -> u32 {
    let transaction = transactions.next();
    PacketHeader::new(msg_type, transaction).put(buf);
    transaction
}
