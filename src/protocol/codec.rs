//! KiNet payload encoders
//!
//! Both encoders append to a caller-owned buffer that already holds a
//! [`PacketHeader`](super::PacketHeader). Empty channel data writes nothing.

use bytes::BufMut;

use super::{
    BROADCAST_UNIVERSE, DMX_PREFIX_SIZE, DMX512_START_CODE, Error, MAX_PAYLOAD_SIZE,
    PORTOUT_MIN_BUFFER_SIZE, PORTOUT_PREFIX_SIZE, Result,
};

/// Reject channel data a single packet cannot describe.
pub(crate) fn check_payload_len(len: usize) -> Result<()> {
    if len > MAX_PAYLOAD_SIZE {
        return Err(Error::PayloadTooLarge {
            len,
            max: MAX_PAYLOAD_SIZE,
        });
    }
    Ok(())
}

/// Length declared in a PORTOUT packet for `len` channel bytes.
///
/// Never smaller than the protocol minimum of 24, even if fewer bytes follow.
#[must_use]
pub fn regulated_length(len: u16) -> u16 {
    len.max(PORTOUT_MIN_BUFFER_SIZE)
}

/// Append a DMX payload.
///
/// # Format
///
/// ```text
/// [PORT (1)=0] [FLAGS (1)=0] [TIMER (2)=0] [UNIVERSE (4)=0xFFFFFFFF]
/// [START CODE (1)] [CHANNELS (variable, unpadded)]
/// ```
///
/// Returns the number of payload bytes written, zero when `channels` is empty.
pub fn encode_dmx<B: BufMut>(buf: &mut B, channels: &[u8]) -> Result<usize> {
    const PORT: u8 = 0;
    const FLAGS: u8 = 0;
    const TIMER: u16 = 0;

    if channels.is_empty() {
        return Ok(0);
    }
    check_payload_len(channels.len())?;

    buf.put_u8(PORT);
    buf.put_u8(FLAGS);
    buf.put_u16(TIMER);
    buf.put_u32(BROADCAST_UNIVERSE);
    buf.put_u8(DMX512_START_CODE);
    buf.put_slice(channels);

    Ok(DMX_PREFIX_SIZE + 1 + channels.len())
}

/// Append a PORTOUT payload addressed to `port`.
///
/// # Format
///
/// ```text
/// [UNIVERSE (4)=0xFFFFFFFF] [PORT (1)] [FLAGS1 (1)=0] [FLAGS2 (2)=0]
/// [LENGTH (2)=max(len, 24)] [START CODE (2)] [CHANNELS] [ZERO PAD to 24]
/// ```
///
/// The start code is 16 bits wide here, unlike the DMX payload.
///
/// Returns the number of payload bytes written, zero when `channels` is empty.
pub fn encode_port_out<B: BufMut>(buf: &mut B, port: u8, channels: &[u8]) -> Result<usize> {
    const FLAGS1: u8 = 0;
    const FLAGS2: u16 = 0;

    if channels.is_empty() {
        return Ok(0);
    }
    check_payload_len(channels.len())?;

    #[allow(clippy::cast_possible_truncation)]
    let len = channels.len() as u16;
    let declared = regulated_length(len);

    buf.put_u32(BROADCAST_UNIVERSE);
    buf.put_u8(port);
    buf.put_u8(FLAGS1);
    buf.put_u16(FLAGS2);
    buf.put_u16(declared);
    buf.put_u16(u16::from(DMX512_START_CODE));
    buf.put_slice(channels);
    buf.put_bytes(0, usize::from(declared - len));

    Ok(PORTOUT_PREFIX_SIZE + usize::from(declared))
}
