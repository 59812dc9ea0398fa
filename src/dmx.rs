//! DMX512 channel buffer.

use std::fmt;

/// Number of channel slots in one DMX512 universe.
pub const DMX_UNIVERSE_SIZE: usize = 512;

/// Up to 512 channel values for one universe.
///
/// The buffer holds only the slots that have been set; a freshly created
/// buffer is empty and a node will not transmit it.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct DmxBuffer {
    data: Vec<u8>,
}

impl DmxBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Vec::with_capacity(DMX_UNIVERSE_SIZE),
        }
    }

    /// Create a buffer from raw channel values, keeping at most 512 of them.
    #[must_use]
    pub fn from_slice(channels: &[u8]) -> Self {
        let len = channels.len().min(DMX_UNIVERSE_SIZE);
        let mut data = Vec::with_capacity(DMX_UNIVERSE_SIZE);
        data.extend_from_slice(&channels[..len]);
        Self { data }
    }

    /// Set a single zero-based channel, growing the buffer with zeros if needed.
    ///
    /// Returns `false` if `channel` is outside the universe.
    pub fn set_channel(&mut self, channel: usize, value: u8) -> bool {
        if channel >= DMX_UNIVERSE_SIZE {
            return false;
        }
        if channel >= self.data.len() {
            self.data.resize(channel + 1, 0);
        }
        self.data[channel] = value;
        true
    }

    /// Get a single zero-based channel.
    #[must_use]
    pub fn get_channel(&self, channel: usize) -> Option<u8> {
        self.data.get(channel).copied()
    }

    /// Number of channels held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check whether the buffer holds no channels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw channel values.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Drop every channel.
    pub fn clear(&mut self) {
        self.data.clear();
    }
}

impl AsRef<[u8]> for DmxBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<&[u8]> for DmxBuffer {
    fn from(channels: &[u8]) -> Self {
        Self::from_slice(channels)
    }
}

impl fmt::Debug for DmxBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DmxBuffer")
            .field("len", &self.data.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_truncates() {
        let buffer = DmxBuffer::from_slice(&[7u8; 600]);
        assert_eq!(buffer.len(), DMX_UNIVERSE_SIZE);
    }

    #[test]
    fn test_set_channel_grows() {
        let mut buffer = DmxBuffer::new();
        assert!(buffer.is_empty());
        assert!(buffer.set_channel(4, 255));

        assert_eq!(buffer.as_slice(), &[0, 0, 0, 0, 255]);
        assert_eq!(buffer.get_channel(4), Some(255));
        assert_eq!(buffer.get_channel(5), None);
    }

    #[test]
    fn test_set_channel_out_of_range() {
        let mut buffer = DmxBuffer::new();
        assert!(!buffer.set_channel(DMX_UNIVERSE_SIZE, 1));
        assert!(buffer.is_empty());
    }
}
