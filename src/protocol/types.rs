//! KiNet message types

use std::fmt;

/// KiNet message types emitted by a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum MessageType {
    /// Whole-universe channel data
    Dmx = 0x0101,
    /// Channel data for one output port of a controller
    PortOut = 0x0801,
}

impl MessageType {
    /// Convert from the wire code
    #[must_use]
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x0101 => Some(Self::Dmx),
            0x0801 => Some(Self::PortOut),
            _ => None,
        }
    }

    /// Convert to the wire code
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Dmx => "DMX",
            Self::PortOut => "PORTOUT",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_codes() {
        assert_eq!(MessageType::Dmx.as_u16(), 0x0101);
        assert_eq!(MessageType::PortOut.as_u16(), 0x0801);
        assert_eq!(MessageType::from_u16(0x0801), Some(MessageType::PortOut));
        assert_eq!(MessageType::from_u16(0x0201), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(MessageType::Dmx.to_string(), "DMX");
        assert_eq!(MessageType::PortOut.to_string(), "PORTOUT");
    }
}
