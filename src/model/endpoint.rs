//! USB endpoint model.

use std::fmt;

/// USB transfer types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferType {
    Control,
    Isochronous,
    Bulk,
    Interrupt,
}

impl fmt::Display for TransferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Control => "Control",
            Self::Isochronous => "Isochronous",
            Self::Bulk => "Bulk",
            Self::Interrupt => "Interrupt",
        };
        write!(f, "{}", name)
    }
}

impl From<rusb::TransferType> for TransferType {
    fn from(value: rusb::TransferType) -> Self {
        match value {
            rusb::TransferType::Control => Self::Control,
            rusb::TransferType::Isochronous => Self::Isochronous,
            rusb::TransferType::Bulk => Self::Bulk,
            rusb::TransferType::Interrupt => Self::Interrupt,
        }
    }
}

/// Endpoint direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::In => write!(f, "IN"),
            Self::Out => write!(f, "OUT"),
        }
    }
}

impl From<rusb::Direction> for Direction {
    fn from(value: rusb::Direction) -> Self {
        match value {
            rusb::Direction::In => Self::In,
            rusb::Direction::Out => Self::Out,
        }
    }
}

/// A USB endpoint as reported by the device's configuration descriptor.
#[derive(Debug, Clone)]
pub struct Endpoint {
    /// Endpoint number (address without the direction bit).
    pub number: u8,
    /// Direction.
    pub direction: Direction,
    /// Transfer type.
    pub transfer_type: TransferType,
    /// Maximum packet size in bytes (from wMaxPacketSize).
    pub max_packet_size: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_display() {
        assert_eq!(Direction::In.to_string(), "IN");
        assert_eq!(Direction::Out.to_string(), "OUT");
    }

    #[test]
    fn test_transfer_type_display() {
        assert_eq!(TransferType::Control.to_string(), "Control");
        assert_eq!(TransferType::Isochronous.to_string(), "Isochronous");
        assert_eq!(TransferType::Bulk.to_string(), "Bulk");
        assert_eq!(TransferType::Interrupt.to_string(), "Interrupt");
    }

    #[test]
    fn test_rusb_conversions() {
        assert_eq!(Direction::from(rusb::Direction::In), Direction::In);
        assert_eq!(
            TransferType::from(rusb::TransferType::Interrupt),
            TransferType::Interrupt
        );
    }
}
