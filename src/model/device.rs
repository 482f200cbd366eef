//! USB device tree model.
//!
//! A read-only mirror of the descriptor tree supplied by the USB access
//! layer: device, interfaces, alternate settings, endpoints, plus the
//! raw device and configuration descriptor bytes exactly as retrieved.

use super::endpoint::Endpoint;
use std::fmt;

/// One alternate setting of an interface.
#[derive(Debug, Clone)]
pub struct AlternateSetting {
    /// Alternate setting number.
    pub number: u8,
    /// Interface class code (bInterfaceClass).
    pub class_code: u8,
    /// Interface subclass code (bInterfaceSubClass).
    pub subclass_code: u8,
    /// Interface protocol code (bInterfaceProtocol).
    pub protocol_code: u8,
    /// Endpoints, in descriptor order.
    pub endpoints: Vec<Endpoint>,
}

/// A USB interface with its alternate settings.
#[derive(Debug, Clone)]
pub struct Interface {
    /// Interface number.
    pub number: u8,
    /// Setting number of the currently active alternate.
    pub active_alternate: u8,
    /// Alternate settings, in descriptor order.
    pub alternates: Vec<AlternateSetting>,
}

impl Interface {
    /// Whether the given alternate is the currently active one.
    ///
    /// Compared by setting number, not by identity.
    pub fn is_active(&self, alternate: &AlternateSetting) -> bool {
        alternate.number == self.active_alternate
    }
}

/// A connected USB device as reported by the USB access layer.
#[derive(Debug, Clone, Default)]
pub struct DeviceReport {
    /// Vendor ID.
    pub vendor_id: u16,
    /// Product ID.
    pub product_id: u16,
    /// Manufacturer string, if the device provides one.
    pub manufacturer: Option<String>,
    /// Product string, if the device provides one.
    pub product: Option<String>,
    /// Serial number string, if the device provides one.
    pub serial: Option<String>,
    /// Device class code (bDeviceClass).
    pub class_code: u8,
    /// Device subclass code (bDeviceSubClass).
    pub subclass_code: u8,
    /// Device protocol code (bDeviceProtocol).
    pub protocol_code: u8,
    /// Interfaces of the active configuration, in descriptor order.
    pub interfaces: Vec<Interface>,
    /// Raw device descriptor bytes, as retrieved from the device.
    pub device_descriptor: Vec<u8>,
    /// Raw configuration descriptor bytes, as retrieved from the device.
    pub config_descriptor: Vec<u8>,
}

impl fmt::Display for DeviceReport {
    /// One-line summary, used for monitor event output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "USB device {:04x}:{:04x}", self.vendor_id, self.product_id)?;
        match (&self.manufacturer, &self.product) {
            (Some(manufacturer), Some(product)) => {
                write!(f, " ({} {})", manufacturer, product)
            }
            (_, Some(product)) => write!(f, " ({})", product),
            (Some(manufacturer), None) => write!(f, " ({})", manufacturer),
            (None, None) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alternate(number: u8) -> AlternateSetting {
        AlternateSetting {
            number,
            class_code: 0,
            subclass_code: 0,
            protocol_code: 0,
            endpoints: Vec::new(),
        }
    }

    #[test]
    fn test_active_alternate_compared_by_number() {
        let interface = Interface {
            number: 0,
            active_alternate: 1,
            alternates: vec![alternate(0), alternate(1)],
        };
        assert!(!interface.is_active(&interface.alternates[0]));
        assert!(interface.is_active(&interface.alternates[1]));
        // A value-equal alternate built elsewhere also matches.
        assert!(interface.is_active(&alternate(1)));
    }

    #[test]
    fn test_display_summary() {
        let mut device = DeviceReport {
            vendor_id: 0x046d,
            product_id: 0xc52b,
            ..Default::default()
        };
        assert_eq!(device.to_string(), "USB device 046d:c52b");

        device.product = Some("Unifying Receiver".to_string());
        assert_eq!(
            device.to_string(),
            "USB device 046d:c52b (Unifying Receiver)"
        );

        device.manufacturer = Some("Logitech".to_string());
        assert_eq!(
            device.to_string(),
            "USB device 046d:c52b (Logitech Unifying Receiver)"
        );
    }
}
