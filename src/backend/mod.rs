//! USB access layer.
//!
//! [`DeviceSource`] is the surface the rest of the crate consumes: an
//! ordered device enumeration plus fire-and-forget connect/disconnect
//! subscriptions. Event handlers are invoked on whatever thread the
//! underlying library delivers events on, possibly concurrently.

mod libusb;

pub use libusb::UsbBackend;

use crate::model::DeviceReport;
use thiserror::Error;

/// Callback receiving one device per connect or disconnect event.
pub type EventHandler = Box<dyn Fn(DeviceReport) + Send + Sync>;

/// Errors from the USB access layer.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("USB error: {0}")]
    Usb(#[from] rusb::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A source of USB devices and presence events.
pub trait DeviceSource {
    /// Enumerate currently attached devices, in bus order.
    fn devices(&self) -> Result<Vec<DeviceReport>, BackendError>;

    /// Register the connect event handler. Replaces any previous one.
    fn subscribe_connected(&self, handler: EventHandler);

    /// Register the disconnect event handler. Replaces any previous one.
    fn subscribe_disconnected(&self, handler: EventHandler);
}
