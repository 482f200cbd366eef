//! libusb-backed device source.
//!
//! Wraps rusb for enumeration and hotplug events. String descriptors and
//! raw descriptor bytes are read through a temporary open; failures
//! there (typically permissions) degrade to absent strings and empty
//! dumps rather than errors.

use super::{BackendError, DeviceSource, EventHandler};
use crate::model::{AlternateSetting, DeviceReport, Endpoint, Interface};
use rusb::constants::{LIBUSB_DT_CONFIG, LIBUSB_DT_DEVICE, LIBUSB_REQUEST_GET_DESCRIPTOR};
use rusb::{
    ConfigDescriptor, Context, Device, DeviceHandle, Hotplug, HotplugBuilder, Registration,
    UsbContext,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, warn};

const DESCRIPTOR_TIMEOUT: Duration = Duration::from_millis(500);
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Default)]
struct Handlers {
    connected: Mutex<Option<EventHandler>>,
    disconnected: Mutex<Option<EventHandler>>,
}

/// Device source backed by libusb.
///
/// Hotplug callbacks are dispatched from a background thread pumping
/// libusb events. On platforms without hotplug support the source still
/// enumerates but never delivers events.
pub struct UsbBackend {
    context: Context,
    handlers: Arc<Handlers>,
    registration: Option<Registration<Context>>,
    shutdown: Arc<AtomicBool>,
    event_thread: Option<JoinHandle<()>>,
}

impl UsbBackend {
    pub fn new() -> Result<Self, BackendError> {
        let context = Context::new()?;
        let handlers = Arc::new(Handlers::default());
        let shutdown = Arc::new(AtomicBool::new(false));

        let (registration, event_thread) = if rusb::has_hotplug() {
            let dispatcher = HotplugDispatcher {
                handlers: Arc::clone(&handlers),
            };
            let registration = HotplugBuilder::new()
                .enumerate(false)
                .register(&context, Box::new(dispatcher))?;

            let pump_context = context.clone();
            let pump_shutdown = Arc::clone(&shutdown);
            let thread = std::thread::Builder::new()
                .name("usb-events".to_string())
                .spawn(move || {
                    while !pump_shutdown.load(Ordering::Acquire) {
                        if let Err(e) = pump_context.handle_events(Some(EVENT_POLL_INTERVAL)) {
                            warn!("USB event loop terminated: {}", e);
                            break;
                        }
                    }
                })?;
            (Some(registration), Some(thread))
        } else {
            warn!("hotplug not supported by this libusb build; no connect/disconnect events");
            (None, None)
        };

        Ok(Self {
            context,
            handlers,
            registration,
            shutdown,
            event_thread,
        })
    }
}

impl Drop for UsbBackend {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        // Deregistering wakes handle_events, letting the pump exit early.
        drop(self.registration.take());
        if let Some(thread) = self.event_thread.take() {
            let _ = thread.join();
        }
    }
}

impl DeviceSource for UsbBackend {
    fn devices(&self) -> Result<Vec<DeviceReport>, BackendError> {
        let mut reports = Vec::new();
        for device in self.context.devices()?.iter() {
            match describe_device(&device) {
                Ok(report) => reports.push(report),
                Err(e) => warn!(
                    "skipping device at bus {} address {}: {}",
                    device.bus_number(),
                    device.address(),
                    e
                ),
            }
        }
        Ok(reports)
    }

    fn subscribe_connected(&self, handler: EventHandler) {
        *self.handlers.connected.lock().unwrap() = Some(handler);
    }

    fn subscribe_disconnected(&self, handler: EventHandler) {
        *self.handlers.disconnected.lock().unwrap() = Some(handler);
    }
}

/// Routes libusb hotplug callbacks to the registered handlers.
struct HotplugDispatcher {
    handlers: Arc<Handlers>,
}

impl HotplugDispatcher {
    fn dispatch<T: UsbContext>(&self, slot: &Mutex<Option<EventHandler>>, device: Device<T>) {
        match describe_device(&device) {
            Ok(report) => {
                if let Some(handler) = slot.lock().unwrap().as_ref() {
                    handler(report);
                }
            }
            Err(e) => warn!(
                "ignoring hotplug event for bus {} address {}: {}",
                device.bus_number(),
                device.address(),
                e
            ),
        }
    }
}

impl<T: UsbContext> Hotplug<T> for HotplugDispatcher {
    fn device_arrived(&mut self, device: Device<T>) {
        debug!(
            "device arrived: bus {} address {}",
            device.bus_number(),
            device.address()
        );
        self.dispatch(&self.handlers.connected, device);
    }

    fn device_left(&mut self, device: Device<T>) {
        debug!(
            "device left: bus {} address {}",
            device.bus_number(),
            device.address()
        );
        self.dispatch(&self.handlers.disconnected, device);
    }
}

/// Build a [`DeviceReport`] from a libusb device.
///
/// Only a missing device descriptor is fatal; everything else (strings,
/// configuration, raw bytes) is best effort. A device that has already
/// left the bus still reports its cached device descriptor fields.
fn describe_device<T: UsbContext>(device: &Device<T>) -> Result<DeviceReport, rusb::Error> {
    let descriptor = device.device_descriptor()?;
    let handle = device.open().ok();

    let (manufacturer, product, serial) = match &handle {
        Some(handle) => (
            handle.read_manufacturer_string_ascii(&descriptor).ok(),
            handle.read_product_string_ascii(&descriptor).ok(),
            handle.read_serial_number_string_ascii(&descriptor).ok(),
        ),
        None => (None, None, None),
    };

    let config = device.active_config_descriptor().ok();
    let interfaces = config.as_ref().map(map_interfaces).unwrap_or_default();

    let device_descriptor = handle
        .as_ref()
        .and_then(|handle| read_raw_descriptor(handle, LIBUSB_DT_DEVICE).ok())
        .unwrap_or_default();
    let config_descriptor = handle
        .as_ref()
        .and_then(|handle| read_raw_descriptor(handle, LIBUSB_DT_CONFIG).ok())
        .unwrap_or_default();

    Ok(DeviceReport {
        vendor_id: descriptor.vendor_id(),
        product_id: descriptor.product_id(),
        manufacturer,
        product,
        serial,
        class_code: descriptor.class_code(),
        subclass_code: descriptor.sub_class_code(),
        protocol_code: descriptor.protocol_code(),
        interfaces,
        device_descriptor,
        config_descriptor,
    })
}

/// Map the active configuration's interface tree into the model.
///
/// The first listed setting of each interface is reported as active;
/// libusb does not track alternate switches made by other drivers.
fn map_interfaces(config: &ConfigDescriptor) -> Vec<Interface> {
    config
        .interfaces()
        .map(|interface| {
            let alternates: Vec<AlternateSetting> = interface
                .descriptors()
                .map(|alt| AlternateSetting {
                    number: alt.setting_number(),
                    class_code: alt.class_code(),
                    subclass_code: alt.sub_class_code(),
                    protocol_code: alt.protocol_code(),
                    endpoints: alt
                        .endpoint_descriptors()
                        .map(|endpoint| Endpoint {
                            number: endpoint.number(),
                            direction: endpoint.direction().into(),
                            transfer_type: endpoint.transfer_type().into(),
                            max_packet_size: endpoint.max_packet_size(),
                        })
                        .collect(),
                })
                .collect();

            Interface {
                number: interface.number(),
                active_alternate: alternates.first().map(|alt| alt.number).unwrap_or(0),
                alternates,
            }
        })
        .collect()
}

/// Read a raw descriptor via a standard GET_DESCRIPTOR control request.
fn read_raw_descriptor<T: UsbContext>(
    handle: &DeviceHandle<T>,
    descriptor_type: u8,
) -> rusb::Result<Vec<u8>> {
    let request_type = rusb::request_type(
        rusb::Direction::In,
        rusb::RequestType::Standard,
        rusb::Recipient::Device,
    );
    let mut buf = vec![0u8; 4096];
    let len = handle.read_control(
        request_type,
        LIBUSB_REQUEST_GET_DESCRIPTOR,
        (descriptor_type as u16) << 8,
        0,
        &mut buf,
        DESCRIPTOR_TIMEOUT,
    )?;
    buf.truncate(len);
    Ok(buf)
}
