//! Device presence monitoring.
//!
//! Combines an initial device snapshot with asynchronous connect and
//! disconnect events from the USB access layer. Connected/Disconnected
//! handlers run on whatever thread the access layer delivers them on and
//! may overlap with each other and with the initial snapshot pass, so
//! handlers must be safe to invoke concurrently. No ordering is
//! guaranteed between the snapshot and an event racing in right after
//! subscription; that is a contract of the access layer, not something
//! the monitor enforces.

use crate::backend::{BackendError, DeviceSource};
use crate::model::DeviceReport;
use std::io::BufRead;
use std::sync::Arc;
use std::sync::mpsc;
use thiserror::Error;

/// Errors that can occur while running the monitor.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("monitor cannot be restarted once stopped")]
    AlreadyStopped,
    #[error(transparent)]
    Source(#[from] BackendError),
}

/// A device presence event.
#[derive(Debug)]
pub enum MonitorEvent {
    /// Device was already attached when monitoring started.
    Present(DeviceReport),
    /// Device was connected while monitoring.
    Connected(DeviceReport),
    /// Device was disconnected while monitoring.
    Disconnected(DeviceReport),
}

impl MonitorEvent {
    /// Short label for event output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Present(_) => "Present",
            Self::Connected(_) => "Connected",
            Self::Disconnected(_) => "Disconnected",
        }
    }

    /// The device the event refers to.
    pub fn device(&self) -> &DeviceReport {
        match self {
            Self::Present(device) | Self::Connected(device) | Self::Disconnected(device) => device,
        }
    }
}

/// An external signal that ends monitoring.
///
/// `wait` blocks the monitor's calling thread only; event delivery
/// threads are unaffected.
pub trait StopSignal {
    fn wait(self);
}

/// Stop signal read as a single line from standard input.
#[derive(Debug, Default)]
pub struct LineInput {
    prompt: Option<String>,
}

impl LineInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print a prompt just before blocking on input.
    pub fn with_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
        }
    }
}

impl StopSignal for LineInput {
    fn wait(self) {
        if let Some(prompt) = self.prompt {
            println!("{}", prompt);
        }
        let mut line = String::new();
        let _ = std::io::stdin().lock().read_line(&mut line);
    }
}

/// Programmatic stop signal: fires when a message arrives or the sender
/// is dropped.
impl StopSignal for mpsc::Receiver<()> {
    fn wait(self) {
        let _ = self.recv();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MonitorState {
    NotStarted,
    Stopped,
}

/// Watches device arrival and removal through a [`DeviceSource`].
///
/// `start` registers the event subscriptions, synthesizes one
/// [`MonitorEvent::Present`] per already-attached device (in device-list
/// order), then blocks until the stop signal fires. A monitor runs once;
/// it cannot be restarted after stopping.
pub struct PresenceMonitor<S> {
    source: S,
    state: MonitorState,
}

impl<S: DeviceSource> PresenceMonitor<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: MonitorState::NotStarted,
        }
    }

    /// Run the monitor until the stop signal fires.
    ///
    /// The handler receives all three event kinds and may be invoked
    /// concurrently from multiple threads.
    pub fn start<F, T>(&mut self, handler: F, stop: T) -> Result<(), MonitorError>
    where
        F: Fn(MonitorEvent) + Send + Sync + 'static,
        T: StopSignal,
    {
        if self.state != MonitorState::NotStarted {
            return Err(MonitorError::AlreadyStopped);
        }

        let handler = Arc::new(handler);

        let connected = Arc::clone(&handler);
        self.source.subscribe_connected(Box::new(move |device| {
            connected(MonitorEvent::Connected(device));
        }));

        let disconnected = Arc::clone(&handler);
        self.source.subscribe_disconnected(Box::new(move |device| {
            disconnected(MonitorEvent::Disconnected(device));
        }));

        // Snapshot pass: report devices attached before subscription.
        for device in self.source.devices()? {
            handler(MonitorEvent::Present(device));
        }

        stop.wait();
        self.state = MonitorState::Stopped;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::EventHandler;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Test double for the USB access layer: fixed device list, handlers
    /// captured so tests can fire events.
    #[derive(Default)]
    struct FakeSource {
        devices: Vec<DeviceReport>,
        connected: Arc<Mutex<Option<EventHandler>>>,
        disconnected: Arc<Mutex<Option<EventHandler>>>,
    }

    impl DeviceSource for FakeSource {
        fn devices(&self) -> Result<Vec<DeviceReport>, BackendError> {
            Ok(self.devices.clone())
        }

        fn subscribe_connected(&self, handler: EventHandler) {
            *self.connected.lock().unwrap() = Some(handler);
        }

        fn subscribe_disconnected(&self, handler: EventHandler) {
            *self.disconnected.lock().unwrap() = Some(handler);
        }
    }

    fn device(vendor_id: u16) -> DeviceReport {
        DeviceReport {
            vendor_id,
            product_id: 0x0001,
            ..Default::default()
        }
    }

    fn stop_now() -> mpsc::Receiver<()> {
        let (sender, receiver) = mpsc::channel();
        sender.send(()).unwrap();
        receiver
    }

    #[test]
    fn test_no_devices_no_events() {
        let mut monitor = PresenceMonitor::new(FakeSource::default());
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        monitor
            .start(
                move |_| {
                    seen.fetch_add(1, Ordering::SeqCst);
                },
                stop_now(),
            )
            .unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_present_snapshot_in_device_order() {
        let source = FakeSource {
            devices: vec![device(0x0001), device(0x0002)],
            ..Default::default()
        };
        let mut monitor = PresenceMonitor::new(source);
        let events: Arc<Mutex<Vec<(String, u16)>>> = Arc::default();
        let sink = Arc::clone(&events);
        monitor
            .start(
                move |event| {
                    sink.lock()
                        .unwrap()
                        .push((event.label().to_string(), event.device().vendor_id));
                },
                stop_now(),
            )
            .unwrap();
        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                ("Present".to_string(), 0x0001),
                ("Present".to_string(), 0x0002)
            ]
        );
    }

    #[test]
    fn test_connect_and_disconnect_events_dispatched() {
        let connected = Arc::new(Mutex::new(None));
        let disconnected = Arc::new(Mutex::new(None));
        let source = FakeSource {
            devices: Vec::new(),
            connected: Arc::clone(&connected),
            disconnected: Arc::clone(&disconnected),
        };

        let events: Arc<Mutex<Vec<String>>> = Arc::default();
        let sink = Arc::clone(&events);

        // Hold the monitor open while events fire, then release it.
        let (stop_sender, stop_receiver) = mpsc::channel();
        let fired = std::thread::spawn(move || {
            // Wait until both handlers are registered.
            loop {
                if connected.lock().unwrap().is_some() && disconnected.lock().unwrap().is_some() {
                    break;
                }
                std::thread::yield_now();
            }
            (connected.lock().unwrap().as_ref().unwrap())(device(0x1111));
            (disconnected.lock().unwrap().as_ref().unwrap())(device(0x1111));
            stop_sender.send(()).unwrap();
        });

        let mut monitor = PresenceMonitor::new(source);
        monitor
            .start(
                move |event| {
                    sink.lock()
                        .unwrap()
                        .push(format!("{}:{:04x}", event.label(), event.device().vendor_id));
                },
                stop_receiver,
            )
            .unwrap();
        fired.join().unwrap();

        let events = events.lock().unwrap();
        assert!(events.contains(&"Connected:1111".to_string()));
        assert!(events.contains(&"Disconnected:1111".to_string()));
    }

    #[test]
    fn test_monitor_cannot_restart() {
        let mut monitor = PresenceMonitor::new(FakeSource::default());
        monitor.start(|_| {}, stop_now()).unwrap();
        assert!(matches!(
            monitor.start(|_| {}, stop_now()),
            Err(MonitorError::AlreadyStopped)
        ));
    }

    #[test]
    fn test_event_labels() {
        assert_eq!(MonitorEvent::Present(device(1)).label(), "Present");
        assert_eq!(MonitorEvent::Connected(device(1)).label(), "Connected");
        assert_eq!(MonitorEvent::Disconnected(device(1)).label(), "Disconnected");
    }
}
