//! USB Device Enumeration and Monitoring Tool
//!
//! A library and CLI tool for reporting connected USB devices, resolving
//! class/subclass/protocol codes to names, and monitoring device
//! arrival and removal.

pub mod backend;
pub mod classes;
pub mod config;
pub mod model;
pub mod monitor;
pub mod report;

pub use backend::{DeviceSource, UsbBackend};
pub use classes::ClassRegistry;
pub use config::Config;
pub use model::{DeviceReport, Direction, Endpoint, Interface, TransferType};
pub use monitor::{MonitorEvent, PresenceMonitor};
pub use report::DescriptorReporter;
