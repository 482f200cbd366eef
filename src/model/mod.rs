//! USB data model types.

pub mod device;
pub mod endpoint;

pub use device::{AlternateSetting, DeviceReport, Interface};
pub use endpoint::{Direction, Endpoint, TransferType};
