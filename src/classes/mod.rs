//! USB class code registry.

mod data;
pub mod registry;

pub use registry::{ClassDataError, ClassRegistry};
