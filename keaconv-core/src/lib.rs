//! keaconv Core Library
//!
//! This crate provides the building blocks shared by the ISC DHCP to Kea
//! translator: the annotated element tree, the option and option space
//! registry, translator settings and error handling.

pub mod config;
pub mod element;
pub mod error;
pub mod options;

pub use element::{Element, Map, Value};
pub use error::{Error, Result};
pub use options::{OptionDescriptor, OptionRegistry, OptionStatus, Space};

/// keaconv version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
