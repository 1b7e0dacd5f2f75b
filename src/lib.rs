//! Analog input driver for ADCs exposed through the Linux IIO sysfs interface,
//! plus a small sampling daemon built on it.

pub mod aio;
pub mod config;
pub mod data_models;
pub mod error;
pub mod output;
pub mod pinmap;
pub mod sampler;
pub mod sampler_types;
pub mod utils;

pub use aio::AnalogInput;
pub use config::{AioConfig, DaemonConfig};
pub use error::{AioError, MapError, ParseError, Result};
pub use pinmap::{ChannelMapper, StaticPinMap};
