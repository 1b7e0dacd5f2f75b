use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AioError, Result};

pub const DEFAULT_DEVICE_DIR: &str = "/sys/bus/iio/devices/iio:device0";
pub const DEFAULT_RAW_RESOLUTION_BITS: u8 = 12;
pub const DEFAULT_SUPPORTED_RESOLUTION_BITS: u8 = 10;
pub const DEFAULT_MAX_PATH_LEN: usize = 64;
pub const DEFAULT_CHANNEL_COUNT: u32 = 8;
pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 1000;

// Readings are handed out as u16.
const MAX_RESOLUTION_BITS: u8 = 16;

/// Resolution profile and sysfs location for analog inputs.
///
/// Every `AnalogInput` carries its own copy, so boards with different ADCs
/// can be driven from the same process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AioConfig {
    /// Native resolution of the ADC, in bits.
    pub raw_resolution_bits: u8,
    /// Resolution callers receive from `read`, in bits.
    pub supported_resolution_bits: u8,
    /// IIO device directory holding the `in_voltage<N>_raw` files.
    pub device_dir: PathBuf,
    /// Upper bound on the length of a constructed raw file path, in bytes.
    pub max_path_len: usize,
}

impl Default for AioConfig {
    fn default() -> Self {
        Self {
            raw_resolution_bits: DEFAULT_RAW_RESOLUTION_BITS,
            supported_resolution_bits: DEFAULT_SUPPORTED_RESOLUTION_BITS,
            device_dir: PathBuf::from(DEFAULT_DEVICE_DIR),
            max_path_len: DEFAULT_MAX_PATH_LEN,
        }
    }
}

impl AioConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, bits) in [
            ("raw_resolution_bits", self.raw_resolution_bits),
            ("supported_resolution_bits", self.supported_resolution_bits),
        ] {
            if bits == 0 || bits > MAX_RESOLUTION_BITS {
                return Err(AioError::Config(format!(
                    "{} must be within 1..={}, got {}",
                    name, MAX_RESOLUTION_BITS, bits
                )));
            }
        }
        if self.max_path_len == 0 {
            return Err(AioError::Config("max_path_len must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Load from `AIO_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            raw_resolution_bits: parse_var(
                &lookup,
                "AIO_RAW_RESOLUTION_BITS",
                defaults.raw_resolution_bits,
            )?,
            supported_resolution_bits: parse_var(
                &lookup,
                "AIO_SUPPORTED_RESOLUTION_BITS",
                defaults.supported_resolution_bits,
            )?,
            device_dir: lookup("AIO_DEVICE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.device_dir),
            max_path_len: parse_var(&lookup, "AIO_MAX_PATH_LEN", defaults.max_path_len)?,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Settings for the sampling daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    /// Analog inputs to sample.
    pub channels: Vec<u32>,
    /// Size of the identity pin map.
    pub channel_count: u32,
    pub sample_interval: Duration,
    pub aio: AioConfig,
}

impl DaemonConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let channels = match lookup("AIO_CHANNELS") {
            Some(raw) => parse_channel_list(&raw)?,
            None => vec![0],
        };
        let channel_count = parse_var(&lookup, "AIO_CHANNEL_COUNT", DEFAULT_CHANNEL_COUNT)?;
        let interval_ms = parse_var(&lookup, "AIO_SAMPLE_INTERVAL_MS", DEFAULT_SAMPLE_INTERVAL_MS)?;
        if interval_ms == 0 {
            return Err(AioError::Config(
                "AIO_SAMPLE_INTERVAL_MS must be non-zero".to_string(),
            ));
        }

        Ok(Self {
            channels,
            channel_count,
            sample_interval: Duration::from_millis(interval_ms),
            aio: AioConfig::from_lookup(&lookup)?,
        })
    }
}

fn parse_channel_list(raw: &str) -> Result<Vec<u32>> {
    let channels = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u32>()
                .map_err(|e| AioError::Config(format!("Invalid channel {:?} in AIO_CHANNELS: {}", part, e)))
        })
        .collect::<Result<Vec<_>>>()?;
    if channels.is_empty() {
        return Err(AioError::Config("AIO_CHANNELS lists no channels".to_string()));
    }
    Ok(channels)
}

pub(crate) fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AioError::Config(format!("Invalid {}={:?}: {}", key, raw, e))),
        None => Ok(default),
    }
}
