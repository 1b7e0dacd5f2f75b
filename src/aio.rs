//! Analog inputs backed by Linux IIO sysfs raw-value files.
//!
//! Each channel is read from `<device_dir>/in_voltage<N>_raw`, a pseudo-file
//! that always reports the live conversion result as decimal ASCII. The value
//! is rescaled from the ADC's native resolution to the resolution the caller
//! configured.

use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, error, warn};
use uom::si::f32::ElectricPotential;

use crate::config::AioConfig;
use crate::data_models::AnalogReading;
use crate::error::{AioError, Result};
use crate::pinmap::ChannelMapper;
use crate::utils;

/// Largest chunk read from a raw-value file in one go.
pub const READ_BUFFER_LEN: usize = 16;

/// An open analog input channel.
///
/// The resolved hardware channel is fixed at construction. The file handle
/// is released when the input is closed or dropped.
#[derive(Debug)]
pub struct AnalogInput {
    channel: u32,
    path: PathBuf,
    file: Option<File>,
    config: AioConfig,
}

impl AnalogInput {
    /// Resolve `aio_channel` through `mapper` and open its raw-value file.
    ///
    /// Nothing is returned unless the channel is valid and the file could be
    /// opened; every failure is logged before it is returned.
    pub fn init<M>(aio_channel: u32, mapper: &M, config: AioConfig) -> Result<Self>
    where
        M: ChannelMapper + ?Sized,
    {
        if let Err(e) = config.validate() {
            error!("{}", e);
            return Err(e);
        }

        let channel = mapper.setup_aio(aio_channel).map_err(|e| {
            error!("{}", e);
            AioError::from(e)
        })?;

        let path = utils::raw_value_path(&config.device_dir, channel, config.max_path_len)
            .inspect_err(|e| error!("Analog input channel {}: {}", aio_channel, e))?;

        let mut input = Self {
            channel,
            path,
            file: None,
            config,
        };
        input.open()?;

        debug!(
            "Analog input {} bound to ADC channel {} ({})",
            aio_channel,
            channel,
            input.path.display()
        );
        Ok(input)
    }

    /// Open the raw-value file if it is not already open.
    pub fn open(&mut self) -> Result<()> {
        self.handle().map(|_| ())
    }

    /// Read the current input, rescaled to the configured supported resolution.
    pub fn read(&mut self) -> Result<u16> {
        let raw = self.read_raw()?;
        Ok(self.rescale(raw))
    }

    /// Read a timestamped sample, with the input voltage when a scale is published.
    pub fn read_reading(&mut self) -> Result<AnalogReading> {
        let raw = self.read_raw()?;
        let voltage = self
            .read_scale()
            .map(|scale| utils::raw_to_voltage(raw, scale));

        Ok(AnalogReading {
            channel: self.channel,
            value: self.rescale(raw),
            resolution_bits: self.config.supported_resolution_bits,
            voltage,
            timestamp_ms: now_ms(),
        })
    }

    /// Read the input voltage from the unscaled raw value and the IIO scale attribute.
    pub fn read_voltage(&mut self) -> Result<ElectricPotential> {
        let raw = self.read_raw()?;
        let scale = self
            .read_scale()
            .ok_or(AioError::ScaleUnavailable(self.channel))?;
        Ok(utils::raw_to_voltage(raw, scale))
    }

    /// Millivolts per raw LSB, from `in_voltage<N>_scale` or the shared `in_voltage_scale`.
    pub fn read_scale(&self) -> Option<f32> {
        for path in utils::scale_paths(&self.config.device_dir, self.channel) {
            match fs::read_to_string(&path) {
                Ok(text) => match utils::parse_scale(&text) {
                    Some(scale) => return Some(scale),
                    None => warn!("Ignoring unusable scale {:?} in {}", text.trim(), path.display()),
                },
                Err(e) => debug!("No scale at {}: {}", path.display(), e),
            }
        }
        None
    }

    /// Release the file handle. Consumes the input, so it cannot be used or closed again.
    pub fn close(mut self) -> Result<()> {
        if self.file.take().is_some() {
            debug!("Closed analog input channel {}", self.channel);
        }
        Ok(())
    }

    pub fn channel(&self) -> u32 {
        self.channel
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &AioConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    fn rescale(&self, raw: u16) -> u16 {
        utils::rescale(
            raw,
            self.config.raw_resolution_bits,
            self.config.supported_resolution_bits,
        )
    }

    fn handle(&mut self) -> Result<&mut File> {
        let file = match self.file.take() {
            Some(file) => file,
            None => File::open(&self.path).map_err(|source| {
                error!(
                    "Failed to open Analog input raw file {} for reading!",
                    self.path.display()
                );
                AioError::InvalidResource {
                    path: self.path.clone(),
                    source,
                }
            })?,
        };
        Ok(self.file.insert(file))
    }

    fn read_raw(&mut self) -> Result<u16> {
        let mut buffer = [0u8; READ_BUFFER_LEN];
        let file = self.handle()?;
        let len = match read_from_start(file, &mut buffer) {
            Ok(len) => len,
            Err(e) => {
                error!("Failed to read analog input channel {}: {}", self.channel, e);
                // Reopen on the next read rather than reuse a handle that failed.
                self.file = None;
                return Err(e.into());
            }
        };

        if len < 1 {
            error!("Failed to read a sensible value");
            return Err(AioError::EmptyRead);
        }

        utils::parse_decimal(&buffer[..len]).map_err(|e| {
            error!("{}", e);
            AioError::from(e)
        })
    }
}

/// Close an input that may never have been created. `None` is a no-op.
pub fn close(input: Option<AnalogInput>) -> Result<()> {
    match input {
        Some(input) => input.close(),
        None => Ok(()),
    }
}

// Sysfs attributes must be re-read from offset zero to get a fresh value.
fn read_from_start<R: Read + Seek>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    reader.seek(SeekFrom::Start(0))?;
    let len = reader.read(buf)?;
    reader.seek(SeekFrom::Start(0))?;
    Ok(len)
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
