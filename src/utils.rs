use std::path::{Path, PathBuf};

use uom::si::electric_potential::millivolt;
use uom::si::f32::ElectricPotential;

use crate::error::{AioError, ParseError, Result};

/// Build `<dir>/in_voltage<channel>_raw`, refusing paths longer than `max_len` bytes.
pub fn raw_value_path(dir: &Path, channel: u32, max_len: usize) -> Result<PathBuf> {
    let path = dir.join(format!("in_voltage{}_raw", channel));
    let len = path.as_os_str().len();
    if len > max_len {
        return Err(AioError::PathTooLong { len, max: max_len });
    }
    Ok(path)
}

/// Candidate scale files for a channel, most specific first.
pub fn scale_paths(dir: &Path, channel: u32) -> [PathBuf; 2] {
    [
        dir.join(format!("in_voltage{}_scale", channel)),
        dir.join("in_voltage_scale"),
    ]
}

/// Parse the leading decimal number of a sysfs value.
///
/// Like `strtoul`, leading whitespace and a `+` are skipped and anything after
/// the digits is ignored. Unlike `strtoul`, a leading `-` is not accepted:
/// a negative count is never a valid sample, so it is `NotDecimal` rather
/// than a wrapped-around value.
pub fn parse_decimal(buf: &[u8]) -> std::result::Result<u16, ParseError> {
    let mut rest = buf.trim_ascii_start();
    if let [b'+', tail @ ..] = rest {
        rest = tail;
    }

    let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return Err(ParseError::NotDecimal(display_content(buf)));
    }

    let mut value: u32 = 0;
    for &digit in &rest[..digits] {
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u32::from(digit - b'0')))
            .filter(|v| *v <= u32::from(u16::MAX))
            .ok_or_else(|| ParseError::Overflow(display_content(buf)))?;
    }
    Ok(value as u16)
}

fn display_content(buf: &[u8]) -> String {
    String::from_utf8_lossy(buf).trim_end().to_string()
}

/// Shift a reading from `raw_bits` of resolution to `supported_bits`.
///
/// Narrowing drops low-order bits, widening zero-fills them. There is no
/// rounding; the result is truncated to 16 bits.
pub fn rescale(value: u16, raw_bits: u8, supported_bits: u8) -> u16 {
    let value = u32::from(value);
    let scaled = if raw_bits > supported_bits {
        value >> (raw_bits - supported_bits)
    } else {
        value << (supported_bits - raw_bits)
    };
    scaled as u16
}

// IIO scale attributes are expressed in millivolts per LSB.
pub fn parse_scale(text: &str) -> Option<f32> {
    text.trim()
        .parse::<f32>()
        .ok()
        .filter(|scale| scale.is_finite() && *scale > 0.0)
}

pub fn raw_to_voltage(raw: u16, scale_mv: f32) -> ElectricPotential {
    ElectricPotential::new::<millivolt>(f32::from(raw) * scale_mv)
}
