//! Resolution of requested analog input channels to hardware ADC channels.
//!
//! Multiplexer programming and platform bring-up belong to the board support
//! layer. This module only fixes the contract `AnalogInput::init` relies on,
//! plus a table-driven implementation for boards whose analog pins need no
//! mux setup.

use crate::error::MapError;

pub trait ChannelMapper {
    /// Validate `channel` and return the hardware ADC channel behind it.
    fn setup_aio(&self, channel: u32) -> Result<u32, MapError>;
}

impl MapError {
    /// Interpret a negative status code from a C-style setup routine.
    ///
    /// `-1` invalid channel, `-2` mux setup failure, `-3` platform not
    /// initialised. Other negative codes are treated as an invalid channel;
    /// non-negative codes are not errors.
    pub fn from_code(code: i32, channel: u32) -> Option<MapError> {
        match code {
            0.. => None,
            -2 => Some(MapError::MuxSetupFailed(channel)),
            -3 => Some(MapError::PlatformNotInitialized),
            _ => Some(MapError::InvalidChannel(channel)),
        }
    }
}

// Lets a plain status-code function stand in for a mapper.
impl<F> ChannelMapper for F
where
    F: Fn(u32) -> i32,
{
    fn setup_aio(&self, channel: u32) -> Result<u32, MapError> {
        let code = self(channel);
        match MapError::from_code(code, channel) {
            Some(err) => Err(err),
            None => Ok(code as u32),
        }
    }
}

/// Fixed logical-to-hardware channel table.
#[derive(Debug, Clone, Default)]
pub struct StaticPinMap {
    channels: Option<Vec<u32>>,
}

impl StaticPinMap {
    pub fn new(channels: Vec<u32>) -> Self {
        Self {
            channels: Some(channels),
        }
    }

    /// `count` channels mapped straight through, `n -> n`.
    pub fn identity(count: u32) -> Self {
        Self::new((0..count).collect())
    }

    /// A map for a platform that has not been brought up; every lookup fails.
    pub fn uninitialized() -> Self {
        Self { channels: None }
    }

    pub fn len(&self) -> usize {
        self.channels.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ChannelMapper for StaticPinMap {
    fn setup_aio(&self, channel: u32) -> Result<u32, MapError> {
        let channels = self
            .channels
            .as_ref()
            .ok_or(MapError::PlatformNotInitialized)?;
        channels
            .get(channel as usize)
            .copied()
            .ok_or(MapError::InvalidChannel(channel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_map_passes_channels_through() {
        let map = StaticPinMap::identity(6);
        assert_eq!(map.len(), 6);
        assert_eq!(map.setup_aio(0), Ok(0));
        assert_eq!(map.setup_aio(5), Ok(5));
        assert_eq!(map.setup_aio(6), Err(MapError::InvalidChannel(6)));
    }

    #[test]
    fn table_remaps_channels() {
        let map = StaticPinMap::new(vec![4, 2]);
        assert_eq!(map.setup_aio(0), Ok(4));
        assert_eq!(map.setup_aio(1), Ok(2));
    }

    #[test]
    fn uninitialized_platform_rejects_everything() {
        let map = StaticPinMap::uninitialized();
        assert!(map.is_empty());
        assert_eq!(map.setup_aio(0), Err(MapError::PlatformNotInitialized));
    }

    #[test]
    fn status_codes_map_to_errors() {
        assert_eq!(MapError::from_code(3, 1), None);
        assert_eq!(MapError::from_code(0, 1), None);
        assert_eq!(MapError::from_code(-1, 1), Some(MapError::InvalidChannel(1)));
        assert_eq!(MapError::from_code(-2, 1), Some(MapError::MuxSetupFailed(1)));
        assert_eq!(MapError::from_code(-3, 1), Some(MapError::PlatformNotInitialized));
        assert_eq!(MapError::from_code(-9, 1), Some(MapError::InvalidChannel(1)));
    }

    #[test]
    fn closures_act_as_mappers() {
        let mapper = |channel: u32| if channel < 2 { channel as i32 + 10 } else { -2 };
        assert_eq!(mapper.setup_aio(1), Ok(11));
        assert_eq!(mapper.setup_aio(2), Err(MapError::MuxSetupFailed(2)));
    }
}
