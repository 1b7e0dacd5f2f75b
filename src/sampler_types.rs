use crate::data_models::AnalogReading;
use crate::error::AioError;

// Commands sent to the sampler task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerCommand {
    SampleNow,
    Stop,
}

// Events reported by the sampler task
#[derive(Debug)]
pub enum SamplerEvent {
    Reading(AnalogReading),
    Error { channel: u32, error: AioError },
}
