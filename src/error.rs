use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by the channel mapping collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("Invalid analog input channel {0} specified")]
    InvalidChannel(u32),

    #[error("Failed to set-up analog input channel {0} multiplexer")]
    MuxSetupFailed(u32),

    #[error("Platform not initialised")]
    PlatformNotInitialized,
}

/// Failures while turning the raw file content into a number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{0:?} is not a decimal number")]
    NotDecimal(String),

    #[error("{0:?} does not fit in a 16-bit reading")]
    Overflow(String),
}

#[derive(Debug, Error)]
pub enum AioError {
    #[error(transparent)]
    Map(#[from] MapError),

    #[error("Failed to open Analog input raw file {} for reading!", .path.display())]
    InvalidResource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Raw file path is {len} bytes, limit is {max}")]
    PathTooLong { len: usize, max: usize },

    #[error("Failed to read a sensible value")]
    EmptyRead,

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No voltage scale available for channel {0}")]
    ScaleUnavailable(u32),
}

pub type Result<T> = std::result::Result<T, AioError>;
