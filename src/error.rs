//! Error types for varuna-core

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// varuna-core error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Serial port error
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Collapsed input range handed to the value mapper
    #[error("Invalid mapping range: in_min == in_max ({in_min})")]
    InvalidRange {
        /// Lower bound of the source range
        in_min: f32,
        /// Upper bound of the source range
        in_max: f32,
    },

    /// Communication link is down
    #[error("Vehicle link not connected")]
    NotConnected,

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Config(e.to_string())
    }
}
