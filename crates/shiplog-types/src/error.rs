use std::fmt;

/// Result type for shiplog-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the types layer
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Level name outside the known severity set
    InvalidLevel(String),

    /// Host value does not have the expected shape
    InvalidPayload(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidLevel(level) => write!(f, "Invalid log level: {}", level),
            Error::InvalidPayload(msg) => write!(f, "Invalid payload: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
