use std::fmt;

/// Result type for shiplog-events operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while adapting host events
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Domain value could not be built (unknown level, ...)
    Types(shiplog_types::Error),

    /// Event arguments do not match the shape the selected strategy expects
    Payload { event: String, reason: String },

    /// Event name is not handled by the strategy it was given to
    UnknownEvent(String),
}

impl Error {
    pub(crate) fn payload(event: &str, reason: impl Into<String>) -> Self {
        Error::Payload {
            event: event.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Types(err) => write!(f, "Types error: {}", err),
            Error::Payload { event, reason } => {
                write!(f, "Malformed payload for event '{}': {}", event, reason)
            }
            Error::UnknownEvent(name) => write!(f, "Unknown event: {}", name),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Types(err) => Some(err),
            Error::Payload { .. } | Error::UnknownEvent(_) => None,
        }
    }
}

impl From<shiplog_types::Error> for Error {
    fn from(err: shiplog_types::Error) -> Self {
        Error::Types(err)
    }
}
