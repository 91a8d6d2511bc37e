use std::fmt;

/// Result type for shiplog-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Field registry error (unregistered resolver, empty binding)
    Fields(shiplog_fields::Error),

    /// Host event adaptation error
    Events(shiplog_events::Error),

    /// IO operation failed
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// Record could not be handed to the transport
    Transport(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Fields(err) => write!(f, "Fields error: {}", err),
            Error::Events(err) => write!(f, "Events error: {}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Transport(msg) => write!(f, "Transport error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Fields(err) => Some(err),
            Error::Events(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Config(_) | Error::Transport(_) => None,
        }
    }
}

impl From<shiplog_fields::Error> for Error {
    fn from(err: shiplog_fields::Error) -> Self {
        Error::Fields(err)
    }
}

impl From<shiplog_events::Error> for Error {
    fn from(err: shiplog_events::Error) -> Self {
        Error::Events(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}
