use std::fmt;

/// Result type for shiplog-fields operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in field resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A requested field is bound to a resolver name nobody registered
    UnregisteredField { field: String, resolver: String },

    /// A requested field is bound to an empty resolver sequence
    EmptyBinding(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnregisteredField { field, resolver } => write!(
                f,
                "Field '{}' is bound to unregistered resolver '{}'",
                field, resolver
            ),
            Error::EmptyBinding(field) => {
                write!(f, "Field '{}' is bound to an empty resolver sequence", field)
            }
        }
    }
}

impl std::error::Error for Error {}
