use serde_json::Value;
use std::fmt;

/// Failure raised inside an installed auth provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeError {
    message: String,
}

impl ProbeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ProbeError {}

/// An installed authentication provider that can report the signed-in user
pub trait AuthProbe: Send + Sync {
    fn name(&self) -> &str;

    /// `Ok(None)` when nobody is signed in
    fn current_user_id(&self) -> Result<Option<Value>, ProbeError>;
}

/// Auth probe backed by a closure
pub struct FnProbe<F> {
    name: String,
    probe: F,
}

impl<F> FnProbe<F>
where
    F: Fn() -> Result<Option<Value>, ProbeError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, probe: F) -> Self {
        Self {
            name: name.into(),
            probe,
        }
    }
}

impl<F> AuthProbe for FnProbe<F>
where
    F: Fn() -> Result<Option<Value>, ProbeError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn current_user_id(&self) -> Result<Option<Value>, ProbeError> {
        (self.probe)()
    }
}
