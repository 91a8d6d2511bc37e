use std::sync::RwLock;
use uuid::Uuid;

/// Issues the correlation token shared by every record of one unit of work
pub trait TokenProvider: Send + Sync {
    /// Current token; stable until the next `generate`
    fn token(&self) -> String;

    /// Replace the token, at the start of a new unit of work
    fn generate(&self);
}

/// UUID v4 backed token provider
#[derive(Debug)]
pub struct CorrelationTokenProvider {
    token: RwLock<String>,
}

impl Default for CorrelationTokenProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CorrelationTokenProvider {
    pub fn new() -> Self {
        Self::with_token(Uuid::new_v4().to_string())
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(token.into()),
        }
    }
}

impl TokenProvider for CorrelationTokenProvider {
    fn token(&self) -> String {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn generate(&self) {
        let mut token = self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *token = Uuid::new_v4().to_string();
    }
}
