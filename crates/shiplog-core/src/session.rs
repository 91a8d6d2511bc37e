use serde_json::Value;
use std::collections::HashMap;

/// Read-only view of the host session store
pub trait SessionStore: Send + Sync {
    /// Raw session id; never shipped as-is
    fn id(&self) -> String;

    fn get(&self, key: &str) -> Option<Value>;
}

/// Owned copy of a session taken at the time of the log call
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    id: String,
    values: HashMap<String, Value>,
}

impl SessionSnapshot {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            values: HashMap::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }
}

impl SessionStore for SessionSnapshot {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }
}
