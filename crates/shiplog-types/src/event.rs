use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;

use crate::HostValue;

/// Event as dispatched by the host: a name plus its arguments.
///
/// Older hosts pass several positional arguments; newer ones pass a single
/// event object, represented as one `HostValue::Map` argument.
#[derive(Debug, Clone, PartialEq)]
pub struct HostEvent {
    pub name: String,
    pub args: Vec<HostValue>,
}

impl HostEvent {
    pub fn new(name: impl Into<String>, args: Vec<HostValue>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Event carrying one object argument with the given properties
    pub fn object<I, K>(name: impl Into<String>, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, HostValue)>,
        K: Into<String>,
    {
        let map: BTreeMap<String, HostValue> = properties
            .into_iter()
            .map(|(key, value)| (key.into(), value))
            .collect();
        Self::new(name, vec![HostValue::Map(map)])
    }

    pub fn arg(&self, index: usize) -> Option<&HostValue> {
        self.args.get(index)
    }
}

/// One executed SQL statement, as kept under the `sql_queries` category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRecord {
    pub query: String,
    /// List for positional placeholders, object for named ones
    #[serde(default = "empty_bindings")]
    pub bindings: Value,
    /// Execution time in milliseconds, when the host reports it
    #[serde(default)]
    pub time: Option<f64>,
}

fn empty_bindings() -> Value {
    Value::Array(Vec::new())
}

impl QueryRecord {
    pub fn to_json(&self) -> Value {
        json!({
            "query": self.query,
            "bindings": self.bindings,
            "time": self.time,
        })
    }
}
