use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Normalized reference to an error thrown inside the host
///
/// Anything the host hands over as an `ErrorRef` is error-like, whatever
/// its class hierarchy looks like on the host side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRef {
    /// Fully qualified class name as reported by the host
    pub class: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl ErrorRef {
    pub fn new(class: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            message: message.into(),
            file: None,
            line: None,
        }
    }

    pub fn at(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("class".to_string(), Value::String(self.class.clone()));
        map.insert("message".to_string(), Value::String(self.message.clone()));
        if let Some(file) = &self.file {
            map.insert("file".to_string(), Value::String(file.clone()));
        }
        if let Some(line) = self.line {
            map.insert("line".to_string(), Value::from(line));
        }
        Value::Object(map)
    }
}

impl fmt::Display for ErrorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.class, self.message)
    }
}

/// A value as the host hands it over: plain data, a thrown error, or a
/// mapping whose entries may themselves be errors
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HostValue {
    Json(Value),
    Error(ErrorRef),
    Map(BTreeMap<String, HostValue>),
}

impl HostValue {
    pub fn is_error_like(&self) -> bool {
        matches!(self, HostValue::Error(_))
    }

    pub fn as_error(&self) -> Option<&ErrorRef> {
        match self {
            HostValue::Error(err) => Some(err),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HostValue::Json(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            HostValue::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, HostValue>> {
        match self {
            HostValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, HostValue::Json(Value::Null))
    }

    /// Lossless for plain data; errors become their `ErrorRef::to_json` form
    pub fn to_json(&self) -> Value {
        match self {
            HostValue::Json(value) => value.clone(),
            HostValue::Error(err) => err.to_json(),
            HostValue::Map(map) => Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }

    /// String coercion used for grouping keys.
    ///
    /// Strings are taken verbatim, numbers use their decimal form and
    /// booleans follow the host convention (`"1"` / `""`). `null` yields
    /// `None` so callers can substitute their own marker.
    pub fn coerce_to_string(&self) -> Option<String> {
        match self {
            HostValue::Json(Value::Null) => None,
            HostValue::Json(Value::String(s)) => Some(s.clone()),
            HostValue::Json(Value::Bool(true)) => Some("1".to_string()),
            HostValue::Json(Value::Bool(false)) => Some(String::new()),
            HostValue::Json(other) => Some(other.to_string()),
            HostValue::Error(err) => Some(err.class.clone()),
            HostValue::Map(_) => Some(self.to_json().to_string()),
        }
    }
}

impl From<Value> for HostValue {
    fn from(value: Value) -> Self {
        HostValue::Json(value)
    }
}

impl From<ErrorRef> for HostValue {
    fn from(err: ErrorRef) -> Self {
        HostValue::Error(err)
    }
}

impl From<&str> for HostValue {
    fn from(s: &str) -> Self {
        HostValue::Json(Value::String(s.to_string()))
    }
}

impl From<String> for HostValue {
    fn from(s: String) -> Self {
        HostValue::Json(Value::String(s))
    }
}

impl From<BTreeMap<String, HostValue>> for HostValue {
    fn from(map: BTreeMap<String, HostValue>) -> Self {
        HostValue::Map(map)
    }
}

/// Context attached to a log call, keyed by name
pub type Context = BTreeMap<String, HostValue>;

/// Render a context as JSON for the transport
pub fn context_to_json(context: &Context) -> Value {
    Value::Object(
        context
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect(),
    )
}

/// Message of a log occurrence, tagged once at the ingestion boundary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Message {
    Plain(Value),
    Error(ErrorRef),
}

impl Message {
    pub fn is_error_like(&self) -> bool {
        matches!(self, Message::Error(_))
    }

    pub fn as_error(&self) -> Option<&ErrorRef> {
        match self {
            Message::Error(err) => Some(err),
            Message::Plain(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Message::Plain(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Message::Plain(value) => value.clone(),
            Message::Error(err) => err.to_json(),
        }
    }
}

impl From<HostValue> for Message {
    fn from(value: HostValue) -> Self {
        match value {
            HostValue::Json(json) => Message::Plain(json),
            HostValue::Error(err) => Message::Error(err),
            map @ HostValue::Map(_) => Message::Plain(map.to_json()),
        }
    }
}

impl From<ErrorRef> for Message {
    fn from(err: ErrorRef) -> Self {
        Message::Error(err)
    }
}

impl From<&str> for Message {
    fn from(s: &str) -> Self {
        Message::Plain(Value::String(s.to_string()))
    }
}

impl From<String> for Message {
    fn from(s: String) -> Self {
        Message::Plain(Value::String(s))
    }
}

impl From<Value> for Message {
    fn from(value: Value) -> Self {
        Message::Plain(value)
    }
}
