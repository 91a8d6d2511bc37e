use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// Value produced by a field resolver. Absence is modelled as `None` by callers.
pub type FieldValue = Value;

/// Resolved fields for one log occurrence, in the order they were requested.
///
/// Absent values keep their slot so callers can tell "requested but absent"
/// from "never requested"; they are omitted when serialized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedFieldSet {
    entries: Vec<(String, Option<FieldValue>)>,
}

impl ResolvedFieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert a value, replacing in place if the name is already present
    pub fn insert(&mut self, name: impl Into<String>, value: Option<FieldValue>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Present value for `name`; `None` when absent or not requested
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .and_then(|(_, value)| value.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == name)
    }

    /// True when `name` was requested and resolved to absent
    pub fn is_absent(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|(existing, value)| existing == name && value.is_none())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&FieldValue>)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_ref()))
    }

    /// Present fields only, as a JSON object
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .filter_map(|(name, value)| value.clone().map(|v| (name.clone(), v)))
            .collect();
        Value::Object(map)
    }
}

impl Serialize for ResolvedFieldSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let present = self.entries.iter().filter(|(_, value)| value.is_some());
        let mut map = serializer.serialize_map(None)?;
        for (name, value) in present {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
