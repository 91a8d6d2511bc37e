use chrono::{DateTime, Utc};
use serde::Serialize;
use shiplog_types::{Context, Level, Message, ResolvedFieldSet};
use std::fmt;

use crate::Result;

/// Which sink produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Event,
    Error,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Event => "event",
            RecordKind::Error => "error",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified occurrence with its resolved fields, ready to ship.
///
/// Absent fields are left out of the serialized form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub kind: RecordKind,
    pub level: Level,
    pub message: Message,
    pub context: Context,
    pub fields: ResolvedFieldSet,
    pub timestamp: DateTime<Utc>,
}

/// Outbound delivery of records.
///
/// Called synchronously from the logging path, so implementations should
/// queue rather than block on the network.
pub trait Transport: Send + Sync {
    fn send(&self, record: Record) -> Result<()>;
}
