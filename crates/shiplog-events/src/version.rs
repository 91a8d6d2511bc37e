//! Host-version adaptation.
//!
//! Each event family changed shape once across host releases. A strategy
//! knows the event names of one shape and how to read its arguments; the
//! strategy is picked from the host version once at bootstrap.

use serde_json::Value;
use shiplog_types::{
    Context, EventFamily, HostEvent, HostValue, HostVersion, Level, LogOccurrence, Message,
    QueryRecord,
};

use crate::error::{Error, Result};

/// Version ranges using the older event shapes
pub mod ranges {
    use shiplog_types::VersionRange;

    /// Log events dispatched as `illuminate.log` with positional arguments
    pub const LOG_LEGACY: VersionRange =
        VersionRange::new("log_legacy", &["5.0", "5.1", "5.2", "5.3"]);

    /// Queue lifecycle reported through `illuminate.queue.*` hooks
    pub const QUEUE_LEGACY: VersionRange = VersionRange::new("queue_legacy", &["5.0", "5.1"]);

    /// Queries dispatched as `illuminate.query` with positional arguments
    pub const QUERY_LEGACY: VersionRange = VersionRange::new("query_legacy", &["5.0", "5.1"]);

    /// Releases that never put the thrown error under `context["exception"]`
    pub const EXCEPTION_CONTEXT_LEGACY: VersionRange = VersionRange::new(
        "exception_context_legacy",
        &["5.0", "5.1", "5.2", "5.3", "5.4"],
    );
}

/// Host event names
pub mod event_names {
    pub const ILLUMINATE_LOG: &str = "illuminate.log";
    pub const MESSAGE_LOGGED: &str = "Illuminate\\Log\\Events\\MessageLogged";
    pub const QUEUE_AFTER: &str = "illuminate.queue.after";
    pub const QUEUE_FAILED: &str = "illuminate.queue.failed";
    pub const JOB_PROCESSING: &str = "Illuminate\\Queue\\Events\\JobProcessing";
    pub const ILLUMINATE_QUERY: &str = "illuminate.query";
    pub const QUERY_EXECUTED: &str = "Illuminate\\Database\\Events\\QueryExecuted";
}

/// How events of one family are recognised and read for one host version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractionStrategy {
    /// `illuminate.log(level, message, context)`
    PositionalLog,
    /// `MessageLogged` object with `level`, `message`, `context`
    MessageLoggedEvent,
    /// `illuminate.queue.after` and `illuminate.queue.failed`
    LegacyQueueHooks,
    /// `JobProcessing`, fired before each job
    JobProcessingEvent,
    /// `illuminate.query(query, bindings, time)`
    PositionalQuery,
    /// `QueryExecuted` object with `sql`, `bindings`, `time`
    QueryExecutedEvent,
}

/// Pick the strategy for `family` under `version`
pub fn select_strategy(family: EventFamily, version: &HostVersion) -> ExtractionStrategy {
    match family {
        EventFamily::LogEmitted if version.is_in(&ranges::LOG_LEGACY) => {
            ExtractionStrategy::PositionalLog
        }
        EventFamily::LogEmitted => ExtractionStrategy::MessageLoggedEvent,
        EventFamily::QueueJobLifecycle if version.is_in(&ranges::QUEUE_LEGACY) => {
            ExtractionStrategy::LegacyQueueHooks
        }
        EventFamily::QueueJobLifecycle => ExtractionStrategy::JobProcessingEvent,
        EventFamily::QueryExecuted if version.is_in(&ranges::QUERY_LEGACY) => {
            ExtractionStrategy::PositionalQuery
        }
        EventFamily::QueryExecuted => ExtractionStrategy::QueryExecutedEvent,
    }
}

impl ExtractionStrategy {
    pub fn family(&self) -> EventFamily {
        match self {
            Self::PositionalLog | Self::MessageLoggedEvent => EventFamily::LogEmitted,
            Self::LegacyQueueHooks | Self::JobProcessingEvent => EventFamily::QueueJobLifecycle,
            Self::PositionalQuery | Self::QueryExecutedEvent => EventFamily::QueryExecuted,
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(
            self,
            Self::PositionalLog | Self::LegacyQueueHooks | Self::PositionalQuery
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PositionalLog => "positional_log",
            Self::MessageLoggedEvent => "message_logged_event",
            Self::LegacyQueueHooks => "legacy_queue_hooks",
            Self::JobProcessingEvent => "job_processing_event",
            Self::PositionalQuery => "positional_query",
            Self::QueryExecutedEvent => "query_executed_event",
        }
    }

    /// Event names to subscribe to
    pub fn event_names(&self) -> &'static [&'static str] {
        use event_names::*;
        match self {
            Self::PositionalLog => &[ILLUMINATE_LOG],
            Self::MessageLoggedEvent => &[MESSAGE_LOGGED],
            Self::LegacyQueueHooks => &[QUEUE_AFTER, QUEUE_FAILED],
            Self::JobProcessingEvent => &[JOB_PROCESSING],
            Self::PositionalQuery => &[ILLUMINATE_QUERY],
            Self::QueryExecutedEvent => &[QUERY_EXECUTED],
        }
    }

    pub fn handles(&self, event_name: &str) -> bool {
        self.event_names().contains(&event_name)
    }

    /// Read `(level, message, context)` from a log event
    pub fn extract_log(&self, event: &HostEvent) -> Result<LogOccurrence> {
        self.ensure_handles(event)?;
        let (level, message, context) = match self {
            Self::PositionalLog => (event.arg(0), event.arg(1), event.arg(2)),
            Self::MessageLoggedEvent => {
                let object = single_object(event)?;
                (
                    object.get("level"),
                    object.get("message"),
                    object.get("context"),
                )
            }
            _ => return Err(Error::UnknownEvent(event.name.clone())),
        };

        let level = level_from(event, level)?;
        let message = message
            .cloned()
            .map(Message::from)
            .ok_or_else(|| Error::payload(&event.name, "missing message"))?;
        let context = context_from(event, context)?;
        Ok(LogOccurrence::new(level, message, context))
    }

    /// Read `(query, bindings, time)` from a query event
    pub fn extract_query(&self, event: &HostEvent) -> Result<QueryRecord> {
        self.ensure_handles(event)?;
        let (query, bindings, time) = match self {
            Self::PositionalQuery => (event.arg(0), event.arg(1), event.arg(2)),
            Self::QueryExecutedEvent => {
                let object = single_object(event)?;
                (object.get("sql"), object.get("bindings"), object.get("time"))
            }
            _ => return Err(Error::UnknownEvent(event.name.clone())),
        };

        let query = query
            .and_then(HostValue::as_str)
            .ok_or_else(|| Error::payload(&event.name, "query must be a string"))?
            .to_string();
        Ok(QueryRecord {
            query,
            bindings: bindings_from(event, bindings)?,
            time: time_from(event, time)?,
        })
    }

    fn ensure_handles(&self, event: &HostEvent) -> Result<()> {
        if self.handles(&event.name) {
            Ok(())
        } else {
            Err(Error::UnknownEvent(event.name.clone()))
        }
    }
}

/// The three strategies in effect for one process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterSet {
    pub log: ExtractionStrategy,
    pub queue: ExtractionStrategy,
    pub query: ExtractionStrategy,
}

impl AdapterSet {
    pub fn for_version(version: &HostVersion) -> Self {
        Self {
            log: select_strategy(EventFamily::LogEmitted, version),
            queue: select_strategy(EventFamily::QueueJobLifecycle, version),
            query: select_strategy(EventFamily::QueryExecuted, version),
        }
    }

    pub fn strategy(&self, family: EventFamily) -> ExtractionStrategy {
        match family {
            EventFamily::LogEmitted => self.log,
            EventFamily::QueueJobLifecycle => self.queue,
            EventFamily::QueryExecuted => self.query,
        }
    }

    /// Family whose selected strategy listens to `event_name`
    pub fn family_of(&self, event_name: &str) -> Option<EventFamily> {
        EventFamily::ALL
            .into_iter()
            .find(|family| self.strategy(*family).handles(event_name))
    }
}

fn single_object(event: &HostEvent) -> Result<&std::collections::BTreeMap<String, HostValue>> {
    event
        .arg(0)
        .and_then(HostValue::as_map)
        .ok_or_else(|| Error::payload(&event.name, "expected a single event object"))
}

fn level_from(event: &HostEvent, value: Option<&HostValue>) -> Result<Level> {
    let raw = value
        .and_then(HostValue::as_str)
        .ok_or_else(|| Error::payload(&event.name, "level must be a string"))?;
    Ok(raw.parse()?)
}

fn context_from(event: &HostEvent, value: Option<&HostValue>) -> Result<Context> {
    match value {
        None | Some(HostValue::Json(Value::Null)) => Ok(Context::new()),
        Some(HostValue::Map(map)) => Ok(map.clone()),
        Some(HostValue::Json(Value::Object(object))) => Ok(object
            .iter()
            .map(|(key, value)| (key.clone(), HostValue::Json(value.clone())))
            .collect()),
        // host arrays are mappings; a list is keyed by position
        Some(HostValue::Json(Value::Array(items))) => Ok(items
            .iter()
            .enumerate()
            .map(|(index, value)| (index.to_string(), HostValue::Json(value.clone())))
            .collect()),
        Some(_) => Err(Error::payload(&event.name, "context must be a mapping")),
    }
}

/// Positional bindings stay a list; named bindings (`:id`) are kept as one
/// object so their names survive.
fn bindings_from(event: &HostEvent, value: Option<&HostValue>) -> Result<Value> {
    match value {
        None | Some(HostValue::Json(Value::Null)) => Ok(Value::Array(Vec::new())),
        Some(HostValue::Json(value @ (Value::Array(_) | Value::Object(_)))) => Ok(value.clone()),
        Some(map @ HostValue::Map(_)) => Ok(map.to_json()),
        Some(_) => Err(Error::payload(&event.name, "bindings must be a list or a mapping")),
    }
}

fn time_from(event: &HostEvent, value: Option<&HostValue>) -> Result<Option<f64>> {
    match value {
        None | Some(HostValue::Json(Value::Null)) => Ok(None),
        Some(HostValue::Json(Value::Number(n))) => Ok(n.as_f64()),
        Some(_) => Err(Error::payload(&event.name, "time must be a number")),
    }
}
