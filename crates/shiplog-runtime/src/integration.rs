use shiplog_core::{RuntimeInfo, SQL_QUERIES, UnitOfWork};
use shiplog_events::{AdapterSet, EventClassifier, EventSink, IgnoreRule, Outcome};
use shiplog_types::{EventFamily, HostEvent};

use crate::Result;
use crate::config::Config;

/// What [`Integration::handle`] did with one host event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// Log event classified and forwarded (or ignored)
    Log(Outcome),
    /// Queue job boundary: token regenerated, collector cleared
    UnitReset,
    /// Query appended to the collector
    QueryRecorded,
    /// Event name not subscribed to under the current config
    NotListened,
}

/// The unit of work an event belongs to and the sinks it ships through
#[derive(Clone, Copy)]
pub struct Target<'a> {
    pub unit: &'a UnitOfWork,
    pub structured: &'a dyn EventSink,
    pub errors: &'a dyn EventSink,
}

/// Routes host events to the classifier and the unit of work.
///
/// Strategies are selected once from the host version at construction.
/// Per-unit state lives in the [`Target`] passed to [`Integration::handle`].
pub struct Integration {
    adapters: AdapterSet,
    classifier: EventClassifier,
    listened: Vec<&'static str>,
}

impl Integration {
    pub fn new(config: &Config, runtime: &RuntimeInfo) -> Self {
        let adapters = AdapterSet::for_version(&runtime.host_version);
        let mut classifier = EventClassifier::new(&runtime.host_version);
        if !config.ignored_levels.is_empty() {
            classifier = classifier.ignore_levels(config.ignored_levels.iter().copied());
        }

        let mut listened = Vec::new();
        if config.enabled {
            listened.extend_from_slice(adapters.log.event_names());
            if runtime.running_in_console {
                listened.extend_from_slice(adapters.queue.event_names());
            }
            if config.sql_enabled {
                listened.extend_from_slice(adapters.query.event_names());
            }
        }

        tracing::debug!(
            target: "shiplog.runtime",
            version = %runtime.host_version,
            log = adapters.log.as_str(),
            queue = adapters.queue.as_str(),
            query = adapters.query.as_str(),
            listened = listened.len(),
            "integration ready"
        );

        Self {
            adapters,
            classifier,
            listened,
        }
    }

    pub fn with_ignore(mut self, rule: IgnoreRule) -> Self {
        self.classifier = self.classifier.with_ignore(rule);
        self
    }

    /// Host event names to subscribe to
    pub fn listened_events(&self) -> &[&'static str] {
        &self.listened
    }

    pub fn listens_to(&self, event_name: &str) -> bool {
        self.listened.contains(&event_name)
    }

    pub fn adapters(&self) -> &AdapterSet {
        &self.adapters
    }

    pub fn handle(&self, event: &HostEvent, target: Target<'_>) -> Result<Handled> {
        if !self.listens_to(&event.name) {
            tracing::trace!(target: "shiplog.runtime", event = %event.name, "event not listened to");
            return Ok(Handled::NotListened);
        }

        match self.adapters.family_of(&event.name) {
            Some(EventFamily::LogEmitted) => {
                let occurrence = self.adapters.log.extract_log(event)?;
                let outcome = self
                    .classifier
                    .dispatch(occurrence, target.structured, target.errors);
                Ok(Handled::Log(outcome))
            }
            Some(EventFamily::QueueJobLifecycle) => {
                target.unit.reset();
                Ok(Handled::UnitReset)
            }
            Some(EventFamily::QueryExecuted) => {
                let record = self.adapters.query.extract_query(event)?;
                if let Some(collector) = target.unit.collector() {
                    collector.set_in_array(SQL_QUERIES, record.to_json());
                }
                Ok(Handled::QueryRecorded)
            }
            None => Ok(Handled::NotListened),
        }
    }
}

impl std::fmt::Debug for Integration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Integration")
            .field("adapters", &self.adapters)
            .field("classifier", &self.classifier)
            .field("listened", &self.listened)
            .finish()
    }
}
