use shiplog_types::{Context, HostVersion, Level, LogOccurrence, Message};
use std::fmt;

use crate::sink::EventSink;
use crate::version::ranges;

/// Context key newer hosts use to pass the thrown error
pub const EXCEPTION_KEY: &str = "exception";

/// Terminal state of one classified occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Ignored,
    StructuredEvent,
    ErrorEvent,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Ignored => "ignored",
            Outcome::StructuredEvent => "structured_event",
            Outcome::ErrorEvent => "error_event",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome plus the payload to forward
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Ignored,
    Structured(LogOccurrence),
    /// Message is the extracted error when the host used the side channel
    Error(LogOccurrence),
}

impl Classification {
    pub fn outcome(&self) -> Outcome {
        match self {
            Classification::Ignored => Outcome::Ignored,
            Classification::Structured(_) => Outcome::StructuredEvent,
            Classification::Error(_) => Outcome::ErrorEvent,
        }
    }

    pub fn occurrence(&self) -> Option<&LogOccurrence> {
        match self {
            Classification::Ignored => None,
            Classification::Structured(occurrence) | Classification::Error(occurrence) => {
                Some(occurrence)
            }
        }
    }
}

type Predicate = dyn Fn(Level, &Message, &Context) -> bool + Send + Sync;

/// Caller-supplied predicate that drops an occurrence before classification
pub struct IgnoreRule {
    name: String,
    predicate: Box<Predicate>,
}

impl IgnoreRule {
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(Level, &Message, &Context) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Box::new(predicate),
        }
    }

    /// Ignore every occurrence logged at one of `levels`
    pub fn levels(levels: impl IntoIterator<Item = Level>) -> Self {
        let levels: Vec<Level> = levels.into_iter().collect();
        Self::new("levels", move |level, _, _| levels.contains(&level))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matches(&self, level: Level, message: &Message, context: &Context) -> bool {
        (self.predicate)(level, message, context)
    }
}

impl fmt::Debug for IgnoreRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IgnoreRule").field("name", &self.name).finish()
    }
}

/// Splits log occurrences into plain events and errors.
///
/// Rules run in order:
/// 1. any ignore rule matches: ignored
/// 2. `debug`/`info` with a non-error message: structured event
/// 3. host passes errors under `context["exception"]` and that entry is
///    error-like: error event carrying the extracted error, key removed
/// 4. anything else: error event with the payload unchanged
#[derive(Debug)]
pub struct EventClassifier {
    exception_in_context: bool,
    ignore: Vec<IgnoreRule>,
}

impl EventClassifier {
    pub fn new(version: &HostVersion) -> Self {
        Self {
            exception_in_context: !version.is_in(&ranges::EXCEPTION_CONTEXT_LEGACY),
            ignore: Vec::new(),
        }
    }

    pub fn with_ignore(mut self, rule: IgnoreRule) -> Self {
        self.ignore.push(rule);
        self
    }

    pub fn ignore_levels(self, levels: impl IntoIterator<Item = Level>) -> Self {
        self.with_ignore(IgnoreRule::levels(levels))
    }

    /// Whether rule 3 applies for this host version
    pub fn reads_exception_from_context(&self) -> bool {
        self.exception_in_context
    }

    pub fn classify(&self, occurrence: LogOccurrence) -> Classification {
        let LogOccurrence {
            level,
            message,
            mut context,
        } = occurrence;

        if let Some(rule) = self
            .ignore
            .iter()
            .find(|rule| rule.matches(level, &message, &context))
        {
            tracing::debug!(
                target: "shiplog.events",
                rule = rule.name(),
                level = %level,
                "occurrence ignored"
            );
            return Classification::Ignored;
        }

        if level.is_informational() && !message.is_error_like() {
            return Classification::Structured(LogOccurrence::new(level, message, context));
        }

        if self.exception_in_context
            && let Some(err) = context
                .get(EXCEPTION_KEY)
                .and_then(|value| value.as_error())
                .cloned()
        {
            context.remove(EXCEPTION_KEY);
            return Classification::Error(LogOccurrence::new(level, err, context));
        }

        Classification::Error(LogOccurrence::new(level, message, context))
    }

    /// Classify and forward to the matching sink
    pub fn dispatch(
        &self,
        occurrence: LogOccurrence,
        structured: &dyn EventSink,
        errors: &dyn EventSink,
    ) -> Outcome {
        let classification = self.classify(occurrence);
        let outcome = classification.outcome();
        tracing::trace!(target: "shiplog.events", outcome = %outcome, "occurrence classified");

        match classification {
            Classification::Ignored => {}
            Classification::Structured(occurrence) => {
                structured.accept(occurrence.level, occurrence.message, occurrence.context)
            }
            Classification::Error(occurrence) => {
                errors.accept(occurrence.level, occurrence.message, occurrence.context)
            }
        }
        outcome
    }
}
